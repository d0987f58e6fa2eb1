/// UI widgets for SizeWalk.

pub mod entry_list;
pub mod size_bar;
pub mod status_bar;
