/// SizeWalk GUI: egui-based live disk usage browser.
///
/// This crate contains all UI code. The walk itself lives in `sizewalk-core`.
pub mod app;
pub mod state;
pub mod theme;
pub mod widgets;

pub use app::{RepaintSignal, SizeWalkApp, SizeWalkState};
