/// Bottom status bar -- walk progress, notifications and key help.
use crate::state::{AppPhase, AppState, NotificationKind};
use crate::theme::Palette;
use egui::{RichText, Ui};
use sizewalk_core::analysis::LargestFile;
use sizewalk_core::model::{format_count, format_size};

const HELP: &[(&str, &str)] = &[
    ("q", "Quit"),
    ("↑/↓", "Select file"),
    ("→/Enter", "Enter directory"),
    ("←/Escape", "Exit directory"),
    ("Ctrl-L", "Copy current path to clipboard"),
];

pub fn status_bar(ui: &mut Ui, state: &AppState, palette: &Palette) {
    ui.horizontal(|ui| {
        match state.phase {
            AppPhase::Scanning => {
                ui.spinner();
                ui.label(
                    RichText::new(format!(
                        "Scanning... {} so far",
                        format_size(state.root().size(), state.format)
                    ))
                    .size(12.0)
                    .color(palette.text_muted),
                );
            }
            AppPhase::Ready => {
                if let Some(summary) = state.summary {
                    let mut text = format!(
                        "{} files, {} folders, {}",
                        format_count(summary.files),
                        format_count(summary.dirs),
                        format_size(summary.bytes, state.format),
                    );
                    if let Some(duration) = state.scan_duration {
                        text.push_str(&format!(" in {duration:.2?}"));
                    }
                    ui.label(RichText::new(text).size(12.0).color(palette.text_muted));
                    if let Some(largest) = state.largest_files.first() {
                        ui.separator();
                        largest_files_label(ui, state, largest, palette);
                    }
                    if summary.errors > 0 {
                        ui.separator();
                        ui.label(
                            RichText::new(format!("{} unreadable", format_count(summary.errors)))
                                .size(12.0)
                                .color(palette.error),
                        );
                    }
                }
            }
        }

        if let Some(notification) = &state.notification {
            ui.separator();
            let color = match notification.kind {
                NotificationKind::Info => palette.accent,
                NotificationKind::Error => palette.error,
            };
            ui.label(RichText::new(&notification.text).size(12.0).color(color));
        }
    });

    ui.horizontal(|ui| {
        for (keys, text) in HELP {
            ui.label(RichText::new(*keys).size(11.0).color(palette.accent));
            ui.label(RichText::new(*text).size(11.0).color(palette.text_primary));
            ui.add_space(6.0);
        }
    });
}

/// "Largest: <name> <size>", with the full top list on hover.
fn largest_files_label(ui: &mut Ui, state: &AppState, largest: &LargestFile, palette: &Palette) {
    let name = largest
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| largest.path.display().to_string());
    let hover = state
        .largest_files
        .iter()
        .map(|f| format!("{:>10}  {}", format_size(f.size, state.format), f.path.display()))
        .collect::<Vec<_>>()
        .join("\n");
    ui.label(
        RichText::new(format!(
            "Largest: {name} {}",
            format_size(largest.size, state.format)
        ))
        .size(12.0)
        .color(palette.text_muted),
    )
    .on_hover_text(RichText::new(hover).monospace());
}
