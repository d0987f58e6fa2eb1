/// Directory listing -- one row per entry of the current directory.
///
/// Rows are laid out in fixed columns: name (bold, padded to the longest
/// name), size, then a proportional bar. Directories are underlined and
/// entries carrying an error are drawn in the error colour. Only rows inside the
/// viewport are painted, so huge directories stay cheap to draw.
use crate::state::{AppPhase, AppState};
use crate::theme::Palette;
use crate::widgets::size_bar::paint_size_bar;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};
use sizewalk_core::model::format_size;

/// Height of each row in pixels.
const ROW_HEIGHT: f32 = 22.0;

const SIZE_COLUMN_WIDTH: f32 = 120.0;
const BAR_WIDTH: f32 = 140.0;
const COLUMN_GAP: f32 = 16.0;

/// Horizontal offset of the second pass of bold text.
const BOLD_OFFSET: f32 = 1.0;

/// What the user did with the list this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Select(usize),
    Enter(usize),
}

pub fn entry_list(ui: &mut Ui, state: &mut AppState, palette: &Palette) -> Option<EntryAction> {
    if state.entries().is_empty() {
        let message = if let Some(err) = state.current().error() {
            err.to_string()
        } else if state.phase == AppPhase::Scanning {
            "Scanning...".to_string()
        } else {
            "Empty directory".to_string()
        };
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new(message).color(palette.text_muted));
        });
        return None;
    }

    let font = FontId::monospace(14.0);
    let longest_name = state
        .entries()
        .iter()
        .map(|e| e.name().chars().count())
        .max()
        .unwrap_or(0);
    let glyph_width = ui.fonts(|f| f.glyph_width(&font, 'M'));
    let name_width = longest_name as f32 * glyph_width;

    let scroll_to_selected = std::mem::take(&mut state.scroll_to_selected);
    let state = &*state;
    let total_rows = state.entries().len();
    let mut action = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Reserve the full virtual height so the scrollbar is correct.
            let (response, painter) = ui.allocate_painter(
                Vec2::new(ui.available_width(), total_rows as f32 * ROW_HEIGHT),
                Sense::hover(),
            );
            let top_y = response.rect.top();
            let viewport = ui.clip_rect();

            if scroll_to_selected {
                let row_rect = row_rect(response.rect, top_y, state.selected());
                ui.scroll_to_rect(row_rect, None);
            }

            let first_visible = ((viewport.top() - top_y) / ROW_HEIGHT).floor().max(0.0) as usize;
            let last_visible = (((viewport.bottom() - top_y) / ROW_HEIGHT).ceil().max(0.0)
                as usize)
                .min(total_rows);

            for (row_idx, entry) in state
                .entries()
                .iter()
                .enumerate()
                .take(last_visible)
                .skip(first_visible)
            {
                let rect = row_rect(response.rect, top_y, row_idx);
                let row_response =
                    ui.interact(rect, ui.id().with(("entry_row", row_idx)), Sense::click());

                let is_selected = row_idx == state.selected();
                if is_selected {
                    painter.rect_filled(rect, 0.0, palette.selection);
                } else if row_response.hovered() {
                    painter.rect_filled(rect, 0.0, palette.hover);
                }

                if row_response.double_clicked() {
                    action = Some(EntryAction::Enter(row_idx));
                } else if row_response.clicked() {
                    action = Some(EntryAction::Select(row_idx));
                }

                let color = if entry.has_error() {
                    palette.error
                } else if entry.is_dir() {
                    palette.folder
                } else {
                    palette.file
                };

                let name_rect = paint_bold_text(
                    &painter,
                    egui::pos2(rect.left() + 8.0, rect.center().y),
                    Align2::LEFT_CENTER,
                    entry.name(),
                    &font,
                    color,
                );
                if entry.is_dir() {
                    painter.line_segment(
                        [name_rect.left_bottom(), name_rect.right_bottom()],
                        Stroke::new(1.0, color),
                    );
                }

                let size_right = rect.left() + 8.0 + name_width + COLUMN_GAP + SIZE_COLUMN_WIDTH;
                painter.text(
                    egui::pos2(size_right, rect.center().y),
                    Align2::RIGHT_CENTER,
                    format_size(entry.size(), state.format),
                    font.clone(),
                    palette.text_primary,
                );

                let bar_rect = Rect::from_min_size(
                    egui::pos2(size_right + COLUMN_GAP, rect.center().y - 6.0),
                    Vec2::new(BAR_WIDTH, 12.0),
                );
                paint_size_bar(ui, bar_rect, state.percent_of_current(entry), palette);
            }
        });

    action
}

/// egui's bundled fonts have no bold face, so the text is drawn twice,
/// [`BOLD_OFFSET`] apart. Returns the rect covering both passes.
fn paint_bold_text(
    painter: &Painter,
    pos: Pos2,
    anchor: Align2,
    text: &str,
    font: &FontId,
    color: Color32,
) -> Rect {
    let rect = painter.text(pos, anchor, text, font.clone(), color);
    painter.text(
        pos + Vec2::new(BOLD_OFFSET, 0.0),
        anchor,
        text,
        font.clone(),
        color,
    );
    Rect::from_min_max(rect.min, rect.max + Vec2::new(BOLD_OFFSET, 0.0))
}

fn row_rect(area: Rect, top_y: f32, row_idx: usize) -> Rect {
    Rect::from_min_size(
        egui::pos2(area.left(), top_y + row_idx as f32 * ROW_HEIGHT),
        Vec2::new(area.width(), ROW_HEIGHT),
    )
}
