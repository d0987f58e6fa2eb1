/// Proportional size bar -- shows an entry's share of its directory.
use crate::theme::Palette;
use egui::{Color32, Rect, Ui, Vec2};

/// Paint a horizontal size bar into `rect`.
pub fn paint_size_bar(ui: &Ui, rect: Rect, percent: f32, palette: &Palette) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 2.0, palette.bar_track);

    let fill_w = rect.width() * (percent / 100.0).clamp(0.0, 1.0);
    if fill_w > 0.5 {
        let fill_rect = Rect::from_min_size(rect.min, Vec2::new(fill_w, rect.height()));
        painter.rect_filled(fill_rect, 2.0, bar_color(percent, palette));
    }
}

/// Interpolate from the "small" to the "large" colour by percentage.
fn bar_color(percent: f32, palette: &Palette) -> Color32 {
    let t = (percent / 100.0).clamp(0.0, 1.0);
    let (a, b) = (palette.bar_small, palette.bar_large);
    let mix = |x: u8, y: u8| (x as f32 * (1.0 - t) + y as f32 * t) as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}
