/// Colour palette for SizeWalk.
///
/// All colour constants are defined here so the rest of the UI code
/// references semantically-named values rather than raw hex codes.
use egui::{Color32, Visuals};

/// Semantic colour palette.
pub struct Palette {
    pub background: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub folder: Color32,
    pub file: Color32,
    pub error: Color32,
    pub selection: Color32,
    pub hover: Color32,
    pub bar_track: Color32,
    pub bar_small: Color32,
    pub bar_large: Color32,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(0x1e, 0x1e, 0x2e),
            text_primary: Color32::from_rgb(0xe4, 0xe4, 0xe8),
            text_muted: Color32::from_rgb(0x6c, 0x70, 0x86),
            accent: Color32::from_rgb(0x89, 0xb4, 0xfa),
            folder: Color32::from_rgb(0xf9, 0xe2, 0xaf),
            file: Color32::from_rgb(0xe4, 0xe4, 0xe8),
            error: Color32::from_rgb(0xf3, 0x8b, 0xa8),
            selection: Color32::from_rgb(0x45, 0x47, 0x5a),
            hover: Color32::from_rgb(0x35, 0x35, 0x4a),
            bar_track: Color32::from_rgb(0x2a, 0x2a, 0x3c),
            bar_small: Color32::from_rgb(0xa6, 0xe3, 0xa1),
            bar_large: Color32::from_rgb(0xfa, 0xb3, 0x87),
        }
    }

    /// egui visuals matching this palette.
    pub fn visuals(&self) -> Visuals {
        let mut visuals = Visuals::dark();
        visuals.panel_fill = self.background;
        visuals.window_fill = self.background;
        visuals.extreme_bg_color = self.background;
        visuals.selection.bg_fill = self.selection;
        visuals.hyperlink_color = self.accent;
        visuals.override_text_color = Some(self.text_primary);
        visuals
    }
}
