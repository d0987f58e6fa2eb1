/// Main `eframe::App` implementation for SizeWalk.
///
/// Top bar: current directory and its size. Centre: the entry list.
/// Bottom: walk status, notifications and key help.
use crate::state::AppState;
use crate::theme::Palette;
use crate::widgets;
use crate::widgets::entry_list::EntryAction;
use sizewalk_core::model::ByteFormat;
use sizewalk_core::ScanOptions;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Repaint trigger handed to the walk's waker thread before the window
/// exists. Requests are dropped until [`RepaintSignal::attach`] is called;
/// the first frame reads the state anyway.
#[derive(Clone, Default)]
pub struct RepaintSignal {
    ctx: Arc<OnceLock<egui::Context>>,
}

impl RepaintSignal {
    pub fn attach(&self, ctx: &egui::Context) {
        let _ = self.ctx.set(ctx.clone());
    }

    pub fn request(&self) {
        if let Some(ctx) = self.ctx.get() {
            ctx.request_repaint();
        }
    }
}

/// Pre-built application state.
///
/// Construct this **before** calling `eframe::run_native` so an invalid
/// root is reported on the terminal instead of in an empty window, and so
/// the walk is already under way when the first frame is drawn.
pub struct SizeWalkState {
    pub(crate) inner: AppState,
    pub(crate) repaint: RepaintSignal,
}

impl SizeWalkState {
    pub fn build(
        path: impl AsRef<Path>,
        options: &ScanOptions,
        format: ByteFormat,
        notify_on_ready: bool,
    ) -> anyhow::Result<Self> {
        let repaint = RepaintSignal::default();
        let waker = repaint.clone();
        let inner = AppState::start(path, options, format, notify_on_ready, move || {
            waker.request()
        })?;
        Ok(Self { inner, repaint })
    }
}

/// The SizeWalk application.
pub struct SizeWalkApp {
    state: AppState,
    palette: Palette,
    window_title: String,
}

impl SizeWalkApp {
    /// Create the application from pre-built state and hook the walk's
    /// wake-ups up to egui repaints.
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: SizeWalkState) -> Self {
        let palette = Palette::dark();
        cc.egui_ctx.set_visuals(palette.visuals());
        state.repaint.attach(&cc.egui_ctx);
        Self {
            state: state.inner,
            palette,
            window_title: String::new(),
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (quit, up, down, enter, leave, copy) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Q) && !i.modifiers.ctrl,
                i.key_pressed(egui::Key::ArrowUp),
                i.key_pressed(egui::Key::ArrowDown),
                i.key_pressed(egui::Key::ArrowRight) || i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::Escape),
                i.modifiers.ctrl && i.key_pressed(egui::Key::L),
            )
        });

        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if up {
            self.state.select_prev();
        }
        if down {
            self.state.select_next();
        }
        if enter {
            self.state.enter_selected();
        }
        if leave {
            self.state.leave();
        }
        if copy {
            let path = self.state.copy_current_path();
            ctx.copy_text(path);
        }
    }
}

impl eframe::App for SizeWalkApp {
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        visuals.panel_fill.to_normalized_gamma_f32()
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Process background wake-ups ───────────────────────────────────
        self.state.process_updates();
        let now = Instant::now();
        self.state.expire_notifications(now);
        if let Some(deadline) = self.state.notification_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        self.handle_keys(ctx);

        let title = format!("SizeWalk -- {}", self.state.title());
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }

        // ── Top bar ───────────────────────────────────────────────────────
        egui::TopBottomPanel::top("title_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(self.state.title())
                        .size(14.0)
                        .strong()
                        .color(self.palette.accent),
                );
                ui.add_space(4.0);
            });

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(40.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state, &self.palette);
                ui.add_space(2.0);
            });

        // ── Central entry list ────────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            match widgets::entry_list::entry_list(ui, &mut self.state, &self.palette) {
                Some(EntryAction::Select(index)) => self.state.select(index),
                Some(EntryAction::Enter(index)) => {
                    self.state.select(index);
                    self.state.enter_selected();
                }
                None => {}
            }
        });
    }
}
