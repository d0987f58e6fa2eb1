/// Application state management.
///
/// Centralises everything the UI reads and writes, with no egui types so it
/// can be driven from tests. The walk runs in `sizewalk-core`; this side
/// only ever re-reads the shared tree.
///
/// Wake-ups come from a small `sizewalk-waker` thread that blocks on the
/// walk's notification channel. Each tick marks the view dirty and calls the
/// supplied `wake` callback (the GUI passes a repaint request). When the
/// channel closes the thread flags the walk as done and wakes once more.
/// [`AppState::process_updates`] turns those flags into state changes once
/// per frame.
use anyhow::Context as _;
use sizewalk_core::analysis::{summarize, top_files, LargestFile, TreeSummary};
use sizewalk_core::model::{format_size, ByteFormat};
use sizewalk_core::{build_tree_with, Node, ScanOptions, WalkHandle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// How long a notification stays in the status bar.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Number of files listed under "Largest" once the walk completes.
pub const LARGEST_FILES_SHOWN: usize = 10;

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// The walk is still running; sizes are partial.
    Scanning,
    /// The walk finished; every size is exact.
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// A transient message shown in the status bar.
#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

/// All application state.
pub struct AppState {
    pub phase: AppPhase,
    pub format: ByteFormat,
    /// Show a "Ready" notification when the walk completes.
    pub notify_on_ready: bool,
    pub notification: Option<Notification>,
    /// Set when the selection moved by keyboard; the list scrolls to it and
    /// clears the flag.
    pub scroll_to_selected: bool,
    /// Whole-tree counters, computed once when the walk completes.
    pub summary: Option<TreeSummary>,
    /// Largest files of the whole tree, largest first. Empty until Ready.
    pub largest_files: Vec<LargestFile>,
    pub scan_duration: Option<Duration>,

    root: Arc<Node>,
    /// Directory whose children are listed.
    current: Arc<Node>,
    /// `current`'s children in display order, refreshed on every update.
    entries: Vec<Arc<Node>>,
    selected: usize,
    /// Entry index selected in each directory we descended from.
    previous_indices: Vec<usize>,

    scan_started: Instant,
    dirty: Arc<AtomicBool>,
    walk_done: Arc<AtomicBool>,
}

impl AppState {
    /// Start walking `path` and build the state around the live root.
    ///
    /// Fails if the root is invalid (the underlying
    /// [`RootError`](sizewalk_core::RootError) is kept as the error source)
    /// or the waker thread cannot be started.
    pub fn start(
        path: impl AsRef<Path>,
        options: &ScanOptions,
        format: ByteFormat,
        notify_on_ready: bool,
        wake: impl Fn() + Send + 'static,
    ) -> anyhow::Result<Self> {
        let WalkHandle { root, updates } = build_tree_with(path.as_ref(), options)?;

        let dirty = Arc::new(AtomicBool::new(true));
        let walk_done = Arc::new(AtomicBool::new(false));
        let waker_dirty = Arc::clone(&dirty);
        let waker_done = Arc::clone(&walk_done);
        thread::Builder::new()
            .name("sizewalk-waker".into())
            .spawn(move || {
                for () in updates.iter() {
                    waker_dirty.store(true, Ordering::Release);
                    wake();
                }
                waker_done.store(true, Ordering::Release);
                wake();
            })
            .context("failed to spawn waker thread")?;

        let mut state = Self {
            phase: AppPhase::Scanning,
            format,
            notify_on_ready,
            notification: None,
            scroll_to_selected: false,
            summary: None,
            largest_files: Vec::new(),
            scan_duration: None,
            current: Arc::clone(&root),
            root,
            entries: Vec::new(),
            selected: 0,
            previous_indices: Vec::new(),
            scan_started: Instant::now(),
            dirty,
            walk_done,
        };
        state.refresh();
        Ok(state)
    }

    /// Apply pending wake-ups. Returns `true` if anything visible changed.
    ///
    /// Call once per frame.
    pub fn process_updates(&mut self) -> bool {
        let mut changed = false;

        if self.dirty.swap(false, Ordering::AcqRel) {
            self.refresh();
            changed = true;
        }

        if self.phase == AppPhase::Scanning && self.walk_done.load(Ordering::Acquire) {
            // Every size is final now; re-read once more.
            self.refresh();
            self.phase = AppPhase::Ready;
            let duration = self.scan_started.elapsed();
            self.scan_duration = Some(duration);
            self.summary = Some(summarize(&self.root));
            self.largest_files = top_files(&self.root, LARGEST_FILES_SHOWN);
            info!(
                "Walk of {} finished in {:?}: {}",
                self.root.path().display(),
                duration,
                format_size(self.root.size(), self.format)
            );
            if self.notify_on_ready {
                self.notify(NotificationKind::Info, "Ready".to_string());
            }
            changed = true;
        }

        changed
    }

    /// Re-read and re-sort the current directory, keeping the selected entry
    /// selected even if its position moved.
    fn refresh(&mut self) {
        let previously_selected = self.entries.get(self.selected).cloned();
        self.entries = self.current.children_sorted_by_size();
        self.selected = previously_selected
            .and_then(|node| self.position_of(&node))
            .unwrap_or(self.selected)
            .min(self.entries.len().saturating_sub(1));
    }

    fn position_of(&self, node: &Arc<Node>) -> Option<usize> {
        self.entries.iter().position(|e| Arc::ptr_eq(e, node))
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn current(&self) -> &Arc<Node> {
        &self.current
    }

    /// Children of the current directory in display order.
    pub fn entries(&self) -> &[Arc<Node>] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&Arc<Node>> {
        self.entries.get(self.selected)
    }

    /// Window/list title: current path and its size.
    pub fn title(&self) -> String {
        format!(
            "{} {}",
            self.current.path().display(),
            format_size(self.current.size(), self.format)
        )
    }

    /// Select entry `index`. An entry carrying an error shows that error;
    /// any other entry clears the notification.
    pub fn select(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        self.selected = index;
        match entry.error() {
            Some(err) => {
                let text = err.to_string();
                self.notify(NotificationKind::Error, text);
            }
            None => self.notification = None,
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.select(self.selected + 1);
            self.scroll_to_selected = true;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.select(self.selected - 1);
            self.scroll_to_selected = true;
        }
    }

    /// Descend into the selected entry if it is a directory.
    pub fn enter_selected(&mut self) -> bool {
        let Some(entry) = self.selected_entry().cloned() else {
            return false;
        };
        if !entry.is_dir() {
            return false;
        }
        self.previous_indices.push(self.selected);
        self.current = entry;
        self.entries.clear();
        self.selected = 0;
        self.refresh();
        self.scroll_to_selected = true;
        true
    }

    /// Go up to the parent directory, re-selecting the directory we came from.
    pub fn leave(&mut self) -> bool {
        if Arc::ptr_eq(&self.current, &self.root) {
            return false;
        }
        let Some(parent) = self.current.parent() else {
            return false;
        };
        let came_from = std::mem::replace(&mut self.current, parent);
        let fallback = self.previous_indices.pop().unwrap_or(0);
        self.entries.clear();
        self.selected = 0;
        self.refresh();
        self.selected = self
            .position_of(&came_from)
            .unwrap_or(fallback)
            .min(self.entries.len().saturating_sub(1));
        self.scroll_to_selected = true;
        true
    }

    /// Return the current directory's path for the clipboard and confirm it
    /// in the status bar.
    pub fn copy_current_path(&mut self) -> String {
        let path = self.current.path().display().to_string();
        self.notify(
            NotificationKind::Info,
            format!("Copied '{path}' to clipboard"),
        );
        path
    }

    fn notify(&mut self, kind: NotificationKind, text: String) {
        self.notification = Some(Notification {
            text,
            kind,
            shown_at: Instant::now(),
        });
    }

    /// When the current notification should disappear.
    pub fn notification_deadline(&self) -> Option<Instant> {
        self.notification
            .as_ref()
            .map(|n| n.shown_at + NOTIFICATION_TIMEOUT)
    }

    /// Drop the notification once it has been shown long enough.
    /// Returns `true` if one was removed.
    pub fn expire_notifications(&mut self, now: Instant) -> bool {
        match self.notification_deadline() {
            Some(deadline) if now >= deadline => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }

    /// Percentage of the current directory's size taken by `node`.
    pub fn percent_of_current(&self, node: &Node) -> f32 {
        let total = self.current.size();
        if total == 0 {
            0.0
        } else {
            (node.size() as f64 / total as f64 * 100.0) as f32
        }
    }
}
