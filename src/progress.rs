//! Loading-screen progress over the scene's video textures.
//!
//! `Loading(n) → Complete`. Ready signals push the count up; the transition
//! to `Complete` happens exactly once, when every video has reported ready.
//! Errors are logged and never counted, so a video that fails and never
//! recovers holds the overlay up indefinitely.

/// Tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Still waiting on videos.
    Loading {
        /// Videos that have reported ready so far.
        loaded: usize,
    },
    /// Every video reported ready; the overlay is gone.
    Complete,
}

/// Result of feeding one ready signal to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Rounded percentage, 0–100.
    pub percent: u32,
    /// `true` for the single update that completes loading.
    pub completed: bool,
}

/// Aggregates per-video ready events into a percentage.
#[derive(Debug)]
pub struct LoadProgressTracker {
    total: usize,
    state: LoadState,
}

impl LoadProgressTracker {
    /// Tracker expecting `total` ready signals.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            state: LoadState::Loading { loaded: 0 },
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Number of videos expected.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of videos that reported ready.
    #[must_use]
    pub fn loaded(&self) -> usize {
        match self.state {
            LoadState::Loading { loaded } => loaded,
            LoadState::Complete => self.total,
        }
    }

    /// Whether loading has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == LoadState::Complete
    }

    /// `round(loaded / total × 100)`. An empty scene counts as fully loaded.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        (self.loaded() as f64 / self.total as f64 * 100.0).round() as u32
    }

    /// Handle a scene with no videos at all: complete immediately.
    ///
    /// Returns the completing update, or `None` when there is something to
    /// wait for.
    pub fn start(&mut self) -> Option<ProgressUpdate> {
        if self.total > 0 || self.is_complete() {
            return None;
        }
        self.state = LoadState::Complete;
        Some(ProgressUpdate {
            percent: 100,
            completed: true,
        })
    }

    /// Record one ready signal. Signals after completion are ignored and
    /// return `None`.
    pub fn on_ready(&mut self) -> Option<ProgressUpdate> {
        let LoadState::Loading { loaded } = self.state else {
            return None;
        };
        let loaded = loaded + 1;
        let completed = loaded >= self.total;
        self.state = if completed {
            LoadState::Complete
        } else {
            LoadState::Loading { loaded }
        };
        Some(ProgressUpdate {
            percent: self.percent(),
            completed,
        })
    }

    /// Record a load failure. Logged only; the count is untouched.
    pub fn on_error(&self, source: &str, detail: &str) {
        log::error!("Error loading video {source}: {detail}");
    }
}
