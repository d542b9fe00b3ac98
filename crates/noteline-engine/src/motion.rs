//! Row animation state machine.
//!
//! Each timeline row moves through `Entering -> Present -> Exiting`. Rows
//! fade in from near-zero opacity, entering siblings are staggered by a
//! fixed delay, and removed rows fade out before they are dropped. Rows are
//! identified by note `id`, so reorders and title or active changes keep
//! their animation state.

use std::time::Duration;

use crate::note::NoteId;
use crate::timeline::TimelineRow;

/// Opacity of a row before it has entered and after it has exited.
pub const HIDDEN_OPACITY: f32 = 0.0001;

/// Animation phase of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPhase {
    Entering,
    Present,
    Exiting,
}

/// Durations driving row animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionTiming {
    /// Delay added per entering sibling.
    pub stagger: Duration,
    /// Fade-in and fade-out duration.
    pub fade: Duration,
    /// Slide-in duration of the active indicator.
    pub indicator: Duration,
}

impl Default for MotionTiming {
    fn default() -> Self {
        Self {
            stagger: Duration::from_millis(500),
            fade: Duration::from_millis(300),
            indicator: Duration::from_millis(200),
        }
    }
}

fn fraction(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Animation state of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMotion {
    phase: RowPhase,
    /// Delay remaining before the current transition starts.
    wait: Duration,
    /// Time spent in the current transition.
    elapsed: Duration,
    /// Opacity when the current transition started.
    from: f32,
    opacity: f32,
    /// Time since the active indicator appeared.
    indicator: Option<Duration>,
}

impl RowMotion {
    /// A row that starts entering after `delay`.
    pub fn entering(delay: Duration) -> Self {
        Self {
            phase: RowPhase::Entering,
            wait: delay,
            elapsed: Duration::ZERO,
            from: HIDDEN_OPACITY,
            opacity: HIDDEN_OPACITY,
            indicator: None,
        }
    }

    pub fn phase(&self) -> RowPhase {
        self.phase
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Start fading out from the current opacity.
    pub fn exit(&mut self) {
        if self.phase == RowPhase::Exiting {
            return;
        }
        self.phase = RowPhase::Exiting;
        self.wait = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.from = self.opacity;
    }

    /// Cancel an exit and fade back in from the current opacity.
    pub fn reenter(&mut self) {
        if self.phase != RowPhase::Exiting {
            return;
        }
        self.phase = RowPhase::Entering;
        self.wait = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.from = self.opacity;
    }

    /// Show or hide the active indicator.
    pub fn set_active(&mut self, active: bool) {
        match (active, self.indicator) {
            (true, None) => self.indicator = Some(Duration::ZERO),
            (false, Some(_)) => self.indicator = None,
            _ => {}
        }
    }

    /// Indicator slide-in progress in `0.0..=1.0`, `None` when inactive.
    pub fn indicator_progress(&self, timing: &MotionTiming) -> Option<f32> {
        self.indicator
            .map(|elapsed| fraction(elapsed, timing.indicator))
    }

    /// Whether an exiting row has fully faded out.
    pub fn is_finished(&self, timing: &MotionTiming) -> bool {
        self.phase == RowPhase::Exiting && self.elapsed >= timing.fade
    }

    /// Whether any transition is still running.
    pub fn is_animating(&self, timing: &MotionTiming) -> bool {
        let indicator_running = self
            .indicator
            .is_some_and(|elapsed| elapsed < timing.indicator);
        self.phase != RowPhase::Present || indicator_running
    }

    /// Advance the row by `dt`.
    pub fn advance(&mut self, dt: Duration, timing: &MotionTiming) {
        if let Some(elapsed) = self.indicator.as_mut() {
            *elapsed = (*elapsed + dt).min(timing.indicator);
        }

        let mut dt = dt;
        if !self.wait.is_zero() {
            let waited = dt.min(self.wait);
            self.wait -= waited;
            dt -= waited;
        }

        match self.phase {
            RowPhase::Present => {}
            RowPhase::Entering => {
                self.elapsed = (self.elapsed + dt).min(timing.fade);
                let t = fraction(self.elapsed, timing.fade);
                self.opacity = lerp(self.from, 1.0, t);
                if t >= 1.0 {
                    self.phase = RowPhase::Present;
                    self.opacity = 1.0;
                }
            }
            RowPhase::Exiting => {
                self.elapsed = (self.elapsed + dt).min(timing.fade);
                let t = fraction(self.elapsed, timing.fade);
                self.opacity = lerp(self.from, HIDDEN_OPACITY, t);
            }
        }
    }
}

/// A row together with its animation state.
#[derive(Debug, Clone)]
pub struct AnimatedRow {
    pub row: TimelineRow,
    pub motion: RowMotion,
}

/// Animation bookkeeping for the whole timeline list.
#[derive(Debug, Default)]
pub struct ListMotion {
    rows: Vec<AnimatedRow>,
    timing: MotionTiming,
}

impl ListMotion {
    pub fn new(timing: MotionTiming) -> Self {
        Self {
            rows: Vec::new(),
            timing,
        }
    }

    pub fn timing(&self) -> &MotionTiming {
        &self.timing
    }

    /// All tracked rows, including ones still fading out.
    pub fn rows(&self) -> &[AnimatedRow] {
        &self.rows
    }

    /// Rows that are not exiting, in display order.
    pub fn live_rows(&self) -> impl Iterator<Item = &AnimatedRow> {
        self.rows
            .iter()
            .filter(|r| r.motion.phase() != RowPhase::Exiting)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row is mid-transition.
    pub fn is_animating(&self) -> bool {
        self.rows.iter().any(|r| r.motion.is_animating(&self.timing))
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.rows.iter().position(|r| &r.row.id == id)
    }

    /// Reconcile tracked rows with a freshly derived row list.
    ///
    /// Rows are matched by `id`. Matched rows keep their motion; new rows
    /// enter with a stagger by their order among the newcomers; rows no
    /// longer present start exiting in place. Returns true if anything
    /// changed.
    pub fn reconcile(&mut self, next: &[TimelineRow]) -> bool {
        let mut changed = false;
        let mut newcomers = 0u32;
        let mut merged: Vec<AnimatedRow> = Vec::with_capacity(next.len() + self.rows.len());

        for row in next {
            match self.position(&row.id) {
                Some(idx) => {
                    let mut tracked = self.rows[idx].clone();
                    if tracked.row != *row {
                        tracked.row = row.clone();
                        changed = true;
                    }
                    if tracked.motion.phase() == RowPhase::Exiting {
                        tracked.motion.reenter();
                        changed = true;
                    }
                    tracked.motion.set_active(row.active);
                    merged.push(tracked);
                }
                None => {
                    let mut motion = RowMotion::entering(self.timing.stagger * newcomers);
                    motion.set_active(row.active);
                    newcomers += 1;
                    merged.push(AnimatedRow {
                        row: row.clone(),
                        motion,
                    });
                    changed = true;
                }
            }
        }

        // Departed rows fade out where they were.
        for (old_idx, tracked) in self.rows.iter().enumerate() {
            if next.iter().any(|r| r.id == tracked.row.id) {
                continue;
            }
            let mut departed = tracked.clone();
            if departed.motion.phase() != RowPhase::Exiting {
                departed.motion.exit();
                changed = true;
            }
            let at = old_idx.min(merged.len());
            merged.insert(at, departed);
        }

        if merged.iter().map(|r| &r.row.id).ne(self.rows.iter().map(|r| &r.row.id)) {
            changed = true;
        }
        self.rows = merged;
        changed
    }

    /// Advance every row by `dt` and drop rows that finished exiting.
    pub fn tick(&mut self, dt: Duration) {
        let timing = self.timing;
        for tracked in &mut self.rows {
            tracked.motion.advance(dt, &timing);
        }
        self.rows.retain(|r| !r.motion.is_finished(&timing));
    }
}
