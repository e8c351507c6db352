//! Stroke lifecycle: pen strokes fade out and are swept from the store.

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;

use crate::doc::{ElementId, ElementStore, StrokeElement};

/// Remove every stroke whose age has reached `lifetime_ms`. Returns removed ids.
///
/// A stroke stamped in the future counts as age zero.
pub fn sweep_strokes(store: &mut ElementStore<StrokeElement>, now_ms: u64, lifetime_ms: u64) -> Vec<ElementId> {
    let mut removed = Vec::new();
    store.retain(|stroke| {
        let keep = now_ms.saturating_sub(stroke.created_at) < lifetime_ms;
        if !keep {
            removed.push(stroke.id.clone());
        }
        keep
    });
    removed
}

/// Render opacity for a stroke of the given age.
///
/// Full until `visible_ms`, then linear down to zero at `lifetime_ms`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stroke_opacity(age_ms: u64, visible_ms: u64, lifetime_ms: u64) -> f64 {
    if age_ms >= lifetime_ms {
        return 0.0;
    }
    if age_ms <= visible_ms {
        return 1.0;
    }
    let fade = (lifetime_ms - visible_ms) as f64;
    1.0 - (age_ms - visible_ms) as f64 / fade
}

/// Rate-limits sweeps to one per interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokeSweeper {
    interval_ms: u64,
    last_sweep: Option<u64>,
}

impl StrokeSweeper {
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms, last_sweep: None }
    }

    /// Whether a sweep should run at `now_ms`.
    #[must_use]
    pub fn due(&self, now_ms: u64) -> bool {
        self.last_sweep.is_none_or(|last| now_ms.saturating_sub(last) >= self.interval_ms)
    }

    /// Sweep when due. `None` when skipped, otherwise the removed ids.
    pub fn run(
        &mut self,
        now_ms: u64,
        store: &mut ElementStore<StrokeElement>,
        lifetime_ms: u64,
    ) -> Option<Vec<ElementId>> {
        if !self.due(now_ms) {
            return None;
        }
        self.last_sweep = Some(now_ms);
        let removed = sweep_strokes(store, now_ms, lifetime_ms);
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), now_ms, "strokes swept");
        }
        Some(removed)
    }
}
