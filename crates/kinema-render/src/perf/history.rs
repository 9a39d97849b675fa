use std::collections::VecDeque;

/// Target frame budget for 60 fps output.
pub const FRAME_BUDGET_MS: f32 = 16.67;

/// Samples retained, one second of history at 60 fps.
pub const HISTORY_LEN: usize = 60;

// Budget verdicts average over the last few frames so a single hitch
// doesn't flip them.
const BUDGET_WINDOW: usize = 10;

/// Metrics for one rendered frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PerformanceSample {
    pub frame_time_ms: f32,
    /// Draw calls that reached the render pass this frame.
    pub draw_calls: u32,
    /// Triangles drawn this frame; batches that failed to encode count zero.
    pub triangles: u32,
    pub vertices: u32,
    /// Pool bytes currently retained, in MiB.
    pub memory_mb: f32,
    pub batches: u32,
    /// Drawables accepted this frame, after culling.
    pub drawables: u32,
    /// Fraction of drawables removed by viewport culling, in [0, 1].
    pub culling_ratio: f32,
}

/// Bounded FIFO of recent frame samples.
#[derive(Debug, Default)]
pub struct PerfHistory {
    samples: VecDeque<PerformanceSample>,
}

impl PerfHistory {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    pub fn push(&mut self, sample: PerformanceSample) {
        if self.samples.len() == HISTORY_LEN {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&PerformanceSample> {
        self.samples.back()
    }

    /// Retained samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PerformanceSample> {
        self.samples.iter()
    }

    /// Mean frame time over the budget window.
    pub fn recent_frame_time_ms(&self) -> f32 {
        let window = self.samples.iter().rev().take(BUDGET_WINDOW);
        let n = window.clone().count();
        if n == 0 {
            return 0.0;
        }
        window.map(|s| s.frame_time_ms).sum::<f32>() / n as f32
    }

    /// True while the recent average stays under the 60 fps budget.
    ///
    /// An empty history is within budget; a renderer that hasn't drawn yet
    /// has nothing to complain about.
    pub fn is_within_budget(&self) -> bool {
        self.recent_frame_time_ms() <= FRAME_BUDGET_MS
    }

    /// Human-readable tuning hints derived from the latest sample.
    pub fn recommendations(&self) -> Vec<String> {
        let mut out = Vec::new();
        let Some(latest) = self.latest() else {
            return out;
        };

        if !self.is_within_budget() {
            out.push(format!(
                "frame time {:.2}ms exceeds the {FRAME_BUDGET_MS}ms budget",
                self.recent_frame_time_ms()
            ));
        }
        if latest.draw_calls > 50 {
            out.push(format!(
                "{} draw calls; increase batching or reduce distinct materials",
                latest.draw_calls
            ));
        }
        if latest.memory_mb > 100.0 {
            out.push(format!(
                "{:.1}MiB retained in the buffer pool; consider a cleanup pass",
                latest.memory_mb
            ));
        }
        if latest.batches > 0 && latest.batches < latest.drawables / 10 {
            out.push(format!(
                "low batch utilization: {} batches for {} drawables",
                latest.batches, latest.drawables
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(frame_time_ms: f32) -> PerformanceSample {
        PerformanceSample {
            frame_time_ms,
            ..Default::default()
        }
    }

    // ── ring bound ────────────────────────────────────────────────────────

    #[test]
    fn history_is_bounded_fifo() {
        let mut h = PerfHistory::new();
        for i in 0..100 {
            h.push(sample(i as f32));
        }
        assert_eq!(h.len(), HISTORY_LEN);
        // Oldest 40 were dropped; the newest survives.
        assert_eq!(h.latest().unwrap().frame_time_ms, 99.0);
    }

    // ── budget ────────────────────────────────────────────────────────────

    #[test]
    fn empty_history_is_within_budget() {
        assert!(PerfHistory::new().is_within_budget());
    }

    #[test]
    fn budget_uses_recent_window_not_full_history() {
        let mut h = PerfHistory::new();
        for _ in 0..50 {
            h.push(sample(40.0));
        }
        // Ten fast frames pull the window back under budget.
        for _ in 0..10 {
            h.push(sample(8.0));
        }
        assert!(h.is_within_budget());
    }

    #[test]
    fn sustained_slow_frames_break_budget() {
        let mut h = PerfHistory::new();
        for _ in 0..10 {
            h.push(sample(25.0));
        }
        assert!(!h.is_within_budget());
    }

    // ── recommendations ───────────────────────────────────────────────────

    #[test]
    fn no_samples_no_recommendations() {
        assert!(PerfHistory::new().recommendations().is_empty());
    }

    #[test]
    fn healthy_frame_yields_no_recommendations() {
        let mut h = PerfHistory::new();
        h.push(PerformanceSample {
            frame_time_ms: 5.0,
            draw_calls: 3,
            memory_mb: 12.0,
            ..Default::default()
        });
        assert!(h.recommendations().is_empty());
    }

    #[test]
    fn excessive_draw_calls_flagged() {
        let mut h = PerfHistory::new();
        h.push(PerformanceSample {
            frame_time_ms: 5.0,
            draw_calls: 80,
            ..Default::default()
        });
        let recs = h.recommendations();
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("draw calls"));
    }

    #[test]
    fn high_memory_flagged() {
        let mut h = PerfHistory::new();
        h.push(PerformanceSample {
            frame_time_ms: 5.0,
            memory_mb: 300.0,
            ..Default::default()
        });
        assert!(h.recommendations().iter().any(|r| r.contains("MiB")));
    }

    #[test]
    fn over_budget_flagged() {
        let mut h = PerfHistory::new();
        for _ in 0..10 {
            h.push(sample(30.0));
        }
        assert!(h.recommendations().iter().any(|r| r.contains("budget")));
    }

    #[test]
    fn low_batch_utilization_flagged() {
        let mut h = PerfHistory::new();
        h.push(PerformanceSample {
            frame_time_ms: 5.0,
            batches: 5,
            drawables: 1000,
            ..Default::default()
        });
        assert!(h.recommendations().iter().any(|r| r.contains("utilization")));

        h.push(PerformanceSample {
            frame_time_ms: 5.0,
            batches: 5,
            drawables: 40,
            ..Default::default()
        });
        assert!(h.recommendations().is_empty());
    }
}
