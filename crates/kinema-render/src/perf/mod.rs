//! Frame performance accounting.
//!
//! Every rendered frame produces a [`PerformanceSample`]; [`PerfHistory`]
//! keeps a bounded window of recent samples and answers budget questions
//! over it. Nothing here talks to the GPU.

mod history;

pub use history::{PerfHistory, PerformanceSample, FRAME_BUDGET_MS, HISTORY_LEN};
