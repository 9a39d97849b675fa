use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Completion fence for a queue submission.
///
/// Returned by [`GpuContext::submit_commands`](super::GpuContext::submit_commands)
/// and handed to the buffer pool on `release`, so a buffer referenced by
/// in-flight command buffers is never reused before the GPU is done with it.
///
/// The flag is set from `wgpu::Queue::on_submitted_work_done`; callback
/// delivery is driven by [`GpuContext::poll`](super::GpuContext::poll).
#[derive(Debug, Clone)]
pub struct GpuFence {
    done: Arc<AtomicBool>,
}

impl GpuFence {
    pub(crate) fn new() -> Self {
        Self { done: Arc::new(AtomicBool::new(false)) }
    }

    /// A fence that is already complete.
    ///
    /// Used for buffers that were never referenced by a submission.
    pub fn signalled() -> Self {
        Self { done: Arc::new(AtomicBool::new(true)) }
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    pub(crate) fn signal_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn new_fence_is_pending() {
        assert!(!GpuFence::new().is_done());
    }

    #[test]
    fn signalled_fence_is_done() {
        assert!(GpuFence::signalled().is_done());
    }

    #[test]
    fn signal_handle_completes_all_clones() {
        let fence = GpuFence::new();
        let clone = fence.clone();
        fence.signal_handle().store(true, Ordering::Release);
        assert!(fence.is_done());
        assert!(clone.is_done());
    }
}
