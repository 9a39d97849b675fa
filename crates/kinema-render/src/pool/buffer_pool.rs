use std::time::{Duration, Instant};

use crate::device::{GpuContext, GpuFence};

/// Pool tuning parameters.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Smallest buffer the pool hands out. Sub-megabyte requests are rounded
    /// up so a handful of size classes cover most frames.
    pub initial_size: u64,
    /// Soft cap on total tracked bytes; exceeding it triggers a forced
    /// cleanup before new allocation.
    pub max_size: u64,
    /// Multiplier stepping allocation sizes up from `initial_size`.
    pub growth_factor: f64,
    /// Fraction of `max_size` above which the frame loop should run
    /// `cleanup` eagerly.
    pub cleanup_threshold: f64,
    /// Idle entries older than this are evicted; adapted by `optimize`.
    pub max_age: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 1 << 20,        // 1 MiB
            max_size: 256 << 20,          // 256 MiB
            growth_factor: 1.5,
            cleanup_threshold: 0.8,
            max_age: Duration::from_millis(30_000),
        }
    }
}

/// One tracked buffer.
struct PoolEntry<B> {
    id: u64,
    buffer: B,
    size: u64,
    usage: wgpu::BufferUsages,
    in_use: bool,
    last_used: Instant,
    /// Submission fence from the frame that last referenced this buffer.
    /// The entry is not reusable until it signals.
    fence: Option<GpuFence>,
}

/// A leased buffer. `id` keys the eventual `release` call.
#[derive(Debug, Clone)]
pub struct PooledBuffer {
    pub id: u64,
    pub buffer: wgpu::Buffer,
    /// Actual byte size of the underlying buffer (may exceed the request).
    pub size: u64,
}

/// Buffer pool with age-based eviction and fence-guarded reuse.
///
/// Generic over the buffer resource so the reuse/eviction policy can be
/// exercised without a GPU; production code uses `BufferPool<wgpu::Buffer>`
/// (the default). Expected pool sizes are hundreds of entries, so linear
/// scans are fine.
pub struct BufferPool<B = wgpu::Buffer> {
    entries: Vec<PoolEntry<B>>,
    config: PoolConfig,
    next_id: u64,
}

impl<B> BufferPool<B> {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            entries: Vec::new(),
            config,
            next_id: 0,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(PoolConfig::default())
    }

    // ── policy core (GPU-free) ────────────────────────────────────────────

    /// Finds a reusable entry: not in use, fence complete, same usage class,
    /// at least `size` bytes (oversized reuse is accepted), and fresh within
    /// `max_age`. First fit.
    fn reuse_index(&self, usage: wgpu::BufferUsages, size: u64, now: Instant) -> Option<usize> {
        self.entries.iter().position(|e| {
            !e.in_use
                && e.usage == usage
                && e.size >= size
                && now.saturating_duration_since(e.last_used) <= self.config.max_age
                && e.fence.as_ref().is_none_or(GpuFence::is_done)
        })
    }

    fn track(&mut self, buffer: B, usage: wgpu::BufferUsages, size: u64, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(PoolEntry {
            id,
            buffer,
            size,
            usage,
            in_use: true,
            last_used: now,
            fence: None,
        });
        id
    }

    fn mark_reused(&mut self, index: usize, now: Instant) -> u64 {
        let entry = &mut self.entries[index];
        entry.in_use = true;
        entry.last_used = now;
        entry.fence = None;
        entry.id
    }

    /// Returns the buffer to the pool.
    ///
    /// `fence` is the submission fence of the frame that last referenced the
    /// buffer; pass `None` only when the buffer never reached a command
    /// buffer. Unknown ids are ignored with a warning.
    pub fn release(&mut self, id: u64, fence: Option<GpuFence>) {
        let now = Instant::now();
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.in_use = false;
                entry.last_used = now;
                entry.fence = fence;
            }
            None => log::warn!("BufferPool: release of unknown buffer id {id}"),
        }
    }

    /// Evicts idle entries older than `max_age`.
    pub fn cleanup(&mut self) {
        self.cleanup_at(Instant::now());
    }

    fn cleanup_at(&mut self, now: Instant) {
        let max_age = self.config.max_age;
        let before = self.entries.len();
        self.entries.retain(|e| {
            e.in_use || now.saturating_duration_since(e.last_used) <= max_age
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            log::debug!("BufferPool: evicted {evicted} idle buffers");
        }
    }

    /// Same eviction, invoked imperatively (e.g. under memory pressure).
    pub fn force_cleanup(&mut self) {
        self.cleanup();
    }

    /// Adapts `max_age` to observed utilization: low utilization reclaims
    /// more aggressively, high utilization keeps buffers around longer.
    /// Simple negative feedback, clamped to [5 s, 120 s].
    pub fn optimize(&mut self) {
        let utilization = self.utilization();
        let max_age = self.config.max_age;

        if utilization < 0.5 {
            self.config.max_age = (max_age / 2).max(Duration::from_secs(5));
        } else if utilization > 0.9 {
            self.config.max_age = max_age
                .mul_f64(self.config.growth_factor)
                .min(Duration::from_secs(120));
        }
    }

    /// Fraction of tracked bytes currently leased out.
    pub fn utilization(&self) -> f64 {
        let total = self.total_bytes();
        if total == 0 {
            return 0.0;
        }
        let in_use: u64 = self.entries.iter().filter(|e| e.in_use).map(|e| e.size).sum();
        in_use as f64 / total as f64
    }

    /// Total tracked bytes. Changes only through allocate/release/cleanup.
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether tracked bytes crossed the cleanup threshold.
    pub fn needs_cleanup(&self) -> bool {
        self.total_bytes() as f64 > self.config.max_size as f64 * self.config.cleanup_threshold
    }

    pub fn max_age(&self) -> Duration {
        self.config.max_age
    }

    /// Steps size classes up from `initial_size` by `growth_factor` until
    /// the request fits. Oversized requests are served exactly.
    fn allocation_size(&self, requested: u64) -> u64 {
        let mut size = self.config.initial_size;
        while size < requested && size < self.config.max_size {
            size = (size as f64 * self.config.growth_factor).ceil() as u64;
        }
        size.max(requested)
    }
}

impl BufferPool<wgpu::Buffer> {
    /// Leases a buffer of at least `size` bytes with the given usage class.
    ///
    /// Reuses a pooled buffer when one qualifies; otherwise creates one via
    /// the GPU context (returns `None` when the device is absent). Created
    /// buffers always carry `COPY_DST` so instance data can be written in.
    pub fn allocate(
        &mut self,
        gpu: &GpuContext,
        usage: wgpu::BufferUsages,
        size: u64,
        label: &str,
    ) -> Option<PooledBuffer> {
        // Drive fence callbacks so entries from drained submissions unlock.
        gpu.poll();

        let now = Instant::now();
        let usage = usage | wgpu::BufferUsages::COPY_DST;

        if let Some(index) = self.reuse_index(usage, size, now) {
            let id = self.mark_reused(index, now);
            let entry = &self.entries[index];
            return Some(PooledBuffer {
                id,
                buffer: entry.buffer.clone(),
                size: entry.size,
            });
        }

        let alloc_size = self.allocation_size(size);
        if self.total_bytes() + alloc_size > self.config.max_size {
            self.force_cleanup();
            if self.total_bytes() + alloc_size > self.config.max_size {
                log::warn!(
                    "BufferPool: tracked bytes exceed max_size ({} MiB)",
                    self.config.max_size >> 20
                );
            }
        }

        let buffer = gpu.create_uninit_buffer(alloc_size, usage, label)?;
        let id = self.track(buffer.clone(), usage, alloc_size, now);
        Some(PooledBuffer { id, buffer, size: alloc_size })
    }

    /// Drops every entry, in use or not. For `destroy` only.
    pub fn drain(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: wgpu::BufferUsages = wgpu::BufferUsages::VERTEX;
    const UNIFORM: wgpu::BufferUsages = wgpu::BufferUsages::UNIFORM;

    fn pool() -> BufferPool<u32> {
        BufferPool::new(PoolConfig::default())
    }

    // ── reuse ─────────────────────────────────────────────────────────────

    #[test]
    fn released_buffer_is_reused_for_smaller_request() {
        let mut p = pool();
        let now = Instant::now();
        let id = p.track(7, VERTEX, 4096, now);
        p.release(id, None);

        let hit = p.reuse_index(VERTEX, 1024, now).expect("expected reuse");
        assert_eq!(p.entries[hit].id, id);
        assert_eq!(p.entries[hit].buffer, 7);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn in_use_buffer_is_not_reused() {
        let mut p = pool();
        let now = Instant::now();
        p.track(7, VERTEX, 4096, now);
        assert!(p.reuse_index(VERTEX, 1024, now).is_none());
    }

    #[test]
    fn usage_class_must_match() {
        let mut p = pool();
        let now = Instant::now();
        let id = p.track(7, VERTEX, 4096, now);
        p.release(id, None);
        assert!(p.reuse_index(UNIFORM, 1024, now).is_none());
    }

    #[test]
    fn undersized_buffer_is_not_reused() {
        let mut p = pool();
        let now = Instant::now();
        let id = p.track(7, VERTEX, 512, now);
        p.release(id, None);
        assert!(p.reuse_index(VERTEX, 1024, now).is_none());
    }

    #[test]
    fn stale_buffer_is_not_reused() {
        let mut p = pool();
        let now = Instant::now();
        let id = p.track(7, VERTEX, 4096, now);
        p.release(id, None);

        let later = now + Duration::from_secs(31);
        assert!(p.reuse_index(VERTEX, 1024, later).is_none());
    }

    #[test]
    fn pending_fence_blocks_reuse() {
        let mut p = pool();
        let now = Instant::now();
        let id = p.track(7, VERTEX, 4096, now);
        p.release(id, Some(GpuFence::new()));
        assert!(p.reuse_index(VERTEX, 1024, now).is_none());
    }

    #[test]
    fn signalled_fence_allows_reuse() {
        let mut p = pool();
        let now = Instant::now();
        let id = p.track(7, VERTEX, 4096, now);
        p.release(id, Some(GpuFence::signalled()));
        assert!(p.reuse_index(VERTEX, 1024, now).is_some());
    }

    // ── eviction ──────────────────────────────────────────────────────────

    #[test]
    fn cleanup_evicts_stale_idle_entries() {
        let mut p = pool();
        let now = Instant::now();
        let id = p.track(7, VERTEX, 4096, now);
        p.release(id, None);
        // Rewind the timestamp past max_age instead of sleeping.
        p.entries[0].last_used = now - Duration::from_secs(31);

        p.cleanup_at(now);
        assert!(p.is_empty());
        // A fresh request after eviction would miss and allocate anew.
        assert!(p.reuse_index(VERTEX, 1024, now).is_none());
    }

    #[test]
    fn cleanup_keeps_in_use_entries_regardless_of_age() {
        let mut p = pool();
        let now = Instant::now();
        p.track(7, VERTEX, 4096, now);
        p.entries[0].last_used = now - Duration::from_secs(600);

        p.cleanup_at(now);
        assert_eq!(p.len(), 1);
    }

    // ── accounting ────────────────────────────────────────────────────────

    #[test]
    fn total_bytes_tracks_entries() {
        let mut p = pool();
        let now = Instant::now();
        p.track(1, VERTEX, 1000, now);
        p.track(2, VERTEX, 2000, now);
        assert_eq!(p.total_bytes(), 3000);
    }

    #[test]
    fn utilization_is_in_use_fraction() {
        let mut p = pool();
        let now = Instant::now();
        p.track(1, VERTEX, 1000, now);
        let id = p.track(2, VERTEX, 3000, now);
        p.release(id, None);
        assert!((p.utilization() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn utilization_of_empty_pool_is_zero() {
        assert_eq!(pool().utilization(), 0.0);
    }

    // ── optimize ──────────────────────────────────────────────────────────

    #[test]
    fn optimize_shortens_max_age_when_underutilized() {
        let mut p = pool();
        let now = Instant::now();
        let id = p.track(1, VERTEX, 1000, now);
        p.release(id, None); // 0% utilization
        p.optimize();
        assert_eq!(p.max_age(), Duration::from_secs(15));
    }

    #[test]
    fn optimize_lengthens_max_age_when_saturated() {
        let mut p = pool();
        let now = Instant::now();
        p.track(1, VERTEX, 1000, now); // 100% utilization
        p.optimize();
        assert_eq!(p.max_age(), Duration::from_secs(45));
    }

    #[test]
    fn optimize_clamps_to_bounds() {
        let mut p = pool();
        let now = Instant::now();
        let id = p.track(1, VERTEX, 1000, now);
        p.release(id, None);
        for _ in 0..16 {
            p.optimize();
        }
        assert_eq!(p.max_age(), Duration::from_secs(5));
    }

    // ── sizing ────────────────────────────────────────────────────────────

    #[test]
    fn allocation_size_rounds_small_requests_to_initial() {
        let p = pool();
        assert_eq!(p.allocation_size(4096), 1 << 20);
    }

    #[test]
    fn allocation_size_grows_geometrically() {
        let p = pool();
        let size = p.allocation_size((1 << 20) + 1);
        assert_eq!(size, ((1u64 << 20) as f64 * 1.5).ceil() as u64);
    }

    #[test]
    fn release_unknown_id_is_ignored() {
        let mut p = pool();
        p.release(42, None);
        assert!(p.is_empty());
    }
}
