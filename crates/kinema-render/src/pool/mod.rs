//! GPU buffer memory pool.
//!
//! Allocating a fresh buffer per batch per frame is the single largest
//! avoidable cost in the frame loop. The pool recycles freed buffers by
//! usage-flag class and byte size, ages out idle entries, and adapts its
//! retention window to observed utilization.

mod buffer_pool;

pub use buffer_pool::{BufferPool, PoolConfig, PooledBuffer};
