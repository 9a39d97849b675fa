//! Capability probes usable before any [`GpuContext`](super::GpuContext) is
//! constructed, for host-level feature gating (e.g. offering a software
//! fallback before attempting initialization).

/// Platform GPU capability summary.
#[derive(Debug, Clone)]
pub struct SupportInfo {
    /// Whether any compatible adapter exists.
    pub supported: bool,
    /// Human-readable `name (backend)` entries for each enumerated adapter.
    pub adapters: Vec<String>,
}

/// Returns `true` when the platform offers at least one GPU adapter.
pub fn is_supported() -> bool {
    !enumerate_adapters().is_empty()
}

/// Enumerates available adapters for diagnostics and host feature gating.
pub fn support_info() -> SupportInfo {
    let adapters: Vec<String> = enumerate_adapters()
        .iter()
        .map(|a| {
            let info = a.get_info();
            format!("{} ({:?})", info.name, info.backend)
        })
        .collect();

    SupportInfo {
        supported: !adapters.is_empty(),
        adapters,
    }
}

fn enumerate_adapters() -> Vec<wgpu::Adapter> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    pollster::block_on(instance.enumerate_adapters(wgpu::Backends::all()))
}
