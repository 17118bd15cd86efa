//! Process-wide GPU context shared by resources created outside of tests.

use std::sync::Arc;

use once_cell::sync::OnceCell;

pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub adapter: wgpu::Adapter,
}

static CTX: OnceCell<GpuContext> = OnceCell::new();

/// Lazily initialized device/queue singleton. Panics when no adapter exists;
/// code that must degrade gracefully creates its own device instead.
pub fn ctx() -> &'static GpuContext {
    CTX.get_or_init(|| {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .expect("No suitable GPU adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                // Default limits: the 512x512x32 storage texture exceeds the
                // downlevel 3D-texture cap of 256.
                required_limits: wgpu::Limits::default(),
                label: Some("ies-atlas-device"),
            },
            None,
        ))
        .expect("request_device failed");

        GpuContext {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter,
        }
    })
}

/// Align to WebGPU's required bytes-per-row for copies.
#[inline]
pub fn align_copy_bpr(unpadded: u32) -> u32 {
    let a = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    ((unpadded + a - 1) / a) * a
}
