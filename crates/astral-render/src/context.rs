//! GPU device initialization and thread-affinity tracking.

use std::thread::{self, ThreadId};

/// Owns the wgpu device and queue, pinned to the thread that created it.
///
/// Buffer uploads must happen on the owning thread; background workers hand
/// their finished meshes back through a main-thread task queue instead of
/// touching the device directly.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    owner: ThreadId,
}

impl GpuContext {
    /// Wraps an already-created device and queue, recording the calling
    /// thread as the owner.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            owner: thread::current().id(),
        }
    }

    /// True when called from the thread that created this context.
    pub fn is_context_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Largest buffer the device accepts, in bytes.
    pub fn max_buffer_size(&self) -> u64 {
        self.device.limits().max_buffer_size
    }
}

/// Acquire a device without a window surface, for headless operation.
///
/// Returns `None` when no adapter or device is available; the chunk pipeline
/// then runs CPU-only and skips the upload stage.
pub fn acquire_headless_context() -> Option<GpuContext> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(_) => {
                log::warn!("No compatible GPU adapter; running without uploads");
                return None;
            }
        };

        let info = adapter.get_info();
        log::info!(
            "Selected GPU: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        match adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("astral-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
        {
            Ok((device, queue)) => Some(GpuContext::new(device, queue)),
            Err(err) => {
                log::warn!("GPU device request failed: {err}");
                None
            }
        }
    })
}
