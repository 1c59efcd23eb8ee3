//! Error types for evergreen.
//!
//! The particle math itself cannot fail. Errors only come from the window and
//! GPU setup around it, plus a guard against building an empty weighted table.

use std::fmt;

/// Setup failures between the window and a usable wgpu device.
#[derive(Debug)]
pub enum GpuError {
    /// The window could not back a wgpu surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the window's surface.
    NoAdapter,
    /// The adapter rejected the requested features or limits.
    Device(wgpu::RequestDeviceError),
    /// A particle or instance buffer would exceed the device's `max_buffer_size`.
    BufferTooLarge {
        label: &'static str,
        size: u64,
        limit: u64,
    },
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::Surface(e) => write!(f, "Failed to create a surface for the window: {e}"),
            GpuError::NoAdapter => f.write_str("No GPU adapter can present to this window (Vulkan, Metal, DX12 or GL is required)"),
            GpuError::Device(e) => write!(f, "Adapter refused the device request: {e}"),
            GpuError::BufferTooLarge { label, size, limit } => write!(
                f,
                "{label} buffer needs {size} bytes but the device allows {limit}; lower the count"
            ),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::Surface(e) => Some(e),
            GpuError::Device(e) => Some(e),
            GpuError::NoAdapter | GpuError::BufferTooLarge { .. } => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::Surface(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::Device(e)
    }
}

/// Anything that stops [`Scene::run`](crate::Scene::run).
#[derive(Debug)]
pub enum SceneError {
    /// Creating or running the winit event loop failed.
    EventLoop(winit::error::EventLoopError),
    /// The OS refused to open the window.
    Window(winit::error::OsError),
    Gpu(GpuError),
    /// The surface failed in a way reconfiguring cannot fix.
    Surface(wgpu::SurfaceError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::EventLoop(e) => write!(f, "Event loop stopped: {e}"),
            SceneError::Window(e) => write!(f, "Failed to open the window: {e}"),
            SceneError::Gpu(e) => write!(f, "GPU setup failed: {e}"),
            SceneError::Surface(e) => write!(f, "Rendering stopped: {e}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::EventLoop(e) => Some(e),
            SceneError::Window(e) => Some(e),
            SceneError::Gpu(e) => Some(e),
            SceneError::Surface(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for SceneError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SceneError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SceneError {
    fn from(e: winit::error::OsError) -> Self {
        SceneError::Window(e)
    }
}

impl From<GpuError> for SceneError {
    fn from(e: GpuError) -> Self {
        SceneError::Gpu(e)
    }
}

/// Returned by [`WeightedTable::new`](crate::choice::WeightedTable::new).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceError {
    /// No entry had a positive, finite weight.
    Empty,
}

impl fmt::Display for ChoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Weighted table has no entry with a positive weight")
    }
}

impl std::error::Error for ChoiceError {}
