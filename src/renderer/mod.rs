pub mod camera;
pub mod controls;
pub mod gpu;
pub mod mesh_buffers;
pub mod viewport;

pub use camera::PerspectiveCamera;
pub use controls::OrbitControls;
pub use gpu::GpuState;
pub use viewport::Viewport;
