use orrery_mesh::MeshError;
use orrery_orbit::SceneError;
use orrery_render::RenderContextError;

/// Fatal startup and event-loop failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error("failed to build body mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
