// error.rs — 错误类型

use std::path::PathBuf;

/// Failures that can stop a viewing session from being mounted or drawn.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter found")]
    NoAdapter,

    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// The old session is already gone when this is returned.
    #[error("failed to remount viewer: {0}")]
    Remount(#[source] Box<ViewerError>),
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to import {}: {source}", .path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("{} contains no triangle geometry", .0.display())]
    Empty(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
