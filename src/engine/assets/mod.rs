// Asset lookup and hot-reloading for animation descriptors

mod hot_reload;
mod loader;

pub use hot_reload::HotReloadWatcher;
pub use loader::{AssetLoader, AssetType};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
