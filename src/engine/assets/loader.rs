// Asset path resolution and loading

use super::AssetError;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    /// `.animation` descriptors
    Animation,
    /// Sprite atlases the descriptors point into
    Texture,
}

impl AssetType {
    /// Get the default directory for this asset type
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Animation => "animations",
            AssetType::Texture => "textures",
        }
    }

    /// Get supported file extensions for this asset type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Animation => &["animation"],
            AssetType::Texture => &["png"],
        }
    }
}

/// Finds asset files under a base directory
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset.
    ///
    /// Absolute names are returned unchanged.
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        let name = Path::new(name);
        if name.is_absolute() {
            return name.to_path_buf();
        }

        self.base_path
            .join(asset_type.default_directory())
            .join(name)
    }

    /// Read a text asset such as a descriptor
    pub fn load_text(&self, asset_type: AssetType, name: &str) -> Result<String, AssetError> {
        let path = self.resolve_path(asset_type, name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        std::fs::read_to_string(&path)
            .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", name, e)))
    }

    /// Check if an asset exists
    pub fn exists(&self, asset_type: AssetType, name: &str) -> bool {
        self.resolve_path(asset_type, name).exists()
    }

    /// List all assets of a given type, sorted by name
    pub fn list_assets(&self, asset_type: AssetType) -> Result<Vec<String>, AssetError> {
        let dir = self.base_path.join(asset_type.default_directory());

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut assets = Vec::new();
        let extensions = asset_type.extensions();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            let matches = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| extensions.contains(&ext.to_string_lossy().as_ref()));

            if matches {
                if let Some(name) = path.file_name() {
                    assets.push(name.to_string_lossy().to_string());
                }
            }
        }

        assets.sort();
        Ok(assets)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_directories() {
        assert_eq!(AssetType::Animation.default_directory(), "animations");
        assert_eq!(AssetType::Texture.default_directory(), "textures");
    }

    #[test]
    fn test_asset_type_extensions() {
        assert!(AssetType::Animation.extensions().contains(&"animation"));
        assert!(AssetType::Texture.extensions().contains(&"png"));
    }

    #[test]
    fn test_loader_path_resolution() {
        let loader = AssetLoader::new("/game/resources");
        let path = loader.resolve_path(AssetType::Animation, "navi.animation");

        assert_eq!(
            path.to_str().unwrap(),
            "/game/resources/animations/navi.animation"
        );
        assert_eq!(
            loader.resolve_path(AssetType::Animation, "/tmp/x.animation"),
            PathBuf::from("/tmp/x.animation")
        );
    }

    #[test]
    fn test_load_text_and_list() {
        let base = std::env::temp_dir().join("netbattle_loader_test");
        let dir = base.join("animations");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.animation"), "animation state=\"B\"\n").unwrap();
        std::fs::write(dir.join("a.animation"), "animation state=\"A\"\n").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let loader = AssetLoader::new(&base);
        assert!(loader.exists(AssetType::Animation, "a.animation"));
        assert_eq!(
            loader.load_text(AssetType::Animation, "a.animation").unwrap(),
            "animation state=\"A\"\n"
        );
        assert_eq!(
            loader.list_assets(AssetType::Animation).unwrap(),
            vec!["a.animation".to_string(), "b.animation".to_string()]
        );
        assert!(loader.list_assets(AssetType::Texture).unwrap().is_empty());

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_load_missing() {
        let loader = AssetLoader::new("/nonexistent");
        let err = loader
            .load_text(AssetType::Animation, "ghost.animation")
            .unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }
}
