//! Error types for asset loading and scene composition

use thiserror::Error;

/// Errors raised while fetching or decoding an asset
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("invalid asset path: {0}")]
    InvalidPath(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse glTF {path}: {source}")]
    Gltf {
        path: String,
        #[source]
        source: gltf::Error,
    },
    #[error("buffer error in {path}: {reason}")]
    Buffer { path: String, reason: String },
    #[error("surface group `{group}` in {path} has no POSITION attribute")]
    MissingPositions { path: String, group: String },
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

pub type AssetResult<T> = Result<T, AssetError>;

/// Errors that fail the whole room scene
///
/// None of these are recoverable by the scene itself; they surface to
/// whatever failure boundary hosts it.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("surface group `{0}` is not present in the loaded asset")]
    UnknownSurfaceGroup(String),
    #[error("embedded material `{0}` is not present in the loaded asset")]
    UnknownMaterial(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssetError::NotFound("models/room.glb".to_string());
        assert_eq!(err.to_string(), "asset not found: models/room.glb");

        let err = SceneError::UnknownSurfaceGroup("comp_blinn1_0".to_string());
        assert_eq!(
            err.to_string(),
            "surface group `comp_blinn1_0` is not present in the loaded asset"
        );
    }

    #[test]
    fn test_asset_error_is_transparent() {
        let err: SceneError = AssetError::InvalidPath("../secret".to_string()).into();
        assert_eq!(err.to_string(), "invalid asset path: ../secret");
        assert!(matches!(err, SceneError::Asset(AssetError::InvalidPath(_))));
    }
}
