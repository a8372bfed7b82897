use crate::imaging::BackendError;

/// Convenience result type used across the editor.
pub type EditResult<T> = Result<T, EditError>;

/// Errors surfaced by editing operations.
///
/// Undo, redo and reset on empty history are defined no-ops and never
/// produce one of these.
#[derive(thiserror::Error, Debug)]
pub enum EditError {
    /// Missing selection, non-positive size, or nothing to crop.
    #[error("invalid crop: {0}")]
    InvalidCrop(String),

    /// An operation that needs pixels ran before any upload.
    #[error("no image loaded")]
    EmptyImage,

    /// The raster backend could not decode an upload.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// Any other raster backend failure.
    #[error("raster backend error: {0}")]
    Backend(#[source] BackendError),
}

impl EditError {
    /// Build an [`EditError::InvalidCrop`] value.
    pub fn invalid_crop(msg: impl Into<String>) -> Self {
        Self::InvalidCrop(msg.into())
    }
}

impl From<BackendError> for EditError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Decode(msg) => EditError::Decode(msg),
            other => EditError::Backend(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            EditError::invalid_crop("x")
                .to_string()
                .starts_with("invalid crop:")
        );
        assert_eq!(EditError::EmptyImage.to_string(), "no image loaded");
        assert!(
            EditError::UnknownPreset("noir".into())
                .to_string()
                .contains("noir")
        );
    }

    #[test]
    fn backend_decode_maps_to_decode_unchanged() {
        let err: EditError = BackendError::Decode("bad header".into()).into();
        assert!(matches!(err, EditError::Decode(ref msg) if msg == "bad header"));
    }

    #[test]
    fn other_backend_errors_keep_source() {
        use std::error::Error;

        let err: EditError = BackendError::Encode("boom".into()).into();
        assert!(matches!(err, EditError::Backend(BackendError::Encode(_))));
        assert!(err.source().unwrap().to_string().contains("boom"));
    }
}
