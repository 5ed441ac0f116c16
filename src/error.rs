use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransparencyError {
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: WriteFailure,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Underlying cause of a failed write, either from the PNG encoder or the filesystem.
#[derive(Error, Debug)]
pub enum WriteFailure {
    #[error(transparent)]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TransparencyError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<WriteFailure>) -> Self {
        Self::Write {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransparencyError>;

// Serialized as the display string so `--json` output can report failures
impl serde::Serialize for TransparencyError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_display_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TransparencyError::write("out/win.png", io);
        let msg = err.to_string();
        assert!(msg.contains("out/win.png"), "got: {}", msg);
        assert!(msg.contains("denied"), "got: {}", msg);
    }

    #[test]
    fn test_serializes_as_string() {
        let err = TransparencyError::InvalidParameter("threshold".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Invalid parameter: threshold\"");
    }
}
