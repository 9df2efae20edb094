use std::fmt;
use std::sync::Arc;

/// A failed attempt to retrieve a resource's text.
#[derive(Debug, Clone)]
pub enum FetchError {
    NotFound { path: String },
    Io { path: String, source: Arc<std::io::Error> },
}

impl FetchError {
    pub fn from_io(path: impl Into<String>, error: std::io::Error) -> Self {
        let path = path.into();
        if error.kind() == std::io::ErrorKind::NotFound {
            FetchError::NotFound { path }
        } else {
            FetchError::Io {
                path,
                source: Arc::new(error),
            }
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FetchError::NotFound { path } | FetchError::Io { path, .. } => path,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound { path } => write!(f, "Log file not found: {path}"),
            FetchError::Io { path, source } => write!(f, "Failed to read {path}: {source}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Io { source, .. } => Some(source.as_ref()),
            FetchError::NotFound { .. } => None,
        }
    }
}
