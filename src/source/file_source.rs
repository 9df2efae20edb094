use super::{FetchError, LogSource, ResourceId};
use dirs::home_dir;
use std::path::PathBuf;

/// Reads the whole file on every fetch. Invalid UTF-8 is replaced rather
/// than rejected, since log files routinely contain stray bytes.
#[derive(Debug, Default, Clone)]
pub struct FileSource;

impl FileSource {
    pub fn new() -> Self {
        Self
    }
}

impl LogSource for FileSource {
    fn fetch_text(&self, resource: &ResourceId) -> Result<String, FetchError> {
        let bytes = std::fs::read(resource.path())
            .map_err(|e| FetchError::from_io(resource.to_string(), e))?;

        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
