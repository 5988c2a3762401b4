use std::fs;
use std::path::{Path, PathBuf};

pub mod durable;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file is not valid UTF-8: {0}")]
    InvalidUtf8(PathBuf),
}

/// Read a file byte-exact and return its content as a string.
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(IoError::Io)?;
    String::from_utf8(bytes).map_err(|_| IoError::InvalidUtf8(path.to_path_buf()))
}

/// Write content to a file directly, with no durability protocol.
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    fs::write(path, content).map_err(IoError::Io)
}
