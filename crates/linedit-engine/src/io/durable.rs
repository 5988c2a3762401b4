//! Atomic-write-with-verification persistence.
//!
//! The buffer's flat text is first written to a uniquely named temp
//! file, then renamed onto the target. When the rename cannot land
//! (cross-filesystem targets, most commonly) the writer falls back to a
//! stream copy and verifies the result: size, then bytes, then every
//! configured [`Fingerprint`] provider. The target is never left
//! half-written: either the rename landed, the verified copy landed,
//! or the target is untouched and an error is raised.
//!
//! Every failure after temp-file creation carries the temp file's path,
//! appended to the message after a `;`, so a human or script can
//! recover the content.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::fingerprint::{ByteSum, Fingerprint};

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("unable to create temporary file: {source}")]
    TempFileCreation { source: std::io::Error },

    #[error("unable to write temporary file: {source}; {}", .temp_path.display())]
    Write {
        source: std::io::Error,
        temp_path: PathBuf,
    },

    #[error("unable to copy temporary file to '{}': {source}; {}", .target.display(), .temp_path.display())]
    Copy {
        target: PathBuf,
        source: std::io::Error,
        temp_path: PathBuf,
    },

    #[error("unable to read files back for verification: {source}; {}", .temp_path.display())]
    VerifyIo {
        source: std::io::Error,
        temp_path: PathBuf,
    },

    #[error("size mismatch after copy (temporary file {expected} bytes, target {actual} bytes); {}", .temp_path.display())]
    SizeMismatch {
        expected: usize,
        actual: usize,
        temp_path: PathBuf,
    },

    #[error("content mismatch after copy; {}", .temp_path.display())]
    ContentMismatch { temp_path: PathBuf },

    #[error("fingerprint mismatch after copy ({provider}); {}", .temp_path.display())]
    FingerprintMismatch {
        provider: &'static str,
        temp_path: PathBuf,
    },

    #[error("target written but unable to remove temporary file: {source}; {}", .temp_path.display())]
    Cleanup {
        source: std::io::Error,
        temp_path: PathBuf,
    },
}

impl WriteError {
    /// Path of the leftover temp file, for recovery. `None` only when
    /// temp-file creation itself failed.
    pub fn temp_path(&self) -> Option<&Path> {
        match self {
            WriteError::TempFileCreation { .. } => None,
            WriteError::Write { temp_path, .. }
            | WriteError::Copy { temp_path, .. }
            | WriteError::VerifyIo { temp_path, .. }
            | WriteError::SizeMismatch { temp_path, .. }
            | WriteError::ContentMismatch { temp_path }
            | WriteError::FingerprintMismatch { temp_path, .. }
            | WriteError::Cleanup { temp_path, .. } => Some(temp_path),
        }
    }
}

/// Writer implementing the temp-file / rename / verified-copy protocol.
///
/// Fingerprint providers are a redundancy belt on top of the byte
/// comparison; the default writer carries [`ByteSum`] and additional
/// providers can be stacked with [`with_fingerprint`](Self::with_fingerprint).
pub struct DurableWriter {
    fingerprints: Vec<Box<dyn Fingerprint>>,
}

impl Default for DurableWriter {
    fn default() -> Self {
        DurableWriter {
            fingerprints: vec![Box::new(ByteSum)],
        }
    }
}

impl DurableWriter {
    /// A writer with no fingerprint providers; verification stops at
    /// the byte comparison.
    pub fn bare() -> Self {
        DurableWriter {
            fingerprints: Vec::new(),
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: Box<dyn Fingerprint>) -> Self {
        self.fingerprints.push(fingerprint);
        self
    }

    /// Write `bytes` to `target` durably.
    pub fn write(&self, target: &Path, bytes: &[u8]) -> Result<(), WriteError> {
        let mut tmp =
            NamedTempFile::new().map_err(|source| WriteError::TempFileCreation { source })?;

        if let Err(source) = tmp.write_all(bytes).and_then(|_| tmp.flush()) {
            let temp_path = keep_for_recovery(tmp);
            return Err(WriteError::Write { source, temp_path });
        }

        match tmp.persist(target) {
            Ok(_) => Ok(()),
            Err(persist_err) => {
                debug!(
                    "rename onto '{}' failed ({}), falling back to verified copy",
                    target.display(),
                    persist_err.error
                );
                self.copy_and_verify(persist_err.file, target)
            }
        }
    }

    /// Fallback path: stream-copy the temp file onto the target, verify
    /// the result, then remove the temp file.
    fn copy_and_verify(&self, tmp: NamedTempFile, target: &Path) -> Result<(), WriteError> {
        if let Err(source) = fs::copy(tmp.path(), target) {
            let temp_path = keep_for_recovery(tmp);
            return Err(WriteError::Copy {
                target: target.to_path_buf(),
                source,
                temp_path,
            });
        }

        if let Err(err) = self.verify(tmp.path(), target) {
            keep_for_recovery(tmp);
            return Err(err);
        }

        let temp_path = tmp.path().to_path_buf();
        tmp.close().map_err(|source| {
            warn!(
                "durable write landed but temp file '{}' was left behind",
                temp_path.display()
            );
            WriteError::Cleanup { source, temp_path }
        })
    }

    /// Compare the temp file against the target: size first, then
    /// byte-for-byte, then each fingerprint provider.
    fn verify(&self, temp_path: &Path, target: &Path) -> Result<(), WriteError> {
        let read = |path: &Path| {
            fs::read(path).map_err(|source| WriteError::VerifyIo {
                source,
                temp_path: temp_path.to_path_buf(),
            })
        };
        let expected = read(temp_path)?;
        let actual = read(target)?;

        if expected.len() != actual.len() {
            return Err(WriteError::SizeMismatch {
                expected: expected.len(),
                actual: actual.len(),
                temp_path: temp_path.to_path_buf(),
            });
        }
        if expected != actual {
            return Err(WriteError::ContentMismatch {
                temp_path: temp_path.to_path_buf(),
            });
        }
        for fingerprint in &self.fingerprints {
            if !fingerprint.equal(&expected, &actual) {
                return Err(WriteError::FingerprintMismatch {
                    provider: fingerprint.name(),
                    temp_path: temp_path.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}

/// Disarm the temp file's delete-on-drop so a failed write can be
/// recovered manually, and return its path for the error message.
fn keep_for_recovery(tmp: NamedTempFile) -> PathBuf {
    let path = tmp.path().to_path_buf();
    if let Err(err) = tmp.keep() {
        warn!("unable to keep temp file for recovery: {err}");
    }
    path
}
