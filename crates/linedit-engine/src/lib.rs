pub mod editing;
pub mod error;
pub mod fingerprint;
pub mod io;

// Re-export key types for easier usage
pub use editing::{Document, LineBuffer, Value, NO_LIMIT};
pub use error::{BufferError, Result};
pub use fingerprint::{ByteSum, Fingerprint};
pub use io::durable::{DurableWriter, WriteError};
pub use io::IoError;
