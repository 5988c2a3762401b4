/*!
 * # Line Buffer Engine
 *
 * Authoritative in-memory text storage for a line editor, split into a
 * lock-free inner layer and a locked outer layer:
 *
 * - **`document`**: [`Document`], the ordered line sequence with every
 *   edit primitive. No locking; `&mut self` all the way down.
 * - **`address`**: pure grid ↔ flat-offset translation over a
 *   document snapshot.
 * - **`search`**: substring search (grid results), flat `index_of`,
 *   `split`, `substring`.
 * - **`value`**: the [`Value`] sum type accepted by `append`/`insert`.
 * - **`buffer`**: [`LineBuffer`], the per-instance monitor. All public
 *   entry points lock once and call only inner primitives, so the lock
 *   never needs to be reentrant.
 *
 * Lines are addressed 1-based. Flat char offsets are 1-based for the
 * char read/edit family and 0-based half-open for the string
 * manipulation family; see [`Document`] for the precise contract.
 */

pub mod address;
pub mod buffer;
pub mod document;
pub mod search;
pub mod value;

pub use buffer::LineBuffer;
pub use document::Document;
pub use search::NO_LIMIT;
pub use value::Value;

use crate::error::Result;

/// Parse a textual line/offset argument the way the surrounding REPL
/// hands them over. Failures propagate as
/// [`BufferError::InvalidArgument`](crate::error::BufferError::InvalidArgument).
pub fn parse_index_argument(text: &str) -> Result<i64> {
    Ok(text.trim().parse::<i64>()?)
}
