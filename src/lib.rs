//! # ordmap
//!
//! A persistent ordered map for Rust, built on an AVL tree.
//!
//! ## Overview
//!
//! Maps in this crate are immutable values. Inserting or removing a key
//! returns a new map and leaves the original untouched; both versions share
//! every subtree the update did not touch, so keeping old versions around
//! costs only the rebuilt path.
//!
//! - **Balanced**: every operation that locates a key is O(log N)
//! - **Ordered**: keys are kept sorted by a pluggable [`Comparator`](persistent::Comparator)
//! - **Resumable iteration**: cursors over the whole map or starting from
//!   any key, in either direction, driven by an explicit stack
//!
//! ## Feature Flags
//!
//! - `arc` (default): share nodes through `Arc` so maps are `Send + Sync`;
//!   without it nodes use the cheaper `Rc`
//! - `serde`: implements `Serialize`/`Deserialize` so maps and entries plug
//!   into any serde data format; the crate defines no encoding of its own
//!
//! ## Example
//!
//! ```rust
//! use ordmap::prelude::*;
//!
//! let empty: PersistentTreeMap<i32, &str> = PersistentTreeMap::new();
//! let latest = empty.insert(2, "b").insert(1, "a");
//!
//! assert!(empty.is_empty());
//! assert_eq!(latest.min().map(Entry::as_pair), Some((&1, &"a")));
//! assert_eq!(latest.iter_backward().next(), Some((&2, &"b")));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the map, its entry and iterator types, and the comparators.
///
/// # Usage
///
/// ```rust
/// use ordmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
