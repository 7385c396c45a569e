//! Red-black sorted collections for Rust.
//!
//! This crate provides [`SortedMap`], an ordered key-value map, and [`StrictSet`], an
//! ordered set that reports duplicate inserts as errors instead of ignoring them. Both
//! run on the same red-black tree engine:
//!
//! - Keys are ordered by an injected [`Comparator`] (defaulting to [`NaturalOrder`])
//! - Lookup, insert and delete are O(log n); tree height stays within `2·log₂(n+1)`
//! - Read-only [`KeysView`] and [`ValuesView`] projections over the live map
//! - A versioned [`Cursor`] that detects structural changes made while it was parked
//!
//! # Example
//!
//! ```
//! use redblack_map::{Error, SortedMap};
//!
//! let mut scores = SortedMap::new();
//! scores.add("Carol", 92).unwrap();
//! scores.add("Alice", 100).unwrap();
//! scores.add("Bob", 85).unwrap();
//!
//! // `add` refuses to overwrite; `insert` replaces the value in place.
//! assert_eq!(scores.add("Bob", 0), Err(Error::DuplicateKey));
//! assert_eq!(scores.insert("Bob", 88), Some(85));
//!
//! assert_eq!(scores.value_of(&"Dave"), Err(Error::KeyNotFound));
//! assert_eq!(scores.keys().iter().copied().collect::<Vec<_>>(), ["Alice", "Bob", "Carol"]);
//!
//! // A cursor remembers the version it started from.
//! let mut cursor = scores.cursor();
//! assert_eq!(cursor.move_next(&scores), Ok(true));
//! scores.remove(&"Carol");
//! assert!(cursor.move_next(&scores).is_err());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **`tracing`** - Emits `tracing` events for structural changes (off by default)
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to each other through small integer handles. Child
//! links own their subtrees; the parent link is a plain back-reference used for successor
//! walks and rebalancing, so the node graph contains no reference cycles and the crate
//! needs no `unsafe` code.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

/// Emits a `tracing` event at TRACE level when the `tracing` feature is on.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

/// Emits a `tracing` event at DEBUG level when the `tracing` feature is on.
macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}

mod error;
mod raw;

pub mod comparator;
pub mod sorted_map;
pub mod strict_set;

pub use comparator::{Comparator, NaturalOrder, Reversed};
pub use error::{CursorFault, Error, Result};
pub use sorted_map::{Cursor, KeysView, SortedMap, ValuesView};
pub use strict_set::StrictSet;
