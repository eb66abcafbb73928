#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod extract;

/// A key-value map backed by the linear-probing `HashTable`.
///
/// This module provides a `HashMap` that wraps the `HashTable` with the
/// pair extraction policy and provides a standard key-value map interface
/// with configurable hashers.
pub mod hash_map;

pub mod hash_table;

/// A set backed by the linear-probing `HashTable`.
///
/// This module provides a `HashSet` that wraps the `HashTable` with the
/// identity extraction policy and provides a standard set interface with
/// configurable hashers.
pub mod hash_set;

pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Default hash builder used by [`HashMap`] and [`HashSet`] when no
        /// hasher is supplied.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else {
        /// Placeholder hash builder used when the `foldhash` feature is
        /// disabled.
        ///
        /// This type is uninhabited; it exists only so the hasher type
        /// parameter of [`HashMap`] and [`HashSet`] has a default. Enable the
        /// `foldhash` feature or supply a hasher via `with_hasher`.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}
