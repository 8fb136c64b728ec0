//! File actions on the refined store.
//!
//! Deletion is the only mutation this tool performs on the filesystem.
//! The policy guarantees hold for every input: read-only files are
//! never removed, and a group with at least one writable member always
//! keeps at least one surviving copy unless its read-only members are
//! the survivors.

pub mod delete;

pub use delete::delete_duplicates;
