//! rcs core - storage primitives for versioned text files
//!
//! This crate provides the leaf layer the version chain is built on:
//! - BLAKE3 content digests and version identifiers
//! - Reversible text deltas
//! - Atomic write-temp-then-rename file replacement
//! - The shared error taxonomy

pub mod delta;
pub mod error;
pub mod hash;
pub mod store;

// Re-export main types for convenience
pub use error::{RcsError, Result};
pub use hash::{hash_bytes, Blake3Hash, VersionId, ROOT_VERSION};
pub use store::{stage_write, StagedWrite};
