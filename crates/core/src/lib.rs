//! Domain types and pure logic for the Open Paws adoption backend.
//!
//! Nothing in this crate performs I/O: upload rules, submission
//! validation, analysis parsing, and prompt construction live here so the
//! database, AI and HTTP layers can share them.

pub mod analysis;
pub mod animal;
pub mod error;
pub mod prompt;
pub mod search;
pub mod types;
pub mod upload;
