//! `mice` - Merge Isolated Chains of Elements.
//!
//! Collapses signed gene orders into synteny blocks by contracting maximal
//! non-branching chains of the extremity adjacency graph.

pub mod libs;

pub use libs::io::{reader, writer};
