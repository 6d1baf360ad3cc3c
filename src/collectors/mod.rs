//! Data collectors module
//!
//! Implements collectors for the three inputs of a release:
//! - FragmentCollector: Parse `.. change::` fragment files
//! - ReleaseCollector: Read previously written release documents
//! - CommitCollector: List commits made since the last release

mod commits;
mod fragments;
mod releases;

pub use commits::CommitCollector;
pub use fragments::FragmentCollector;
pub use releases::{release_filename, ReleaseCollector};
