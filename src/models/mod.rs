//! Data models module
//!
//! Defines domain models for fragments, commits, and releases.
//! Includes ChangeKind, Fragment, Commit, ReleaseDoc, Release, Status.

pub mod fragment;
pub mod release;

pub use fragment::{ChangeKind, Commit, Fragment, ReleaseDoc};
pub use release::{Release, Status};
