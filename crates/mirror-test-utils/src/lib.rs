//! Shared test utilities for the folder-mirror workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: snapshots of directory trees and mirror assertions
//! - [`fixture`]: [`MirrorFixture`] with a source and a replica directory

pub mod fixture;
pub mod tree;

pub use fixture::MirrorFixture;
pub use tree::{Node, assert_mirrored, snapshot};
