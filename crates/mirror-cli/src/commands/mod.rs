//! Command implementations for the mirror CLI

pub mod run;

pub use run::{print_banner, run_mirror};
