//! headstamp library.
//!
//! Stamps staged source files with a provenance header at commit time.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod header;
pub mod orchestrator;
pub mod selector;

pub use error::Error;
