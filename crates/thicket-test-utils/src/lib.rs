//! Test utilities for Thicket development.
//!
//! Provides [`TestGeneration`], which owns one arena and one slot pool
//! for the duration of a test, plus the between-generation collection
//! step ([`collect_recycled`]) that the runtime crates leave to their
//! driver.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{collect_recycled, run_concurrently, TestGeneration};
