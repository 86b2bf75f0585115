//! Shared types, error model, and descriptor I/O for pagebase.
//!
//! This crate is the foundation depended on by the other pagebase crates.
//! It provides:
//! - [`PagebaseError`] — the unified error type
//! - The deployment descriptor ([`DeployDescriptor`] and its field types)
//! - Descriptor file discovery and loading
//!
//! A descriptor is constructed once at process start, from the project's
//! `pagebase.toml`, and never mutated afterwards.

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    DESCRIPTOR_FILE_NAME, descriptor_path, expand_path, find_descriptor, init_descriptor,
    load_descriptor, load_descriptor_from,
};
pub use error::{PagebaseError, Result};
pub use types::{AssetsDir, BasePath, BuildConfig, DeployDescriptor, SiteUrl};
