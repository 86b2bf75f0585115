//! Core operations over the deployment descriptor.
//!
//! This crate turns a loaded [`pagebase_shared::DeployDescriptor`] into the
//! things its consumers actually need: fully-qualified URLs, the config shape
//! the external build tool reads, and the tool's own release check.

pub mod emit;
pub mod release;
pub mod resolve;
