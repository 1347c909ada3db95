//! Core type definitions used across the docstore workspace.

pub mod id;

pub use id::*;
