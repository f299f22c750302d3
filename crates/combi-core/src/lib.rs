//! Core types shared by the Combi layout crates.
//!
//! This crate provides the vocabulary the layout engine is written in:
//! - Physical and logical axes, orientation, and child anchors
//! - Geometry (`Bounds`, `Padding`) and per-axis size metrics
//! - Container configuration
//! - Error types

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
