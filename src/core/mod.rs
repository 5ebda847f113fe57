//! Document helpers for the design editor
//!
//! This module contains the pure, synchronous helpers operating on editor data:
//!
//! - [`ids`]: Element id and dirty marker generation
//! - [`layers`]: Page/layer tree model, cloning and parent lookup
//! - [`geometry`]: Centered fitting of an item inside a box
//! - [`merge`]: Recursive JSON property copying
//! - [`error`]: Error types shared across the crate

pub mod error;
pub mod geometry;
pub mod ids;
pub mod layers;
pub mod merge;

#[cfg(test)]
pub mod test_helpers;
