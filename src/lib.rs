//! designkit - helpers for a graphic design editor
//!
//! Small, independent building blocks used by the editor front end.
//!
//! # Architecture
//!
//! - [`core`] - Layer tree model, id generation, fit geometry, property merging
//! - [`fonts`] - Font loading with explicit per-family load state, WOFF unpacking
//! - [`elements`] - Mapping editor element ids to rendered elements
//! - [`config`] - Configuration loading
//! - [`utils`] - URL resolution, rounding, JSON copies

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod core;
pub mod elements;
pub mod fonts;
pub mod utils;

// Re-export commonly used types
pub use crate::core::error::{Error, Result};
pub use crate::core::geometry::{Fit, Size, calc_size_and_position};
pub use crate::core::layers::{Layer, Page, ParentLookup, clone_data, find_parent_by_id};
pub use fonts::{FontError, FontRegistry, FontState, LoadOutcome};
