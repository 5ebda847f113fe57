//! Fitting an item (typically an image) inside a bounding box
//!
//! The fitted rectangle keeps the item's aspect ratio, never exceeds the
//! item's native size, and is centered in the box.
//!
//! # Coordinates
//!
//! [`Fit::x`] and [`Fit::y`] are the CENTER of the fitted rectangle, measured
//! from the box's top-left corner. Use [`Fit::origin`] for the top-left
//! placement point.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }
}

/// Fitted size and center position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fit {
    pub width: f64,
    pub height: f64,
    /// Horizontal center of the fitted rectangle
    pub x: f64,
    /// Vertical center of the fitted rectangle
    pub y: f64,
}

impl Fit {
    /// Top-left corner of the fitted rectangle
    pub fn origin(&self) -> (f64, f64) {
        (self.x - self.width / 2.0, self.y - self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Computes the largest centered fit of `item` inside `bounds`.
///
/// Returns `None` if either size has a zero, negative or non-finite dimension.
pub fn calc_size_and_position(item: Size, bounds: Size) -> Option<Fit> {
    if !item.is_usable() || !bounds.is_usable() {
        return None;
    }

    let item_ratio = item.aspect_ratio();
    let (mut width, mut height) = if bounds.aspect_ratio() > item_ratio {
        // Box is relatively wider: height is the limiting dimension
        (bounds.height * item_ratio, bounds.height)
    } else {
        (bounds.width, bounds.width / item_ratio)
    };

    // Never upscale past the native size
    if width > item.width {
        width = item.width;
    }
    if height > item.height {
        height = item.height;
    }

    Some(Fit {
        width,
        height,
        x: (bounds.width - width) / 2.0 + width / 2.0,
        y: (bounds.height - height) / 2.0 + height / 2.0,
    })
}
