//! Utility functions for resource paths, rounding and JSON copies
//!
//! # Example
//!
//! ```
//! use designkit::utils::{resolve_url, to_num};
//!
//! assert_eq!(
//!     resolve_url("/img/a.png", "https://cdn.example.com"),
//!     "https://cdn.example.com/img/a.png"
//! );
//! assert_eq!(to_num(Some(3.14159), Some(2)), 3.14);
//! ```

use directories::ProjectDirs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tracing::error;

use crate::core::error::{Error, Result};

/// Largest precision accepted by [`try_to_num`]
pub const MAX_FRACTION_DIGITS: usize = 100;

pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "designkit", "designkit").map(|pd| pd.config_dir().to_path_buf())
}

/// Prefixes `url` with `resource_host` unless it is already an absolute http(s) URL.
pub fn resolve_url(url: &str, resource_host: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{resource_host}{url}")
    }
}

/// Rounds `n` to `digits` decimal places.
///
/// NaN rounds to 0. Fails if `digits` exceeds [`MAX_FRACTION_DIGITS`].
pub fn try_to_num(n: f64, digits: usize) -> Result<f64> {
    if digits > MAX_FRACTION_DIGITS {
        return Err(Error::Rounding {
            value: n,
            digits,
            max: MAX_FRACTION_DIGITS,
        });
    }
    if n.is_nan() {
        return Ok(0.0);
    }
    // Fixed-point formatting rounds on the exact binary value
    Ok(format!("{n:.digits$}").parse::<f64>().unwrap_or(0.0))
}

/// Lenient form of [`try_to_num`] for display code.
///
/// A missing number or precision counts as 0; failures are logged and yield 0.
pub fn to_num(n: Option<f64>, digits: Option<usize>) -> f64 {
    let n = n.unwrap_or(0.0);
    let digits = digits.unwrap_or(0);
    try_to_num(n, digits).unwrap_or_else(|e| {
        error!("{e}");
        0.0
    })
}

/// Deep-copies any serializable value through its JSON form.
///
/// Values that JSON cannot represent (maps with non-string keys, ...) fail
/// with [`Error::Serialization`].
pub fn round_trip<T>(value: &T) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    serde_json::to_value(value)
        .and_then(serde_json::from_value)
        .map_err(|e| {
            error!("JSON copy failed: {e}");
            Error::Serialization(e)
        })
}
