//! Element id and dirty marker generation
//!
//! Two generators are provided:
//!
//! - [`create_id`] - URL-safe random ids for editor elements. With the default
//!   length of 10 characters there are 64^10 possible ids, so collisions are
//!   negligible for any realistic document size.
//! - [`random_id`] - a weaker, time-biased stamp built from random decimal
//!   digits followed by the current timestamp. Used for dirty markers where
//!   only "different from before" matters.
//!
//! Neither generator keeps state or enforces uniqueness.

use rand::Rng;

/// Default length of ids produced by [`create_id`]
pub const DEFAULT_ID_LEN: usize = 10;

/// Default count of random digits used by [`random_id`]
pub const DEFAULT_RANDOM_DIGITS: usize = 8;

/// Upper bound on random digits in [`random_id`]
///
/// 16 random digits plus a 13-digit millisecond timestamp stays well inside `u128`.
pub const MAX_RANDOM_DIGITS: usize = 16;

/// URL-safe alphabet (64 symbols)
const URL_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a random id of `len` characters from the URL-safe alphabet.
pub fn create_id(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| URL_ALPHABET[rng.random_range(0..URL_ALPHABET.len())] as char)
        .collect()
}

/// Generates a time-biased base-36 stamp.
///
/// The number encoded is `digits` random decimal digits followed by the current
/// Unix time in milliseconds. `digits` is capped at [`MAX_RANDOM_DIGITS`].
pub fn random_id(digits: usize) -> String {
    let mut rng = rand::rng();
    let mut decimal: String = (0..digits.min(MAX_RANDOM_DIGITS))
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect();
    decimal.push_str(&chrono::Utc::now().timestamp_millis().max(0).to_string());

    // Only ASCII digits and bounded length, parse cannot fail
    let value = decimal.parse::<u128>().unwrap_or_default();
    to_base36(value)
}

fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
