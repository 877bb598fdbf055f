//! `OAuth` percent-encoding (RFC 5849 section 3.6).
//!
//! Stricter than form or generic URL encoding: only the RFC 3986 unreserved
//! set `A-Z a-z 0-9 - _ . ~` passes through untouched. Everything else,
//! including `!*'()` and the space character, becomes `%XX` with uppercase hex
//! over the UTF-8 bytes of the input.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters that must be escaped: everything except the unreserved set.
const OAUTH_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes a string for use in signature base strings and headers.
///
/// # Example
///
/// ```
/// use featherkey_oauth1::encoding::encode;
///
/// assert_eq!(
///     encode("https://api.twitter.com/oauth/request_token"),
///     "https%3A%2F%2Fapi.twitter.com%2Foauth%2Frequest_token"
/// );
/// ```
#[must_use]
pub fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, OAUTH_RESERVED).to_string()
}

/// Decodes a percent-encoded string.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD.
#[must_use]
pub fn decode(encoded: &str) -> String {
    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

/// Joins parameters into `key=value&key=value` form.
///
/// Keys and values are encoded individually. Order is preserved as given;
/// callers control the parameter order of each request.
#[must_use]
pub fn parameter_string<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    params
        .into_iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
