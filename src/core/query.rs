//! `application/x-www-form-urlencoded` parsing for query strings and bodies.

use std::borrow::Cow;

/// Decode one form component: `+` becomes a space, then `%XX` sequences.
#[inline]
pub fn form_decode(s: &str) -> String {
    let spaced: Cow<'_, str> = if s.contains('+') {
        Cow::Owned(s.replace('+', " "))
    } else {
        Cow::Borrowed(s)
    };

    if spaced.contains('%') {
        percent_encoding::percent_decode_str(&spaced)
            .decode_utf8_lossy()
            .into_owned()
    } else {
        spaced.into_owned()
    }
}

/// Parse a query string or form body into ordered key-value pairs.
///
/// Repeated keys are kept in order. Pairs with an empty key are skipped.
pub fn parse_pairs(input: &str) -> Vec<(String, String)> {
    let pair_count = input.matches('&').count() + 1;
    let mut params = Vec::with_capacity(pair_count.min(16));

    for pair in input.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if !key.is_empty() {
            params.push((form_decode(key), form_decode(value)));
        }
    }

    params
}

/// First value for `key`, if present.
pub fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
