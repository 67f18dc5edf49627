#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateless parser that turns terse solver step descriptions into display messages.
//!
//! Solver descriptions come in three shapes, tried in order:
//!
//! 1. a bracketed colour list, `Placing queen(s) ['#ff0000', '#00ff00']`, whose
//!    `(s)` marker is resolved against the number of colours;
//! 2. a single inline hex colour, `Eliminating #00ff00 cells`;
//! 3. plain text without colour markers.
//!
//! Parsing never fails. Malformed input degrades to best-effort splitting.

use queens_master_core::{Colour, ParsedMessage};

const LIST_OPEN: char = '[';
const LIST_CLOSE: char = ']';
const LIST_SEPARATOR: char = ',';
const QUOTES: [char; 2] = ['\'', '"'];
const PLURAL_MARKER: &str = "(s)";
const HEX_PREFIX: char = '#';
const HEX_DIGITS: usize = 6;

/// Parses one raw step description.
#[must_use]
pub fn parse(raw: &str) -> ParsedMessage {
    if let Some((text, list)) = raw.split_once(LIST_OPEN) {
        return parse_list(text, list);
    }

    if let Some((start, end)) = find_hex_colour(raw) {
        return ParsedMessage {
            message: join_around(&raw[..start], &raw[end..]),
            colours: vec![Colour::new(&raw[start..end])],
        };
    }

    ParsedMessage::plain(raw)
}

fn parse_list(text: &str, list: &str) -> ParsedMessage {
    let list = list.split_once(LIST_CLOSE).map_or(list, |(inner, _)| inner);
    let colours: Vec<Colour> = list
        .split(LIST_SEPARATOR)
        .map(|token| token.trim().trim_matches(&QUOTES[..]).trim())
        .filter(|token| !token.is_empty())
        .map(Colour::new)
        .collect();

    let suffix = if colours.len() == 1 { "" } else { "s" };
    ParsedMessage {
        message: text.replace(PLURAL_MARKER, suffix).trim().to_owned(),
        colours,
    }
}

fn find_hex_colour(raw: &str) -> Option<(usize, usize)> {
    raw.match_indices(HEX_PREFIX)
        .map(|(start, _)| (start, start + 1 + HEX_DIGITS))
        .find(|&(start, end)| {
            raw.get(start + 1..end)
                .is_some_and(|digits| digits.bytes().all(|byte| byte.is_ascii_hexdigit()))
        })
}

fn join_around(before: &str, after: &str) -> String {
    let spaced =
        before.ends_with(char::is_whitespace) || after.starts_with(char::is_whitespace);
    let before = before.trim();
    let after = after.trim();
    if spaced && !before.is_empty() && !after.is_empty() {
        format!("{before} {after}")
    } else {
        format!("{before}{after}")
    }
}
