//! Room number grammar.
//!
//! Rooms are entered by hand in many shapes (`EB2-104`, `eb 02 - 205`,
//! `EB-2 104`, `EB2104`). Accepted input, case-insensitive, surrounding
//! whitespace ignored:
//!
//! ```text
//! room   := "EB" ws* "-"? ws* "0"? block (ws | "-")* number
//! block  := DIGIT
//! number := DIGIT DIGIT DIGIT DIGIT?
//! ```
//!
//! When a leading `0` could be either padding or the block itself, padding
//! wins if the rest still parses. The canonical form is `EB{block} - {number}`.

use std::fmt;

/// A parsed room in building EB.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomNumber {
    pub block: u8,
    pub number: String,
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EB{} - {}", self.block, self.number)
    }
}

/// Parse a hand-entered room number; `None` if it does not fit the grammar.
pub fn parse_room(input: &str) -> Option<RoomNumber> {
    let s = input.trim();
    let prefix = s.get(..2)?;
    if !prefix.eq_ignore_ascii_case("eb") {
        return None;
    }

    let rest = s[2..].trim_start();
    let rest = rest.strip_prefix('-').unwrap_or(rest).trim_start();

    if let Some(unpadded) = rest.strip_prefix('0') {
        if let Some(room) = block_and_number(unpadded) {
            return Some(room);
        }
    }
    block_and_number(rest)
}

fn block_and_number(s: &str) -> Option<RoomNumber> {
    let mut chars = s.chars();
    let block = chars.next()?.to_digit(10)? as u8;

    let number = chars
        .as_str()
        .trim_start_matches(|c: char| c == '-' || c.is_whitespace());
    let digits = number.len();
    if !(3..=4).contains(&digits) || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(RoomNumber {
        block,
        number: number.to_string(),
    })
}

/// Canonical spelling of `input`, or `None` when it does not parse.
pub fn normalize_room(input: &str) -> Option<String> {
    parse_room(input).map(|room| room.to_string())
}
