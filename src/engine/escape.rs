//! The escape grammar.
//!
//! Two fixed-shape tokens follow the marker:
//!
//! - `ESC c`: the literal character `c`, for anything that must not appear
//!   bare (ASCII letters, the marker itself);
//! - `ESC # hhhhhh`: exactly six hex digits naming a Unicode scalar value.
//!   The fixed width keeps the token self-delimiting: every scalar fits in
//!   six digits, so no terminator is needed.

use crate::codespace::ESCAPE_MARKER;

use super::DecodeError;

pub(super) const HEX_TAG: char = '#';
const HEX_DIGITS: usize = 6;

pub(super) fn push_literal(out: &mut String, ch: char) {
    out.push(ESCAPE_MARKER);
    out.push(ch);
}

pub(super) fn push_code_point(out: &mut String, ch: char) {
    use std::fmt::Write;
    out.push(ESCAPE_MARKER);
    out.push(HEX_TAG);
    // The write cannot fail on a String.
    let _ = write!(out, "{:06x}", ch as u32);
}

/// Parse the escape token whose marker sits at `marker_pos`. Returns the
/// decoded character and the total number of chars consumed, marker
/// included.
pub(super) fn parse(chars: &[char], marker_pos: usize) -> Result<(char, usize), DecodeError> {
    let payload = marker_pos + 1;
    match chars.get(payload) {
        None => Err(DecodeError::TruncatedEscape { pos: marker_pos }),
        Some(&HEX_TAG) => {
            let digits_start = payload + 1;
            let end = digits_start + HEX_DIGITS;
            if chars.len() < end {
                return Err(DecodeError::TruncatedEscape { pos: marker_pos });
            }
            let mut value: u32 = 0;
            for (offset, &digit) in chars[digits_start..end].iter().enumerate() {
                let digit = digit
                    .to_digit(16)
                    .ok_or(DecodeError::InvalidHexPayload { pos: digits_start + offset })?;
                value = value * 16 + digit;
            }
            let ch = char::from_u32(value)
                .ok_or(DecodeError::InvalidCodePoint { value, pos: marker_pos })?;
            Ok((ch, 2 + HEX_DIGITS))
        }
        Some(&literal) => Ok((literal, 2)),
    }
}
