//! The runtime codec: source text ↔ self-delimiting Latin codes.
//!
//! A [`Transliterator`] is built from one validated [`MappingTable`] and
//! never mutates it, so one instance may serve unboundedly many concurrent
//! calls. Decoding is a two-state scan: an escape marker starts a
//! fixed-grammar escape token, an uppercase letter starts a code, anything
//! else passes through verbatim.

mod escape;
#[cfg(test)]
mod tests;

use std::path::Path;

use crate::codespace::ESCAPE_MARKER;
use crate::stats::CoverageStats;
use crate::table::{MappingTable, StoreError, Strategy};
use crate::unicode;

/// Encoder knobs. The hex fallback is on by default, which makes
/// [`Transliterator::to_latin`] total over arbitrary input.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub hex_fallback: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { hex_fallback: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("unmappable character {character:?} at char {pos} (hex fallback disabled)")]
    UnmappableCharacter { character: char, pos: usize },
}

/// The input is not a valid output of this mapping. Per-call and local: a
/// failed decode leaves the engine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("no declared code length matches at char {pos} (initial {initial:?})")]
    UnknownCode { initial: char, pos: usize },

    #[error("truncated escape sequence at char {pos}")]
    TruncatedEscape { pos: usize },

    #[error("invalid hex digit in escape payload at char {pos}")]
    InvalidHexPayload { pos: usize },

    #[error("escape payload {value:#06x} is not a Unicode scalar value (at char {pos})")]
    InvalidCodePoint { value: u32, pos: usize },
}

pub struct Transliterator {
    table: MappingTable,
    options: EngineOptions,
}

impl Transliterator {
    pub fn new(table: MappingTable) -> Self {
        Self::with_options(table, EngineOptions::default())
    }

    pub fn with_options(table: MappingTable, options: EngineOptions) -> Self {
        Self { table, options }
    }

    /// Load a mapping artifact and build an engine on it. Validation runs
    /// as part of the load.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(MappingTable::open(path)?))
    }

    /// Load the conventional per-strategy artifact `<strategy>.tlm` from a
    /// directory.
    pub fn open_strategy(dir: &Path, strategy: Strategy) -> Result<Self, StoreError> {
        Ok(Self::new(MappingTable::open(
            &dir.join(format!("{strategy}.tlm")),
        )?))
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Encode source text as Latin codes.
    ///
    /// Mapped characters become their codes. ASCII letters and the escape
    /// marker are escaped literally; digits, punctuation and line
    /// whitespace pass through bare; everything else takes the hex escape,
    /// so any input round-trips.
    pub fn to_latin(&self, text: &str) -> Result<String, EncodeError> {
        let mut out = String::with_capacity(text.len());
        for (pos, ch) in text.chars().enumerate() {
            if let Some(code) = self.table.code_for(ch) {
                out.push_str(code);
            } else if unicode::needs_literal_escape(ch) {
                escape::push_literal(&mut out, ch);
            } else if unicode::is_bare_passthrough(ch) {
                out.push(ch);
            } else if self.options.hex_fallback {
                escape::push_code_point(&mut out, ch);
            } else {
                return Err(EncodeError::UnmappableCharacter { character: ch, pos });
            }
        }
        Ok(out)
    }

    /// Decode Latin codes back to source text, byte-for-byte.
    pub fn from_latin(&self, latin: &str) -> Result<String, DecodeError> {
        let chars: Vec<char> = latin.chars().collect();
        let mut out = String::with_capacity(latin.len());
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            if ch == ESCAPE_MARKER {
                let (decoded, consumed) = escape::parse(&chars, i)?;
                out.push(decoded);
                i += consumed;
            } else if unicode::is_code_head(ch) {
                let (character, consumed) = self.match_code(&chars, i)?;
                out.push(character);
                i += consumed;
            } else {
                out.push(ch);
                i += 1;
            }
        }
        Ok(out)
    }

    /// Match the code starting at `start`, longest declared length first.
    ///
    /// A candidate of length L is the uppercase initial plus the next L-1
    /// chars, admissible only when all of them are lowercase letters. Codes
    /// all start uppercase, so the only ambiguity is how many lowercase
    /// letters this code consumes, resolved by preferring the longest
    /// length the table declares for this initial.
    fn match_code(&self, chars: &[char], start: usize) -> Result<(char, usize), DecodeError> {
        let initial = chars[start];
        for &len in self.table.declared_lengths(initial) {
            if start + len > chars.len() {
                continue;
            }
            if !chars[start + 1..start + len]
                .iter()
                .all(|&c| unicode::is_code_tail(c))
            {
                continue;
            }
            let candidate: String = chars[start..start + len].iter().collect();
            if let Some(character) = self.table.char_for(&candidate) {
                return Ok((character, len));
            }
        }
        Err(DecodeError::UnknownCode { initial, pos: start })
    }

    /// How much of `text` the mapping covers directly (the rest goes
    /// through passthrough or escapes).
    pub fn coverage(&self, text: &str) -> CoverageStats {
        let mut stats = CoverageStats::default();
        for ch in text.chars() {
            stats.total += 1;
            if self.table.code_for(ch).is_some() {
                stats.mapped += 1;
            } else {
                stats.unmapped += 1;
            }
        }
        stats
    }

    /// Round-trip check for one text.
    pub fn is_lossless(&self, text: &str) -> bool {
        match self.to_latin(text) {
            Ok(latin) => matches!(self.from_latin(&latin), Ok(restored) if restored == text),
            Err(_) => false,
        }
    }
}
