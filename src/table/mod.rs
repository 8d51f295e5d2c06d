//! The character ↔ code bijection and its integrity rules.

pub mod builder;
pub mod store;

pub use builder::{build_mapping, BuildError, Strategy};
pub use store::StoreError;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::codespace::{self, ESCAPE_MARKER};

/// One row of the mapping artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub character: char,
    pub code: String,
    pub frequency_rank: u32,
}

/// A structural violation in a built or loaded table. The table is rejected
/// wholesale; no partially valid table is ever returned.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("duplicate character in table: {0:?}")]
    DuplicateCharacter(char),

    #[error("duplicate code in table: {0:?}")]
    DuplicateCode(String),

    #[error("code violates the case shape: {0:?}")]
    MalformedCode(String),

    #[error("code collides with the escape marker: {0:?}")]
    EscapeCollision(String),
}

/// Immutable bijection between source characters and codes.
///
/// Built once, then shared read-only; every lookup structure is computed at
/// construction so the codec never mutates it.
#[derive(Debug)]
pub struct MappingTable {
    records: Vec<MappingRecord>,
    to_code: HashMap<char, usize>,
    to_char: HashMap<String, char>,
    /// Declared code lengths per initial letter, sorted descending; the
    /// order `from_latin` tries matches in.
    lengths_by_initial: [Vec<usize>; 26],
    max_code_length: usize,
}

impl MappingTable {
    /// Validate a record set and index it. Runs for every construction
    /// path, including artifact loads.
    pub fn from_records(records: Vec<MappingRecord>) -> Result<Self, IntegrityError> {
        validate(&records)?;

        let mut to_code = HashMap::with_capacity(records.len());
        let mut to_char = HashMap::with_capacity(records.len());
        let mut lengths_by_initial: [Vec<usize>; 26] = std::array::from_fn(|_| Vec::new());
        let mut max_code_length = 0;

        for (idx, record) in records.iter().enumerate() {
            to_code.insert(record.character, idx);
            to_char.insert(record.code.clone(), record.character);

            let initial = record.code.as_bytes()[0] - b'A';
            let len = record.code.len();
            lengths_by_initial[initial as usize].push(len);
            max_code_length = max_code_length.max(len);
        }

        for lengths in &mut lengths_by_initial {
            lengths.sort_unstable_by(|a, b| b.cmp(a));
            lengths.dedup();
        }

        Ok(Self {
            records,
            to_code,
            to_char,
            lengths_by_initial,
            max_code_length,
        })
    }

    pub fn code_for(&self, character: char) -> Option<&str> {
        self.to_code
            .get(&character)
            .map(|&idx| self.records[idx].code.as_str())
    }

    pub fn char_for(&self, code: &str) -> Option<char> {
        self.to_char.get(code).copied()
    }

    /// Code lengths declared for codes starting with `initial`, longest
    /// first. Empty when no code starts with that letter.
    pub fn declared_lengths(&self, initial: char) -> &[usize] {
        debug_assert!(initial.is_ascii_uppercase());
        &self.lengths_by_initial[(initial as u8 - b'A') as usize]
    }

    pub fn max_code_length(&self) -> usize {
        self.max_code_length
    }

    pub fn records(&self) -> &[MappingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Enforce the table invariants: injectivity both directions, case shape,
/// no collision with the escape marker.
pub(crate) fn validate(records: &[MappingRecord]) -> Result<(), IntegrityError> {
    let mut seen_chars = HashSet::with_capacity(records.len());
    let mut seen_codes = HashSet::with_capacity(records.len());

    for record in records {
        if record.code.contains(ESCAPE_MARKER) {
            return Err(IntegrityError::EscapeCollision(record.code.clone()));
        }
        if !codespace::is_well_formed(&record.code) {
            return Err(IntegrityError::MalformedCode(record.code.clone()));
        }
        if !seen_chars.insert(record.character) {
            return Err(IntegrityError::DuplicateCharacter(record.character));
        }
        if !seen_codes.insert(record.code.as_str()) {
            return Err(IntegrityError::DuplicateCode(record.code.clone()));
        }
    }
    Ok(())
}
