//! Rank-ordered code assignment: basic, tokenizer-optimized, hybrid.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::analyzer::CharFrequency;
use crate::codespace;
use crate::config::BuildConfig;

use super::{IntegrityError, MappingRecord, MappingTable};

/// How codes are picked for ranked characters. Only the builder knows about
/// strategies; the runtime codec sees nothing but the finished table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Canonical order: highest-frequency characters get the shortest codes.
    Basic,
    /// Prefer codes the target tokenizer treats as a single unit, within a
    /// bounded look-ahead of the canonical order.
    TokenizerOptimized,
    /// Tokenizer-optimized, plus extra single-token codes beyond the
    /// canonical enumeration once it runs out.
    Hybrid,
}

impl Strategy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(Self::Basic),
            "tokenizer-optimized" => Some(Self::TokenizerOptimized),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::TokenizerOptimized => "tokenizer-optimized",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(
        "vocabulary exhausted: {needed} characters exceed the {capacity} codes \
         available at max code length {max_code_length}"
    )]
    VocabularyExhausted {
        needed: usize,
        capacity: u64,
        max_code_length: usize,
    },

    #[error("built table failed validation: {0}")]
    Integrity(#[from] IntegrityError),
}

/// Assign one code per ranked character and validate the result.
///
/// `vocabulary` is the set of strings the target tokenizer emits as single
/// units; it only biases selection order. Without one, the tokenizer-aware
/// strategies degrade to canonical assignment.
pub fn build_mapping(
    ranking: &[CharFrequency],
    strategy: Strategy,
    config: &BuildConfig,
    vocabulary: Option<&HashSet<String>>,
) -> Result<MappingTable, BuildError> {
    let canonical_capacity = codespace::capacity(config.max_code_length);

    let records = match strategy {
        Strategy::Basic => assign_canonical(ranking, config, canonical_capacity)?,
        Strategy::TokenizerOptimized => {
            check_capacity(ranking.len(), canonical_capacity, config)?;
            assign_biased(ranking, config, vocabulary, canonical_capacity, &[])
        }
        Strategy::Hybrid => {
            let extras = extension_codes(vocabulary, config.max_code_length);
            check_capacity(
                ranking.len(),
                canonical_capacity + extras.len() as u64,
                config,
            )?;
            assign_biased(ranking, config, vocabulary, canonical_capacity, &extras)
        }
    };

    let table = MappingTable::from_records(records)?;
    debug!(
        strategy = %strategy,
        records = table.len(),
        max_code_length = table.max_code_length(),
        "built mapping table"
    );
    Ok(table)
}

fn check_capacity(needed: usize, capacity: u64, config: &BuildConfig) -> Result<(), BuildError> {
    if needed as u64 > capacity {
        return Err(BuildError::VocabularyExhausted {
            needed,
            capacity,
            max_code_length: config.max_code_length,
        });
    }
    Ok(())
}

fn assign_canonical(
    ranking: &[CharFrequency],
    config: &BuildConfig,
    capacity: u64,
) -> Result<Vec<MappingRecord>, BuildError> {
    check_capacity(ranking.len(), capacity, config)?;
    Ok(ranking
        .iter()
        .zip(codespace::enumerate(config.max_code_length))
        .enumerate()
        .map(|(rank, (entry, code))| MappingRecord {
            character: entry.character,
            code,
            frequency_rank: rank as u32,
        })
        .collect())
}

/// Walk the canonical enumeration with a bounded look-ahead for
/// vocabulary-preferred codes, then drain `extras` once it is spent.
fn assign_biased(
    ranking: &[CharFrequency],
    config: &BuildConfig,
    vocabulary: Option<&HashSet<String>>,
    capacity: u64,
    extras: &[String],
) -> Vec<MappingRecord> {
    let mut records = Vec::with_capacity(ranking.len());
    let mut taken_ahead: HashSet<u64> = HashSet::new();
    let mut cursor: u64 = 0;
    let mut next_extra = 0;

    for (rank, entry) in ranking.iter().enumerate() {
        while cursor < capacity && taken_ahead.remove(&cursor) {
            cursor += 1;
        }

        let code = if cursor >= capacity {
            let code = extras[next_extra].clone();
            next_extra += 1;
            code
        } else {
            let chosen = vocabulary
                .map(|vocab| scan_ahead(vocab, cursor, capacity, &taken_ahead, config))
                .unwrap_or(None);
            match chosen {
                Some(index) if index != cursor => {
                    taken_ahead.insert(index);
                    codespace::code_at(index)
                }
                _ => {
                    cursor += 1;
                    codespace::code_at(cursor - 1)
                }
            }
        };

        records.push(MappingRecord {
            character: entry.character,
            code,
            frequency_rank: rank as u32,
        });
    }
    records
}

/// First unassigned code within the look-ahead window that the tokenizer
/// treats as a single unit. The window counts candidate codes, so the scan
/// is deterministic regardless of how many were taken out of order before.
fn scan_ahead(
    vocabulary: &HashSet<String>,
    cursor: u64,
    capacity: u64,
    taken_ahead: &HashSet<u64>,
    config: &BuildConfig,
) -> Option<u64> {
    let mut inspected = 0;
    let mut index = cursor;
    while index < capacity && inspected < config.lookahead_window {
        if !taken_ahead.contains(&index) {
            inspected += 1;
            if vocabulary.contains(codespace::code_at(index).as_str()) {
                return Some(index);
            }
        }
        index += 1;
    }
    None
}

/// Reserved vocabulary tokens usable as codes beyond the canonical
/// enumeration: well-formed case shape, longer than the canonical maximum.
/// Ordered by length ascending then lexicographic so hybrid builds are
/// reproducible.
fn extension_codes(vocabulary: Option<&HashSet<String>>, max_code_length: usize) -> Vec<String> {
    let Some(vocabulary) = vocabulary else {
        return Vec::new();
    };
    let mut extras: Vec<String> = vocabulary
        .iter()
        .filter(|token| token.len() > max_code_length && codespace::is_well_formed(token))
        .cloned()
        .collect();
    extras.sort_unstable_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    extras
}
