//! Reversible, frequency-coded transliteration of non-Latin scripts.
//!
//! A corpus-derived [`table::MappingTable`] assigns each source character a
//! self-delimiting Latin code (uppercase head, lowercase tail), shortest
//! codes to the most frequent characters. The [`engine::Transliterator`]
//! converts text to that Latin form and back byte-for-byte; anything
//! outside the table survives via passthrough or a fixed escape grammar.

pub mod analyzer;
pub mod codespace;
pub mod config;
pub mod engine;
pub mod stats;
pub mod table;
pub mod trace_init;
pub mod unicode;

pub use analyzer::{CharFrequency, FrequencyAccumulator};
pub use config::BuildConfig;
pub use engine::{DecodeError, EncodeError, EngineOptions, Transliterator};
pub use table::{build_mapping, BuildError, MappingRecord, MappingTable, Strategy};
