//! Coverage and compression reporting for engine consumers.

use serde::Serialize;

/// Share of a text covered directly by the mapping table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverageStats {
    pub mapped: u64,
    pub unmapped: u64,
    pub total: u64,
}

impl CoverageStats {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mapped as f64 / self.total as f64
        }
    }
}

/// Size comparison between a source text and its Latin form.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CompressionReport {
    pub original_bytes: u64,
    pub latin_bytes: u64,
    pub original_chars: u64,
    pub latin_chars: u64,
}

impl CompressionReport {
    pub fn compare(original: &str, latin: &str) -> Self {
        Self {
            original_bytes: original.len() as u64,
            latin_bytes: latin.len() as u64,
            original_chars: original.chars().count() as u64,
            latin_chars: latin.chars().count() as u64,
        }
    }

    /// Fold another report in, for corpus-wide totals.
    pub fn accumulate(&mut self, other: &CompressionReport) {
        self.original_bytes += other.original_bytes;
        self.latin_bytes += other.latin_bytes;
        self.original_chars += other.original_chars;
        self.latin_chars += other.latin_chars;
    }

    /// Original over Latin byte count; > 1.0 means the Latin form is smaller.
    pub fn byte_ratio(&self) -> f64 {
        ratio(self.original_bytes, self.latin_bytes)
    }

    pub fn char_ratio(&self) -> f64 {
        ratio(self.original_chars, self.latin_chars)
    }
}

fn ratio(original: u64, latin: u64) -> f64 {
    if latin == 0 {
        f64::INFINITY
    } else {
        original as f64 / latin as f64
    }
}
