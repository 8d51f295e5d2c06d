//! Streaming character-frequency analysis over training corpora.
//!
//! The accumulator is an explicit value, never process-global state: shards
//! count independently and [`FrequencyAccumulator::merge`] folds them with a
//! plain sum, so a sharded count always produces the same ranking as a
//! single pass.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One entry of a frequency ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharFrequency {
    pub character: char,
    pub count: u64,
}

/// Running character counts for one shard of a corpus.
#[derive(Debug, Clone, Default)]
pub struct FrequencyAccumulator {
    counts: HashMap<char, u64>,
    total: u64,
}

impl FrequencyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_text(&mut self, text: &str) {
        for ch in text.chars() {
            *self.counts.entry(ch).or_insert(0) += 1;
            self.total += 1;
        }
    }

    /// Count a reader line by line. Line terminators are counted too, so a
    /// streamed count matches [`count_text`](Self::count_text) over the same
    /// content.
    pub fn count_reader(&mut self, mut reader: impl BufRead) -> io::Result<()> {
        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            self.count_text(&line);
            line.clear();
        }
        Ok(())
    }

    /// Count a whole file through a read-only memory map, so corpora larger
    /// than memory stream through the page cache.
    pub fn count_file(&mut self, path: &Path) -> io::Result<()> {
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is immutable.
        let mmap = unsafe { Mmap::map(&file)? };
        let text = std::str::from_utf8(&mmap)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.count_text(text);
        debug!(bytes = mmap.len(), path = %path.display(), "counted corpus file");
        Ok(())
    }

    /// Fold another shard into this one. Associative and commutative, so
    /// parallel counting never changes the resulting ranking.
    pub fn merge(&mut self, other: FrequencyAccumulator) {
        for (ch, n) in other.counts {
            *self.counts.entry(ch).or_insert(0) += n;
        }
        self.total += other.total;
    }

    pub fn total_chars(&self) -> u64 {
        self.total
    }

    pub fn unique_chars(&self) -> usize {
        self.counts.len()
    }

    /// Ranking sorted by count descending; ties break on ascending code
    /// point, making the order reproducible across runs and shardings.
    pub fn ranking(&self, min_frequency: u64) -> Vec<CharFrequency> {
        let mut ranked: Vec<CharFrequency> = self
            .counts
            .iter()
            .filter(|(_, &n)| n >= min_frequency.max(1))
            .map(|(&character, &count)| CharFrequency { character, count })
            .collect();
        ranked.sort_unstable_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.character.cmp(&b.character))
        });
        ranked
    }
}
