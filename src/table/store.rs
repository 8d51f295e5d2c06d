//! Mapping artifact I/O: the binary `TLMX` form and the JSON interchange
//! form. Every load path re-validates the record set, so a corrupted or
//! hand-edited artifact is rejected instead of producing a broken codec.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::{IntegrityError, MappingRecord, MappingTable};

const MAGIC: &[u8; 4] = b"TLMX";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 5; // 4 bytes magic + 1 byte version

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected TLMX)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("integrity check failed: {0}")]
    Integrity(#[from] IntegrityError),
}

impl MappingTable {
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let encoded = bincode::serialize(self.records()).map_err(StoreError::Serialize)?;
        let mut buf = Vec::with_capacity(HEADER_SIZE + encoded.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&encoded);
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, StoreError> {
        if data.len() < HEADER_SIZE {
            return Err(StoreError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(StoreError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(StoreError::UnsupportedVersion(data[4]));
        }
        let records: Vec<MappingRecord> =
            bincode::deserialize(&data[HEADER_SIZE..]).map_err(StoreError::Deserialize)?;
        Ok(Self::from_records(records)?)
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let data = fs::read(path)?;
        let table = Self::from_bytes(&data)?;
        debug!(records = table.len(), path = %path.display(), "loaded mapping artifact");
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        fs::write(path, self.to_bytes()?)?;
        debug!(records = self.len(), path = %path.display(), "wrote mapping artifact");
        Ok(())
    }

    /// The interchange form: a JSON array of `{character, code,
    /// frequency_rank}` records.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self.records())?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let records: Vec<MappingRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records)?)
    }
}
