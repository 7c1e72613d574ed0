pub mod hero;
pub mod types;

use std::fmt;

use crate::error::{SaveError, SaveErrorCode};
use crate::fixed::FixedBytes;
use hero::Hero;
use types::{CHR_OFFSET_POS, CHR_SIZE, HEADER_SIZE, META_SIZE, PRE_HERO_START};

/// One decoded save file: an opaque versioned header, the offset of the
/// first hero record, everything in between carried as opaque pre-hero
/// data, and the hero records themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveGame {
    pub version_header: FixedBytes<HEADER_SIZE>,
    pub chr_offset: i32,
    /// Decoded view of the first [`META_SIZE`] bytes of `pre_hero_data`
    /// (byte 1 selects the active group). Not re-encoded; `pre_hero_data`
    /// is the authoritative superset.
    pub metadata: Vec<u8>,
    pub pre_hero_data: Vec<u8>,
    pub heroes: Vec<Hero>,
    /// Bytes after the last complete hero record, dropped on decode and
    /// absent from re-encoded output. Exposed so callers can reject files
    /// with trailing garbage instead of silently losing it.
    pub trailing_bytes: usize,
}

/// A container-level consistency finding from [`SaveGame::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconsistency {
    OffsetMismatch { chr_offset: i32, expected: usize },
    TrailingBytes { count: usize },
    MetadataDrift,
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OffsetMismatch {
                chr_offset,
                expected,
            } => write!(
                f,
                "chr_offset is {chr_offset} but header and pre-hero data end at byte {expected}"
            ),
            Self::TrailingBytes { count } => write!(
                f,
                "{count} trailing byte(s) after the last complete hero record were dropped on decode"
            ),
            Self::MetadataDrift => {
                f.write_str("metadata is no longer a prefix of pre_hero_data")
            }
        }
    }
}

impl SaveGame {
    /// Decode a whole save file held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SaveError> {
        if data.len() < PRE_HERO_START {
            return Err(SaveError::new(
                SaveErrorCode::TruncatedHeader,
                format!(
                    "save file too small ({} bytes), expected at least {}",
                    data.len(),
                    PRE_HERO_START
                ),
            ));
        }

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&data[..HEADER_SIZE]);
        let version_header = FixedBytes::new(header);

        let mut raw_offset = [0u8; 4];
        raw_offset.copy_from_slice(&data[CHR_OFFSET_POS..PRE_HERO_START]);
        let chr_offset = i32::from_le_bytes(raw_offset);

        if chr_offset < PRE_HERO_START as i32 || chr_offset as usize > data.len() {
            return Err(SaveError::new(
                SaveErrorCode::InvalidOffset,
                format!(
                    "chr_offset {chr_offset} is outside the file (length {})",
                    data.len()
                ),
            ));
        }
        let chr_offset_usize = chr_offset as usize;

        let meta_end = chr_offset_usize.min(PRE_HERO_START + META_SIZE);
        let metadata = data[PRE_HERO_START..meta_end].to_vec();
        let pre_hero_data = data[PRE_HERO_START..chr_offset_usize].to_vec();

        let hero_bytes = data.len() - chr_offset_usize;
        let count = hero_bytes / CHR_SIZE;
        let trailing_bytes = hero_bytes % CHR_SIZE;

        let mut heroes = Vec::with_capacity(count);
        for i in 0..count {
            let start = chr_offset_usize + i * CHR_SIZE;
            heroes.push(Hero::from_bytes(&data[start..start + CHR_SIZE])?);
        }

        Ok(Self {
            version_header,
            chr_offset,
            metadata,
            pre_hero_data,
            heroes,
            trailing_bytes,
        })
    }

    /// Encode back into file bytes: header, offset, pre-hero data, then
    /// every hero in original order. `chr_offset` is written as-is;
    /// keeping it consistent with the pre-hero length when heroes or
    /// pre-hero bytes are added or removed is the caller's job (see
    /// [`SaveGame::validate`]).
    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        let mut out = Vec::with_capacity(
            PRE_HERO_START + self.pre_hero_data.len() + self.heroes.len() * CHR_SIZE,
        );
        out.extend_from_slice(self.version_header.as_slice());
        out.extend_from_slice(&self.chr_offset.to_le_bytes());
        out.extend_from_slice(&self.pre_hero_data);
        for hero in &self.heroes {
            out.extend_from_slice(&hero.to_bytes()?);
        }
        Ok(out)
    }

    /// The active-group selector, metadata byte 1.
    pub fn active_group(&self) -> Option<u8> {
        self.metadata.get(1).copied()
    }

    /// Indices of the heroes whose group field matches the active-group
    /// selector, in file order.
    pub fn active_hero_indices(&self) -> Vec<usize> {
        let Some(group) = self.active_group() else {
            return Vec::new();
        };
        self.heroes
            .iter()
            .enumerate()
            .filter(|(_, h)| h.idx_heroes_group == group)
            .map(|(i, _)| i)
            .collect()
    }

    /// Check container-level consistency without failing. An empty list
    /// means re-encoding reproduces a self-consistent file.
    pub fn validate(&self) -> Vec<Inconsistency> {
        let mut issues = Vec::new();

        let expected = PRE_HERO_START + self.pre_hero_data.len();
        if i64::from(self.chr_offset) != expected as i64 {
            issues.push(Inconsistency::OffsetMismatch {
                chr_offset: self.chr_offset,
                expected,
            });
        }
        if self.trailing_bytes != 0 {
            issues.push(Inconsistency::TrailingBytes {
                count: self.trailing_bytes,
            });
        }
        if !self.pre_hero_data.starts_with(&self.metadata) {
            issues.push(Inconsistency::MetadataDrift);
        }

        issues
    }
}
