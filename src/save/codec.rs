//! Snapshot file format
//!
//! Header (little-endian):
//!   [0..4]   magic "PKUS"
//!   [4..6]   format version (u16)
//!   [6..8]   section count (u16)
//!   [8..16]  time created (u64, Unix epoch ms)
//!   [16..20] xxHash32 of the whole file except these four bytes
//!   [20..22] build version length (u16), followed by the UTF-8 bytes
//!
//! Then `section count` sections, each `tag (u16) | length (u32) | body`,
//! with JSON bodies. Unknown tags are skipped so older builds can read files
//! that gained new sections. Party, storage, bag and events fall back to empty
//! when a section is absent; profile and transforms are required.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh32::Xxh32;

use crate::game::{Badges, Direction, EventRecord, PlayTime, Pokedex, Vec3};
use crate::items::Bag;
use crate::pokemon::{Party, StorageBoxes};

use super::error::SaveError;
use super::snapshot::SnapshotRecord;

/// Magic bytes identifying a snapshot file
pub const MAGIC: [u8; 4] = *b"PKUS";

/// Current snapshot format version
pub const FORMAT_VERSION: u16 = 1;

/// Fixed part of the header, up to and including the checksum
pub const HEADER_SIZE: usize = 20;

const CHECKSUM_OFFSET: usize = 16;
const XXHASH_SEED: u32 = 0;

const TAG_PROFILE: u16 = 1;
const TAG_TRANSFORMS: u16 = 2;
const TAG_PARTY: u16 = 3;
const TAG_STORAGE: u16 = 4;
const TAG_BAG: u16 = 5;
const TAG_EVENTS: u16 = 6;

/// Header fields readable without decoding any section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub format_version: u16,
    pub section_count: u16,
    pub time_created: u64,
    pub checksum: u32,
    pub build_version: String,
}

#[derive(Serialize, Deserialize)]
struct ProfileSection {
    save_name: String,
    scene_index: u32,
    trainer_name: String,
    trainer_id: u16,
    secret_id: u16,
    is_male: bool,
    pokedex: Pokedex,
    #[serde(default)]
    badges: Badges,
    playtime: PlayTime,
}

#[derive(Serialize, Deserialize)]
struct TransformSection {
    player_position: Vec3,
    player_facing: Direction,
    follower_position: Vec3,
    follower_facing: Direction,
}

/// Encode a snapshot into file bytes
pub fn encode(record: &SnapshotRecord) -> Result<Vec<u8>, SaveError> {
    let profile = ProfileSection {
        save_name: record.save_name.clone(),
        scene_index: record.scene_index,
        trainer_name: record.trainer_name.clone(),
        trainer_id: record.trainer_id,
        secret_id: record.secret_id,
        is_male: record.is_male,
        pokedex: record.pokedex.clone(),
        badges: record.badges.clone(),
        playtime: record.playtime,
    };
    let transforms = TransformSection {
        player_position: record.player_position,
        player_facing: record.player_facing,
        follower_position: record.follower_position,
        follower_facing: record.follower_facing,
    };

    let sections = [
        (TAG_PROFILE, section_body(&profile)?),
        (TAG_TRANSFORMS, section_body(&transforms)?),
        (TAG_PARTY, section_body(&record.party)?),
        (TAG_STORAGE, section_body(&record.storage)?),
        (TAG_BAG, section_body(&record.bag)?),
        (TAG_EVENTS, section_body(&record.scheduled_events)?),
    ];

    let version_bytes = record.build_version.as_bytes();
    let version_len = u16::try_from(version_bytes.len())
        .map_err(|_| SaveError::Encode("build version is too long".to_string()))?;

    let mut out = Vec::with_capacity(
        HEADER_SIZE + 2 + version_bytes.len() + sections.iter().map(|(_, b)| b.len() + 6).sum::<usize>(),
    );
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(sections.len() as u16).to_le_bytes());
    out.extend_from_slice(&record.time_created.to_le_bytes());
    // Checksum placeholder, filled in once the body is written
    out.extend_from_slice(&0u32.to_le_bytes());

    out.extend_from_slice(&version_len.to_le_bytes());
    out.extend_from_slice(version_bytes);

    for (tag, body) in &sections {
        let len = u32::try_from(body.len())
            .map_err(|_| SaveError::Encode(format!("section {} is too large", tag)))?;
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(body);
    }

    let checksum = file_checksum(&out);
    out[CHECKSUM_OFFSET..HEADER_SIZE].copy_from_slice(&checksum.to_le_bytes());
    Ok(out)
}

/// xxHash32 over every byte except the checksum field itself
fn file_checksum(bytes: &[u8]) -> u32 {
    let mut hasher = Xxh32::new(XXHASH_SEED);
    hasher.update(&bytes[..CHECKSUM_OFFSET]);
    hasher.update(&bytes[HEADER_SIZE..]);
    hasher.digest()
}

/// Read the header and build version without verifying the checksum
pub fn peek_header(bytes: &[u8]) -> Result<SnapshotHeader, SaveError> {
    let mut reader = ByteReader::new(bytes);
    read_header(&mut reader)
}

/// Decode file bytes into a snapshot
pub fn decode(bytes: &[u8]) -> Result<SnapshotRecord, SaveError> {
    let mut reader = ByteReader::new(bytes);
    let header = read_header(&mut reader)?;

    let computed = file_checksum(bytes);
    if computed != header.checksum {
        return Err(SaveError::Corrupt(format!(
            "checksum mismatch (expected {:#010X}, got {:#010X})",
            header.checksum, computed
        )));
    }

    let mut profile: Option<ProfileSection> = None;
    let mut transforms: Option<TransformSection> = None;
    let mut party = Party::new();
    let mut storage = StorageBoxes::new();
    let mut bag = Bag::new();
    let mut events: Vec<EventRecord> = Vec::new();

    for _ in 0..header.section_count {
        let tag = reader.u16()?;
        let len = reader.u32()? as usize;
        let body = reader.take(len)?;
        match tag {
            TAG_PROFILE => profile = Some(parse_section(tag, body)?),
            TAG_TRANSFORMS => transforms = Some(parse_section(tag, body)?),
            TAG_PARTY => party = parse_section(tag, body)?,
            TAG_STORAGE => storage = parse_section(tag, body)?,
            TAG_BAG => bag = parse_section(tag, body)?,
            TAG_EVENTS => events = parse_section(tag, body)?,
            other => log::debug!("Skipping unknown snapshot section {} ({} bytes)", other, len),
        }
    }

    if reader.remaining() != 0 {
        return Err(SaveError::Corrupt(format!(
            "{} trailing bytes after last section",
            reader.remaining()
        )));
    }

    let profile = profile.ok_or_else(|| SaveError::Corrupt("missing profile section".to_string()))?;
    let transforms =
        transforms.ok_or_else(|| SaveError::Corrupt("missing transform section".to_string()))?;

    // Files are written sorted, but never trust the order on disk
    events.sort_by_key(|e| e.trigger_time);

    Ok(SnapshotRecord {
        build_version: header.build_version,
        time_created: header.time_created,
        save_name: profile.save_name,
        scene_index: profile.scene_index,
        trainer_name: profile.trainer_name,
        trainer_id: profile.trainer_id,
        secret_id: profile.secret_id,
        is_male: profile.is_male,
        pokedex: profile.pokedex,
        badges: profile.badges,
        playtime: profile.playtime,
        player_position: transforms.player_position,
        player_facing: transforms.player_facing,
        follower_position: transforms.follower_position,
        follower_facing: transforms.follower_facing,
        party,
        storage,
        bag,
        scheduled_events: events,
    })
}

fn read_header(reader: &mut ByteReader<'_>) -> Result<SnapshotHeader, SaveError> {
    if reader.bytes.len() < HEADER_SIZE {
        return Err(SaveError::Corrupt(format!(
            "file is too short ({} bytes, need at least {})",
            reader.bytes.len(),
            HEADER_SIZE
        )));
    }
    if reader.take(4)? != MAGIC {
        return Err(SaveError::Corrupt("not a snapshot file (bad magic)".to_string()));
    }

    let format_version = reader.u16()?;
    if format_version > FORMAT_VERSION {
        return Err(SaveError::UnsupportedFormat {
            found: format_version,
            supported: FORMAT_VERSION,
        });
    }
    let section_count = reader.u16()?;
    let time_created = reader.u64()?;
    let checksum = reader.u32()?;

    let version_len = reader.u16()? as usize;
    let build_version = std::str::from_utf8(reader.take(version_len)?)
        .map_err(|e| SaveError::Corrupt(format!("build version is not UTF-8: {}", e)))?
        .to_string();

    Ok(SnapshotHeader {
        format_version,
        section_count,
        time_created,
        checksum,
        build_version,
    })
}

fn section_body<T: Serialize>(value: &T) -> Result<Vec<u8>, SaveError> {
    serde_json::to_vec(value).map_err(|e| SaveError::Encode(e.to_string()))
}

fn parse_section<T: DeserializeOwned>(tag: u16, body: &[u8]) -> Result<T, SaveError> {
    serde_json::from_slice(body)
        .map_err(|e| SaveError::Corrupt(format!("section {}: {}", tag, e)))
}

/// Bounds-checked little-endian cursor
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SaveError> {
        if n > self.remaining() {
            return Err(SaveError::Corrupt(format!(
                "unexpected end of file at byte {} (wanted {} more, {} left)",
                self.pos,
                n,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], SaveError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16, SaveError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, SaveError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, SaveError> {
        Ok(u64::from_le_bytes(self.array()?))
    }
}
