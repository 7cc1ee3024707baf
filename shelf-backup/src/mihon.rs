//! Mihon `.tachibk` backups.
//!
//! A backup is a gzip stream wrapping a single protobuf `Backup` message.
//! Restoring one replaces the app's whole state, so a migration extends an
//! existing backup instead of producing a fresh one.
//!
//! Only the fields the migration reads or writes are modelled:
//!
//! ```text
//! Backup          { backupManga = 1; backupCategories = 2; backupSources = 101; ... }
//! BackupCategory  { name = 1; order = 2; id = 3; flags = 100 }
//! BackupSource    { name = 1; sourceId = 2 }
//! BackupManga     { source = 1; url = 2; title = 3; categories = 17; initialized = 111; ... }
//! ```
//!
//! Everything else in the template (preferences, extension settings, chapter
//! history) is carried over byte for byte. The output is rebuilt at the wire
//! level from the original field records plus the new ones.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use prost::Message;
use prost::bytes::Buf;
use prost::encoding::{self, WireType};

use shelf_core::{
    DestinationCategory, DestinationLibrary, DestinationLibraryEntry, DestinationProviderEntry,
};

use crate::error::BackupError;

const MANGA_TAG: u32 = 1;
const CATEGORY_TAG: u32 = 2;

/// The subset of `Backup` needed to snapshot the destination.
#[derive(Clone, PartialEq, Message)]
struct BackupIndex {
    #[prost(message, repeated, tag = "2")]
    backup_categories: Vec<BackupCategory>,
    #[prost(message, repeated, tag = "101")]
    backup_sources: Vec<BackupSource>,
}

#[derive(Clone, PartialEq, Message)]
pub struct BackupCategory {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int64, tag = "2")]
    pub order: i64,
    #[prost(int64, tag = "3")]
    pub id: i64,
    #[prost(int64, tag = "100")]
    pub flags: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct BackupSource {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int64, tag = "2")]
    pub source_id: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct BackupManga {
    #[prost(int64, tag = "1")]
    pub source: i64,
    #[prost(string, tag = "2")]
    pub url: String,
    #[prost(string, tag = "3")]
    pub title: String,
    #[prost(int64, repeated, packed = "false", tag = "17")]
    pub categories: Vec<i64>,
    #[prost(bool, tag = "111")]
    pub initialized: bool,
}

impl From<&DestinationCategory> for BackupCategory {
    fn from(category: &DestinationCategory) -> Self {
        Self {
            name: category.title.clone(),
            order: category.order,
            id: category.id,
            flags: category.flags,
        }
    }
}

impl From<DestinationLibraryEntry> for BackupManga {
    fn from(entry: DestinationLibraryEntry) -> Self {
        Self {
            source: entry.provider_id,
            url: entry.url_path,
            title: entry.title,
            categories: entry.category_ids.into_iter().collect(),
            initialized: entry.initialized,
        }
    }
}

/// Byte range of one top-level field record (key included) in the raw message.
#[derive(Debug, Clone)]
struct FieldSpan {
    tag: u32,
    range: Range<usize>,
}

/// A Mihon backup used as the template for a migration.
#[derive(Debug, Clone)]
pub struct MihonBackup {
    raw: Vec<u8>,
    spans: Vec<FieldSpan>,
    categories: Vec<DestinationCategory>,
    providers: Vec<DestinationProviderEntry>,
    new_categories: Vec<BackupCategory>,
    new_manga: Vec<BackupManga>,
}

impl MihonBackup {
    /// Open and gunzip a `.tachibk` file.
    pub fn open(path: &Path) -> Result<Self, BackupError> {
        let file = File::open(path).map_err(|e| BackupError::io(path, e))?;
        let mut raw = Vec::new();
        GzDecoder::new(BufReader::new(file))
            .read_to_end(&mut raw)
            .map_err(|e| BackupError::io(path, e))?;
        let backup = Self::decode(raw)?;
        log::debug!(
            "Read {} categories, {} sources, {} manga from {}",
            backup.categories.len(),
            backup.providers.len(),
            backup.existing_manga_count(),
            path.display()
        );
        Ok(backup)
    }

    /// Decode an uncompressed `Backup` message.
    pub fn decode(raw: Vec<u8>) -> Result<Self, BackupError> {
        let spans = scan_fields(&raw)?;
        let index = BackupIndex::decode(raw.as_slice())?;

        let categories = index
            .backup_categories
            .into_iter()
            .map(|c| DestinationCategory {
                id: c.id,
                title: c.name,
                order: c.order,
                flags: c.flags,
            })
            .collect();
        let providers = index
            .backup_sources
            .into_iter()
            .map(|s| DestinationProviderEntry {
                name: s.name,
                provider_id: s.source_id,
            })
            .collect();

        Ok(Self {
            raw,
            spans,
            categories,
            providers,
            new_categories: Vec::new(),
            new_manga: Vec::new(),
        })
    }

    /// Number of manga records in the template.
    pub fn existing_manga_count(&self) -> usize {
        self.spans.iter().filter(|s| s.tag == MANGA_TAG).count()
    }

    /// Manga records appended since the backup was loaded.
    pub fn appended_manga(&self) -> &[BackupManga] {
        &self.new_manga
    }

    /// Serialize the template plus everything appended, uncompressed.
    ///
    /// Field records are grouped as: existing manga, new manga, existing
    /// categories, new categories, then every other field in original order.
    pub fn encode(&self) -> Vec<u8> {
        let extra: usize = self
            .new_manga
            .iter()
            .map(|m| m.encoded_len() + 12)
            .chain(self.new_categories.iter().map(|c| c.encoded_len() + 12))
            .sum();
        let mut out = Vec::with_capacity(self.raw.len() + extra);

        self.copy_fields(&mut out, |tag| tag == MANGA_TAG);
        for manga in &self.new_manga {
            encoding::message::encode(MANGA_TAG, manga, &mut out);
        }
        self.copy_fields(&mut out, |tag| tag == CATEGORY_TAG);
        for category in &self.new_categories {
            encoding::message::encode(CATEGORY_TAG, category, &mut out);
        }
        self.copy_fields(&mut out, |tag| tag != MANGA_TAG && tag != CATEGORY_TAG);

        out
    }

    /// Gzip the backup to `path`.
    ///
    /// Data goes to a sibling temporary file that is renamed over `path`
    /// once complete, so `path` never holds a partial backup.
    pub fn write(&self, path: &Path) -> Result<(), BackupError> {
        let tmp = temp_path(path).ok_or_else(|| {
            BackupError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "path does not name a file"),
            )
        })?;
        let result = write_gzip(&tmp, &self.encode())
            .and_then(|()| fs::rename(&tmp, path).map_err(|e| BackupError::io(path, e)));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn copy_fields(&self, out: &mut Vec<u8>, keep: impl Fn(u32) -> bool) {
        for span in self.spans.iter().filter(|s| keep(s.tag)) {
            out.extend_from_slice(&self.raw[span.range.clone()]);
        }
    }
}

impl DestinationLibrary for MihonBackup {
    fn categories(&self) -> &[DestinationCategory] {
        &self.categories
    }

    fn providers(&self) -> &[DestinationProviderEntry] {
        &self.providers
    }

    fn append(
        &mut self,
        categories: Vec<DestinationCategory>,
        entries: Vec<DestinationLibraryEntry>,
    ) {
        self.new_categories
            .extend(categories.iter().map(BackupCategory::from));
        self.categories.extend(categories);
        self.new_manga.extend(entries.into_iter().map(BackupManga::from));
    }
}

/// Split a message into its top-level field records.
fn scan_fields(raw: &[u8]) -> Result<Vec<FieldSpan>, BackupError> {
    let mut buf = raw;
    let mut spans = Vec::new();

    while buf.has_remaining() {
        let start = raw.len() - buf.remaining();
        let (tag, wire_type) = encoding::decode_key(&mut buf)?;
        match wire_type {
            WireType::Varint => {
                encoding::decode_varint(&mut buf)?;
            }
            WireType::SixtyFourBit => skip(&mut buf, 8, tag)?,
            WireType::ThirtyTwoBit => skip(&mut buf, 4, tag)?,
            WireType::LengthDelimited => {
                let len = encoding::decode_varint(&mut buf)?;
                let len = usize::try_from(len).map_err(|_| {
                    BackupError::invalid_backup(format!("field {tag} length {len} overflows"))
                })?;
                skip(&mut buf, len, tag)?;
            }
            WireType::StartGroup | WireType::EndGroup => {
                return Err(BackupError::invalid_backup(format!(
                    "unsupported group encoding in field {tag}"
                )));
            }
        }
        let end = raw.len() - buf.remaining();
        spans.push(FieldSpan {
            tag,
            range: start..end,
        });
    }

    Ok(spans)
}

fn skip(buf: &mut &[u8], len: usize, tag: u32) -> Result<(), BackupError> {
    if buf.remaining() < len {
        return Err(BackupError::invalid_backup(format!(
            "field {tag} truncated: need {len} bytes, {} left",
            buf.remaining()
        )));
    }
    buf.advance(len);
    Ok(())
}

fn temp_path(path: &Path) -> Option<PathBuf> {
    let mut name = path.file_name()?.to_os_string();
    name.push(".tmp");
    Some(path.with_file_name(name))
}

fn write_gzip(path: &Path, data: &[u8]) -> Result<(), BackupError> {
    let io_err = |e| BackupError::io(path, e);
    let file = File::create(path).map_err(io_err)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    encoder.write_all(data).map_err(io_err)?;
    encoder.finish().map_err(io_err)?.flush().map_err(io_err)?;
    Ok(())
}
