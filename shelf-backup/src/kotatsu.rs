//! Kotatsu backup archives.
//!
//! A Kotatsu backup is a zip file holding one JSON document per section
//! (`index`, `history`, `categories`, `favourites`, `settings`, ...). Only
//! `categories` and `favourites` are needed to rebuild the library; every
//! other section and every unknown field is ignored.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use zip::ZipArchive;
use zip::result::ZipError;

use shelf_core::{CategoryRecord, LibraryEntry, SourceLibrary};

use crate::error::BackupError;

const CATEGORIES_ENTRY: &str = "categories";
const FAVOURITES_ENTRY: &str = "favourites";
/// Largest buffer reserved up front from an entry's declared size.
const MAX_CAPACITY_HINT: u64 = 16 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct KotatsuCategory {
    category_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct KotatsuFavourite {
    category_id: i64,
    manga: KotatsuManga,
}

#[derive(Debug, Deserialize)]
struct KotatsuManga {
    source: String,
    title: String,
    public_url: String,
}

/// The library content of a Kotatsu backup.
#[derive(Debug, Clone)]
pub struct KotatsuBackup {
    library: SourceLibrary,
}

impl KotatsuBackup {
    /// Open a Kotatsu backup archive from disk.
    pub fn open(path: &Path) -> Result<Self, BackupError> {
        let file = File::open(path).map_err(|e| BackupError::io(path, e))?;
        let backup = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "Read {} categories and {} favourites from {}",
            backup.library.categories.len(),
            backup.library.entries.len(),
            path.display()
        );
        Ok(backup)
    }

    /// Read a Kotatsu backup archive from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, BackupError> {
        let mut archive = ZipArchive::new(reader)?;

        let categories: Vec<KotatsuCategory> = read_json_entry(&mut archive, CATEGORIES_ENTRY)?;
        let favourites: Vec<KotatsuFavourite> = read_json_entry(&mut archive, FAVOURITES_ENTRY)?;

        let library = SourceLibrary {
            categories: categories
                .into_iter()
                .map(|c| CategoryRecord {
                    id: c.category_id,
                    title: c.title,
                })
                .collect(),
            entries: favourites
                .into_iter()
                .map(|f| LibraryEntry {
                    category_id: f.category_id,
                    provider: f.manga.source,
                    title: f.manga.title,
                    public_url: f.manga.public_url,
                })
                .collect(),
        };

        Ok(Self { library })
    }

    pub fn library(&self) -> &SourceLibrary {
        &self.library
    }

    pub fn into_library(self) -> SourceLibrary {
        self.library
    }
}

/// The declared size comes from the archive header and is not trusted.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_CAPACITY_HINT)).unwrap_or(0)
}

/// Deserialize one JSON document stored in the archive.
fn read_json_entry<R, T>(archive: &mut ZipArchive<R>, name: &str) -> Result<T, BackupError>
where
    R: Read + Seek,
    T: DeserializeOwned,
{
    let mut file = match archive.by_name(name) {
        Ok(f) => f,
        Err(ZipError::FileNotFound) => return Err(BackupError::MissingEntry(name.to_string())),
        Err(e) => return Err(e.into()),
    };

    let mut contents = Vec::with_capacity(capacity_hint(file.size()));
    file.read_to_end(&mut contents)
        .map_err(|e| BackupError::io(Path::new(name), e))?;

    serde_json::from_slice(&contents).map_err(|e| BackupError::Json {
        entry: name.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_hint_is_capped() {
        assert_eq!(capacity_hint(0), 0);
        assert_eq!(capacity_hint(1024), 1024);
        assert_eq!(capacity_hint(u64::MAX), MAX_CAPACITY_HINT as usize);
    }
}
