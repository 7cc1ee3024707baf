//! Readers and writers for the backup files on either side of a migration.
//!
//! - [`kotatsu`]: Kotatsu backup archives (zip of JSON documents), read-only.
//! - [`mihon`]: Mihon `.tachibk` backups (gzipped protobuf), read and extended.

pub mod error;
pub mod kotatsu;
pub mod mihon;

pub use error::BackupError;
pub use kotatsu::KotatsuBackup;
pub use mihon::MihonBackup;
