//! Provider resolution and library merging for Kotatsu → Mihon migrations.
//!
//! This crate owns the migration logic without knowing anything about
//! backup file formats: typed records come in, new destination records and
//! diagnostics come out. `shelf-backup` handles the bytes on either side.

pub mod matcher;
pub mod merge;
pub mod migrate;
pub mod normalize;
pub mod progress;
pub mod reconcile;
pub mod settings;
pub mod types;
pub mod usage;

pub use matcher::{MatchReport, edit_distance, match_providers};
pub use merge::{MergeError, MergeOutcome, merge_entries, url_path};
pub use migrate::{
    DestinationLibrary, DestinationSnapshot, MigrateError, MigrationOptions, MigrationPlan,
    MigrationReport, migrate, plan_migration,
};
pub use normalize::normalize_provider_name;
pub use progress::{EntryOutcome, LogProgress, MergeProgress, SilentProgress};
pub use reconcile::{CategoryPlan, reconcile_categories};
pub use settings::{MigrationSettings, SettingsError, load_settings, settings_path};
pub use types::*;
pub use usage::{UsageStats, aggregate_usage};
