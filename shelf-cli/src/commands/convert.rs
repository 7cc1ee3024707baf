use std::collections::BTreeMap;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_backup::{KotatsuBackup, MihonBackup};
use shelf_core::{
    LogProgress, MigrationOptions, MigrationReport, MigrationSettings, SkipRecord, migrate,
};

use crate::cli_types::ConvertArgs;
use crate::error::CliError;

/// Import a Kotatsu library into a copy of a Mihon backup.
pub(crate) fn run_convert(args: ConvertArgs, settings: MigrationSettings) -> Result<(), CliError> {
    if args.output.file_name().is_none() {
        return Err(CliError::usage(format!(
            "Output path {} does not name a file",
            args.output.display()
        )));
    }
    if same_file(&args.mihon, &args.output) {
        return Err(CliError::usage(format!(
            "Refusing to overwrite the template backup {}; choose another output file",
            args.mihon.display()
        )));
    }

    let options = resolve_options(settings, args.threshold, args.prefix);
    log::debug!("Migration options: {:?}", options);

    let source = KotatsuBackup::open(&args.kotatsu)?.into_library();
    log::info!(
        "Read {} categories and {} mangas from {}",
        source.categories.len(),
        source.entries.len(),
        args.kotatsu.display()
    );

    let mut backup = MihonBackup::open(&args.mihon)?;
    log::info!(
        "Template {} has {} mangas",
        args.mihon.display(),
        backup.existing_manga_count()
    );
    log::info!("");

    let report = migrate(&source, &mut backup, &options, &LogProgress)?;
    print_report(&report);

    if args.dry_run {
        log::info!(
            "{}",
            format!("Dry run: {} not written", args.output.display())
                .if_supports_color(Stdout, |t| t.yellow())
        );
        return Ok(());
    }

    backup.write(&args.output)?;
    log::info!(
        "  {} Wrote {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        args.output.display()
    );

    Ok(())
}

/// Merge command-line overrides over the settings file.
fn resolve_options(
    settings: MigrationSettings,
    threshold: Option<usize>,
    prefix: Option<String>,
) -> MigrationOptions {
    let mut options = MigrationOptions::from(settings);
    if let Some(threshold) = threshold {
        options.match_threshold = threshold;
    }
    if let Some(prefix) = prefix {
        options.category_prefix = prefix;
    }
    options
}

/// Both paths exist and resolve to the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn print_report(report: &MigrationReport) {
    log::info!("");
    log::info!("{}", "Sources:".if_supports_color(Stdout, |t| t.bold()));
    for (source, destination) in report.provider_mapping.iter() {
        log::info!(
            "  {} '{}' -> '{}'",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            source,
            destination
        );
    }

    if report.empty_catalog {
        log::warn!(
            "The Mihon backup lists no sources. Install the extensions and add one manga \
             from each source before taking the backup."
        );
    } else {
        for unmatched in &report.unmatched {
            log::warn!(
                "Source not matched: '{}', best '{}' distance {}",
                unmatched.name,
                unmatched.best_candidate.as_deref().unwrap_or(""),
                unmatched
                    .distance
                    .map_or_else(|| "-".to_string(), |d| d.to_string())
            );
        }
    }

    log::info!("");
    log::info!(
        "{}",
        "Import complete".if_supports_color(Stdout, |t| t.bold())
    );
    log::info!("  Categories created: {}", report.categories_created);
    log::info!("  Mangas imported: {}", report.imported);
    for (reason, count) in skip_counts(&report.skips) {
        log::info!("  Mangas skipped ({reason}): {count}");
    }
}

/// Number of skipped entries per reason, ordered by reason.
fn skip_counts(skips: &[SkipRecord]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for skip in skips {
        *counts.entry(skip.reason.as_str()).or_insert(0) += 1;
    }
    counts
}
