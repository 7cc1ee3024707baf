use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_backup::KotatsuBackup;
use shelf_core::{SourceLibrary, UsageStats, aggregate_usage};

use crate::error::CliError;

/// Print a short summary of a Kotatsu backup.
pub(crate) fn run_list(kotatsu_backup: &Path) -> Result<(), CliError> {
    let library = KotatsuBackup::open(kotatsu_backup)?.into_library();
    let usage = aggregate_usage(&library.entries);

    log::info!("{}", "Categories:".if_supports_color(Stdout, |t| t.bold()));
    for line in category_lines(&library, &usage) {
        log::info!("{}", line);
    }
    log::info!("");

    log::info!("{}", "Sources:".if_supports_color(Stdout, |t| t.bold()));
    for line in source_lines(&usage) {
        log::info!("{}", line);
    }
    log::info!("");

    log::info!("{}", "Mangas:".if_supports_color(Stdout, |t| t.bold()));
    for line in manga_lines(&library) {
        log::info!("{}", line);
    }

    Ok(())
}

fn category_lines(library: &SourceLibrary, usage: &UsageStats) -> Vec<String> {
    let mut lines = vec!["  Id Refs Name".to_string(), "---- ---- ----".to_string()];
    lines.extend(library.categories.iter().map(|c| {
        format!("{:>4} {:>4} '{}'", c.id, usage.category_refs(c.id), c.title)
    }));
    lines
}

fn source_lines(usage: &UsageStats) -> Vec<String> {
    let mut lines = vec!["Refs Name".to_string(), "---- ----".to_string()];
    lines.extend(
        usage
            .providers
            .iter()
            .map(|(name, refs)| format!("{:>4} '{}'", refs, name)),
    );
    lines
}

fn manga_lines(library: &SourceLibrary) -> Vec<String> {
    let mut lines = vec![
        "Category    Source             Name          URL".to_string(),
        "-------- ------------ ---------------------- ---".to_string(),
    ];
    lines.extend(library.entries.iter().map(|e| {
        format!(
            "{:>8} {:<12} {:<20} {}",
            e.category_id,
            e.provider,
            format!("'{}'", e.title),
            e.public_url
        )
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{CategoryRecord, LibraryEntry};

    fn library() -> SourceLibrary {
        SourceLibrary {
            categories: vec![
                CategoryRecord {
                    id: 1,
                    title: "Reading".to_string(),
                },
                CategoryRecord {
                    id: 2,
                    title: "Empty".to_string(),
                },
            ],
            entries: vec![
                LibraryEntry {
                    category_id: 1,
                    provider: "MANGADEX".to_string(),
                    title: "Frieren".to_string(),
                    public_url: "https://mangadex.org/title/frieren".to_string(),
                },
                LibraryEntry {
                    category_id: 1,
                    provider: "BATOTO".to_string(),
                    title: "Vinland Saga".to_string(),
                    public_url: "https://bato.to/series/72315".to_string(),
                },
            ],
        }
    }

    #[test]
    fn unused_categories_show_zero_refs() {
        let library = library();
        let usage = aggregate_usage(&library.entries);
        let lines = category_lines(&library, &usage);
        assert_eq!(lines[2], "   1    2 'Reading'");
        assert_eq!(lines[3], "   2    0 'Empty'");
    }

    #[test]
    fn sources_are_sorted_by_name() {
        let usage = aggregate_usage(&library().entries);
        let lines = source_lines(&usage);
        assert_eq!(&lines[2..], &["   1 'BATOTO'", "   1 'MANGADEX'"]);
    }

    #[test]
    fn manga_rows_are_padded() {
        let lines = manga_lines(&library());
        assert_eq!(
            lines[2],
            "       1 MANGADEX     'Frieren'            https://mangadex.org/title/frieren"
        );
    }
}
