use shelf_core::*;

/// In-memory destination used to observe what a migration appends.
#[derive(Debug, Clone, Default, PartialEq)]
struct MemoryLibrary {
    categories: Vec<DestinationCategory>,
    providers: Vec<DestinationProviderEntry>,
    entries: Vec<DestinationLibraryEntry>,
    appends: usize,
}

impl DestinationLibrary for MemoryLibrary {
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
        self.categories.extend(categories);
        self.entries.extend(entries);
        self.appends += 1;
    }
}

fn destination() -> MemoryLibrary {
    MemoryLibrary {
        categories: vec![
            DestinationCategory {
                id: 3,
                title: "Favorites".to_string(),
                order: 1,
                flags: 0,
            },
            DestinationCategory {
                id: 5,
                title: "kotatsu_refs".to_string(),
                order: 10,
                flags: 0,
            },
        ],
        providers: vec![
            DestinationProviderEntry {
                name: "MangaDex".to_string(),
                provider_id: 2499283573021220255,
            },
            DestinationProviderEntry {
                name: "Comick".to_string(),
                provider_id: 4698643580069413377,
            },
        ],
        ..Default::default()
    }
}

fn source() -> SourceLibrary {
    SourceLibrary {
        categories: vec![
            CategoryRecord {
                id: 1700000000001,
                title: "Reading".to_string(),
            },
            CategoryRecord {
                id: 1700000000002,
                title: "Completed".to_string(),
            },
        ],
        entries: vec![
            LibraryEntry {
                category_id: 1700000000001,
                provider: "MANGADEX".to_string(),
                title: "Frieren".to_string(),
                public_url: "https://mangadex.org/title/frieren".to_string(),
            },
            LibraryEntry {
                category_id: 1700000000002,
                provider: "BATOTO".to_string(),
                title: "Vinland Saga".to_string(),
                public_url: "https://bato.to/series/72315".to_string(),
            },
            LibraryEntry {
                category_id: 1700000000002,
                provider: "MANGADEX".to_string(),
                title: "Dungeon Meshi".to_string(),
                public_url: "https://mangadex.org/title/meshi".to_string(),
            },
        ],
    }
}

#[test]
fn end_to_end_imports_matched_and_skips_the_rest() {
    let mut dest = destination();
    let report = migrate(&source(), &mut dest, &MigrationOptions::default(), &SilentProgress).unwrap();

    // One append carrying everything.
    assert_eq!(dest.appends, 1);

    // Categories grew by exactly 2, above the previous maxima (id 5, order 10).
    assert_eq!(report.categories_created, 2);
    assert_eq!(dest.categories.len(), 4);
    let new: Vec<_> = dest.categories[2..].iter().map(|c| (c.id, c.order)).collect();
    assert_eq!(new, vec![(6, 11), (7, 12)]);
    assert_eq!(dest.categories[2].title, "kotatsu_Reading");
    assert_eq!(dest.categories[3].title, "kotatsu_Completed");
    assert!(dest.categories[2..].iter().all(|c| c.flags == MIGRATED_CATEGORY_FLAG));

    // Only MangaDex entries were imported, in source order.
    assert_eq!(report.imported, 2);
    let titles: Vec<_> = dest.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Frieren", "Dungeon Meshi"]);
    assert!(dest.entries.iter().all(|e| e.provider_id == 2499283573021220255));
    assert!(dest.entries.iter().all(|e| !e.initialized));
    assert_eq!(dest.entries[0].category_ids.iter().copied().collect::<Vec<_>>(), vec![11]);
    assert_eq!(dest.entries[1].category_ids.iter().copied().collect::<Vec<_>>(), vec![12]);

    // The Bato.to entry is reported, not dropped silently.
    assert_eq!(report.skips.len(), 1);
    assert_eq!(report.skips[0].entry.title, "Vinland Saga");
    assert_eq!(report.skips[0].reason, SkipReason::UnmatchedProvider);
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(report.unmatched[0].name, "BATOTO");
    assert!(!report.empty_catalog);

    assert_eq!(report.provider_mapping.get("MANGADEX"), Some("MangaDex"));
    assert_eq!(report.usage.provider_refs("MANGADEX"), 2);
    assert_eq!(report.usage.category_refs(1700000000002), 2);
}

#[test]
fn category_ids_only_come_from_this_run() {
    let mut dest = destination();
    migrate(&source(), &mut dest, &MigrationOptions::default(), &SilentProgress).unwrap();

    let created: Vec<i64> = dest.categories[2..].iter().map(|c| c.order).collect();
    for entry in &dest.entries {
        assert!(!entry.category_ids.is_empty());
        assert!(entry.category_ids.iter().all(|id| created.contains(id)));
    }
}

#[test]
fn empty_source_leaves_destination_unchanged() {
    let mut dest = destination();
    let before = dest.clone();

    let report = migrate(
        &SourceLibrary::default(),
        &mut dest,
        &MigrationOptions::default(),
        &SilentProgress,
    )
    .unwrap();

    assert_eq!(report.categories_created, 0);
    assert_eq!(report.imported, 0);
    assert!(report.skips.is_empty());
    assert_eq!(dest.categories, before.categories);
    assert_eq!(dest.entries, before.entries);
}

#[test]
fn empty_destination_catalog_is_flagged() {
    let mut dest = MemoryLibrary::default();
    let report = migrate(&source(), &mut dest, &MigrationOptions::default(), &SilentProgress).unwrap();

    assert!(report.empty_catalog);
    assert_eq!(report.imported, 0);
    assert_eq!(report.skips.len(), 3);
    assert_eq!(report.unmatched.len(), 2);
    // No categories before: allocation starts right after 0.
    let new: Vec<_> = dest.categories.iter().map(|c| (c.id, c.order)).collect();
    assert_eq!(new, vec![(1, 1), (2, 2)]);
}

#[test]
fn dangling_category_aborts_without_appending() {
    let mut dest = destination();
    let before = dest.clone();
    let mut src = source();
    src.entries[0].category_id = 42;

    let err = migrate(&src, &mut dest, &MigrationOptions::default(), &SilentProgress).unwrap_err();
    assert!(matches!(
        err,
        MigrateError::Merge(MergeError::UnreconciledCategory { category_id: 42, .. })
    ));
    assert_eq!(dest, before);
}

#[test]
fn options_control_prefix_flags_and_threshold() {
    let mut dest = destination();
    let options = MigrationOptions {
        match_threshold: 0,
        category_prefix: "imported".to_string(),
        category_flags: 0,
    };
    let mut src = source();
    src.entries[0].provider = "MangaDexx".to_string();

    let report = migrate(&src, &mut dest, &options, &SilentProgress).unwrap();
    assert_eq!(dest.categories[2].title, "imported_Reading");
    assert_eq!(dest.categories[2].flags, 0);
    // Distance 1 is not below a threshold of 0; exact matches still go through.
    assert!(!report.provider_mapping.contains("MangaDexx"));
    assert!(report.provider_mapping.contains("MANGADEX"));
}

#[test]
fn planning_is_deterministic() {
    let snapshot = DestinationSnapshot::capture(&destination());
    let options = MigrationOptions::default();
    let first = plan_migration(&source(), &snapshot, &options, &SilentProgress).unwrap();
    let second = plan_migration(&source(), &snapshot, &options, &SilentProgress).unwrap();
    assert_eq!(first, second);
}

#[test]
fn snapshot_keeps_last_id_for_duplicate_provider_names() {
    let providers = vec![
        DestinationProviderEntry {
            name: "MangaDex".to_string(),
            provider_id: 1,
        },
        DestinationProviderEntry {
            name: "MangaDex".to_string(),
            provider_id: 2,
        },
    ];
    let snapshot = DestinationSnapshot::from_parts(&[], &providers);
    assert_eq!(snapshot.provider_names, vec!["MangaDex".to_string()]);
    assert_eq!(snapshot.provider_ids["MangaDex"], 2);
    assert_eq!(snapshot.max_category_id, 0);
    assert_eq!(snapshot.max_category_order, 0);
}
