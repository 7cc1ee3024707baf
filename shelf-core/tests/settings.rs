use shelf_core::*;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = load_settings(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, MigrationSettings::default());

    let options = MigrationOptions::from(settings);
    assert_eq!(options, MigrationOptions::default());
    assert_eq!(options.match_threshold, 4);
    assert_eq!(options.category_prefix, "kotatsu");
    assert_eq!(options.category_flags, 64);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[matching]\nthreshold = 2\n").unwrap();

    let options = MigrationOptions::from(load_settings(&path).unwrap());
    assert_eq!(options.match_threshold, 2);
    assert_eq!(options.category_prefix, "kotatsu");
    assert_eq!(options.category_flags, 64);
}

#[test]
fn full_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "[matching]\nthreshold = 6\n\n[categories]\nprefix = \"imported\"\nflags = 0\n",
    )
    .unwrap();

    let options = MigrationOptions::from(load_settings(&path).unwrap());
    assert_eq!(options.match_threshold, 6);
    assert_eq!(options.category_prefix, "imported");
    assert_eq!(options.category_flags, 0);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[matching]\nthreshold = \"four\"\n").unwrap();

    let err = load_settings(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parse { .. }));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[matching]\ntreshold = 3\n").unwrap();

    assert!(load_settings(&path).is_err());
}

#[test]
fn settings_path_is_under_app_dir() {
    let path = settings_path();
    assert!(path.ends_with("shelf-migrate/settings.toml"));
}
