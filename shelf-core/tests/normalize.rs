use shelf_core::normalize_provider_name;

#[test]
fn strips_version_suffix() {
    assert_eq!(normalize_provider_name("FooScans V12"), "fooscans");
    assert_eq!(normalize_provider_name("MangaDex V1"), "mangadex");
}

#[test]
fn strips_unoriginal_qualifier() {
    assert_eq!(normalize_provider_name("Bar (Unoriginal)"), "bar");
}

#[test]
fn strips_fun_marker() {
    assert_eq!(normalize_provider_name("Baz_FUN"), "baz");
}

#[test]
fn combined_suffixes() {
    assert_eq!(normalize_provider_name("Qux_FUN (Unoriginal) V3"), "qux");
}

#[test]
fn version_is_removed_before_qualifier() {
    // The version marker is only trailing once the qualifier is already gone,
    // which is too late for the first rule.
    assert_eq!(normalize_provider_name("Qux V3 (Unoriginal)"), "qux v3");
}

#[test]
fn lowercases_everything() {
    assert_eq!(normalize_provider_name("MANGA Plus"), "manga plus");
}

#[test]
fn empty_name() {
    assert_eq!(normalize_provider_name(""), "");
}

#[test]
fn idempotent() {
    let samples = [
        "FooScans V12",
        "Bar (Unoriginal)",
        "Baz_FUN",
        "Qux_FUN (Unoriginal) V3",
        "Qux V3 (Unoriginal)",
        "A_F_FUNUN",
        " V1",
        "Already lower",
        "Ünïcödé V9",
    ];
    for sample in samples {
        let once = normalize_provider_name(sample);
        assert_eq!(normalize_provider_name(&once), once, "input: {sample:?}");
    }
}
