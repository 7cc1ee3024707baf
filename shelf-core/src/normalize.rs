//! Canonical form for provider display names.
//!
//! Kotatsu and Mihon name the same provider differently in only a few
//! cosmetic ways: a trailing version marker (`"MangaDex V2"`), an
//! `" (Unoriginal)"` qualifier, a `_FUN` suffix, and casing. Both sides are
//! normalized before any distance is computed.

use std::sync::LazyLock;

use regex::Regex;

static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" V\d+$").expect("static pattern"));

const UNORIGINAL_QUALIFIER: &str = " (Unoriginal)";
const FUN_MARKER: &str = "_FUN";

/// Normalize a provider name for comparison.
///
/// Removes a trailing `" V<digits>"`, every `" (Unoriginal)"` and every
/// `"_FUN"`, then lowercases.
///
/// # Examples
///
/// ```
/// use shelf_core::normalize::normalize_provider_name;
///
/// assert_eq!(normalize_provider_name("FooScans V12"), "fooscans");
/// assert_eq!(normalize_provider_name("Bar (Unoriginal)"), "bar");
/// assert_eq!(normalize_provider_name("Baz_FUN"), "baz");
/// ```
pub fn normalize_provider_name(name: &str) -> String {
    let stripped = VERSION_SUFFIX.replace(name, "");
    stripped
        .replace(UNORIGINAL_QUALIFIER, "")
        .replace(FUN_MARKER, "")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_marker_only_at_end() {
        assert_eq!(normalize_provider_name("Foo V2 Bar"), "foo v2 bar");
        assert_eq!(normalize_provider_name("FooV2"), "foov2");
        assert_eq!(normalize_provider_name("Foo V"), "foo v");
    }

    #[test]
    fn lowercase_v_is_not_a_version_marker() {
        assert_eq!(normalize_provider_name("Foo v3"), "foo v3");
    }
}
