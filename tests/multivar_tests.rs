/// Multivar tests
///
/// Pattern-based replacement and deletion across ordered value sequences,
/// driven through the backend surface.
/// Run with: cargo test --test multivar_tests
use confstore::{FileConfigBackend, Level, RepoHandle, StoreError};
use tempfile::TempDir;

fn open_backend(dir: &TempDir) -> FileConfigBackend {
    let mut config = FileConfigBackend::new();
    config
        .open(Level::from("local"), &RepoHandle::at(dir.path()))
        .unwrap();
    config
}

#[test]
fn test_set_multivar_creates_missing_key() {
    let dir = TempDir::new().unwrap();
    let mut config = open_backend(&dir);
    config.set_multivar("color.ui", None, "auto").unwrap();
    assert_eq!(config.get_all("color.ui").unwrap(), vec!["auto"]);
}

#[test]
fn test_set_multivar_replaces_every_match_in_place() {
    let dir = TempDir::new().unwrap();
    let mut config = open_backend(&dir);
    config.set_multivar("url.insteadof", None, "git://a").unwrap();
    config
        .set_multivar("url.insteadof", Some("nomatch"), "git://b")
        .unwrap();
    config
        .set_multivar("url.insteadof", Some("nomatch"), "ssh://c")
        .unwrap();
    assert_eq!(
        config.get_all("url.insteadof").unwrap(),
        vec!["git://a", "git://b", "ssh://c"]
    );

    // both git:// values replaced in position, nothing appended
    config
        .set_multivar("url.insteadof", Some("^git://"), "https://x")
        .unwrap();
    assert_eq!(
        config.get_all("url.insteadof").unwrap(),
        vec!["https://x", "https://x", "ssh://c"]
    );
}

#[test]
fn test_del_multivar_compacts_in_relative_order() {
    let dir = TempDir::new().unwrap();
    let mut config = open_backend(&dir);
    for value in ["keep-a", "drop-1", "keep-b", "drop-2"] {
        config.set_multivar("key", Some("^\\$never"), value).unwrap();
    }

    config.del_multivar("key", Some("^drop")).unwrap();
    assert_eq!(config.get_all("key").unwrap(), vec!["keep-a", "keep-b"]);
}

#[test]
fn test_del_multivar_removing_all_values_deletes_key() {
    let dir = TempDir::new().unwrap();
    let mut config = open_backend(&dir);
    config.set_multivar("key", None, "a").unwrap();
    config.set_multivar("key", Some("nomatch"), "b").unwrap();

    config.del_multivar("key", None).unwrap();
    assert!(matches!(
        config.get("key").unwrap_err(),
        StoreError::NotFound(_)
    ));
}

#[test]
fn test_del_missing_key_is_not_found() {
    let dir = TempDir::new().unwrap();
    let mut config = open_backend(&dir);
    assert!(matches!(
        config.del("absent").unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert!(matches!(
        config.del_multivar("absent", None).unwrap_err(),
        StoreError::NotFound(_)
    ));
}

#[test]
fn test_invalid_pattern_fails_before_mutation() {
    let dir = TempDir::new().unwrap();
    let mut config = open_backend(&dir);
    config.set_multivar("key", None, "original").unwrap();

    let err = config.set_multivar("key", Some("(unclosed"), "new").unwrap_err();
    assert!(matches!(err, StoreError::Pattern(_)));
    assert_eq!(config.get_all("key").unwrap(), vec!["original"]);

    let err = config.del_multivar("key", Some("(unclosed")).unwrap_err();
    assert!(matches!(err, StoreError::Pattern(_)));
    assert_eq!(config.get_all("key").unwrap(), vec!["original"]);
}

#[test]
fn test_multivar_only_first_value_visible_to_get() {
    let dir = TempDir::new().unwrap();
    let mut config = open_backend(&dir);
    config.set_multivar("key", None, "first").unwrap();
    config.set_multivar("key", Some("nomatch"), "second").unwrap();

    assert_eq!(config.get("key").unwrap().value, "first");
    assert_eq!(config.get_all("key").unwrap(), vec!["first", "second"]);
}

// The documented compatibility scenario for the reference file backend.
#[test]
fn test_reference_scenario_append_on_no_match() {
    let dir = TempDir::new().unwrap();
    let mut config = open_backend(&dir);

    config.set_multivar("color.ui", None, "auto").unwrap();
    assert_eq!(config.get_all("color.ui").unwrap(), vec!["auto"]);

    config.set_multivar("color.ui", Some("auto"), "always").unwrap();
    assert_eq!(config.get_all("color.ui").unwrap(), vec!["always"]);

    config.set_multivar("color.ui", Some("never"), "true").unwrap();
    assert_eq!(config.get_all("color.ui").unwrap(), vec!["always", "true"]);
}

#[test]
fn test_multivar_round_trips_through_backing_file() {
    let dir = TempDir::new().unwrap();
    let repo = RepoHandle::at(dir.path());
    {
        let mut config = FileConfigBackend::new();
        config.open(Level::from("local"), &repo).unwrap();
        config.set_multivar("key", None, "one").unwrap();
        config.set_multivar("key", Some("nomatch"), "two").unwrap();
        config.set_multivar("key", Some("nomatch"), "three").unwrap();
        config.del_multivar("key", Some("two")).unwrap();
    }

    let mut reopened = FileConfigBackend::new();
    reopened.open(Level::from("local"), &repo).unwrap();
    assert_eq!(reopened.get_all("key").unwrap(), vec!["one", "three"]);
}
