//! A repository across restarts, external edits and a shadow layer

use pretty_assertions::assert_eq;
use wiki_fs::PathCodec;
use wiki_store::{Layer, RepositoryConfig, RepositoryStore};
use wiki_test_utils::TestRepository;
use wiki_test_utils::fixtures::{copy_fixture, copy_fixture_into};

#[test]
fn restart_after_external_changes() {
    let repo = TestRepository::new();
    {
        let store = RepositoryStore::open(RepositoryConfig::new(repo.base_root())).unwrap();
        store.write_text("/a.txt", "a", Layer::Base).unwrap();
        store.write_text("/b.txt", "b", Layer::Base).unwrap();
    }

    // Edited while the wiki was down
    std::fs::remove_file(repo.base_root().join("b.txt")).unwrap();
    repo.write_base("c.txt", "c");

    let store = RepositoryStore::open(RepositoryConfig::new(repo.base_root())).unwrap();
    // The cache file is trusted at startup
    assert!(store.get_file("/b.txt").is_some());
    assert!(store.get_file("/c.txt").is_none());

    // Reads repair the difference
    assert!(store.read_text("/b.txt").unwrap_err().is_not_found());
    assert_eq!(store.read_text("/c.txt").unwrap(), "c");

    let mut paths: Vec<String> = store.list_files().into_iter().map(|r| r.path().to_string()).collect();
    paths.sort();
    assert_eq!(paths, vec!["/a.txt", "/c.txt"]);
}

#[test]
fn user_edit_overrides_bundled_file() {
    let (temp, base) = copy_fixture("without-cache");
    let shadow = copy_fixture_into("shadow", temp.path());
    let store = RepositoryStore::open(RepositoryConfig::new(&base).with_shadow(&shadow)).unwrap();

    assert_eq!(store.read_text("/file-only-in-shadow.txt").unwrap(), "file-only-in-shadow");

    // Saving a bundled page puts the edited copy into the base repository
    store.write_text("/file-only-in-shadow.txt", "edited", Layer::Base).unwrap();
    assert_eq!(store.read_text("/file-only-in-shadow.txt").unwrap(), "edited");
    assert_eq!(
        std::fs::read_to_string(shadow.join("file-only-in-shadow.txt")).unwrap(),
        "file-only-in-shadow"
    );
    assert_eq!(store.list_files().len(), 3);
}

#[test]
fn physical_names_match_codec() {
    let repo = TestRepository::new();
    let store = RepositoryStore::open(RepositoryConfig::new(repo.base_root())).unwrap();

    store.write_text("/Fragen/Wie geht's: gut?.txt", "x", Layer::Base).unwrap();

    let codec = PathCodec::new(store.base_root());
    let physical = codec.encode("/Fragen/Wie geht's: gut?.txt");
    assert!(physical.is_file());
    assert_eq!(
        physical.file_name().unwrap().to_string_lossy(),
        "Wie geht's%003a gut%003f.txt"
    );
    assert_eq!(codec.decode(&physical).unwrap(), "/Fragen/Wie geht's: gut?.txt");
}
