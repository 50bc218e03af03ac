//! Two repositories kept in step the way the synchronization service does it
//!
//! The service asks one store for everything modified since the last run,
//! reads those files and writes them into the partner store with the
//! original timestamp. These tests drive that loop through the public API.

use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use wiki_store::timestamp::parse_utc;
use wiki_store::{Layer, RepositoryConfig, RepositoryStore};
use wiki_test_utils::TestRepository;

/// Copy every file changed after `since` from `source` to `target`.
/// Returns the number of files copied.
fn mirror(source: &RepositoryStore, target: &RepositoryStore, since: Option<DateTime<Utc>>) -> usize {
    let mut copied = 0;
    for record in source.files_modified_after(since) {
        if source.is_excluded_from_sync(record.path()) {
            continue;
        }
        let content = source.read_binary(record.path()).unwrap();
        target
            .write_binary(record.path(), &content, record.timestamp(), Layer::Base)
            .unwrap();
        copied += 1;
    }
    copied
}

fn open(repo: &TestRepository, excluded: &[&str]) -> RepositoryStore {
    let config = RepositoryConfig::new(repo.base_root()).with_excluded(excluded.iter().copied());
    RepositoryStore::open(config).unwrap()
}

#[test]
fn mirrored_files_keep_origin_timestamps() {
    let server_repo = TestRepository::new();
    let client_repo = TestRepository::new();
    let server = open(&server_repo, &[]);
    let client = open(&client_repo, &[]);

    let stamp = parse_utc("2020-01-20T21:39:58.804Z").unwrap();
    server.write_binary("/wiki/Index.txt", b"index", Some(stamp), Layer::Base).unwrap();
    server.write_text("/wiki/Fragen?.txt", "why", Layer::Base).unwrap();

    assert_eq!(mirror(&server, &client, None), 2);

    let mirrored = client.get_file("/wiki/Index.txt").unwrap();
    assert_eq!(mirrored.timestamp(), Some(stamp));
    assert_eq!(client.read_text("/wiki/Fragen?.txt").unwrap(), "why");
    assert_eq!(
        client.get_file("/wiki/Fragen?.txt").unwrap().timestamp(),
        server.get_file("/wiki/Fragen?.txt").unwrap().timestamp()
    );

    // The timestamps also survive a rescan of the client
    client.rebuild_cache().unwrap();
    assert_eq!(client.get_file("/wiki/Index.txt").unwrap().timestamp(), Some(stamp));
}

#[test]
fn incremental_mirror_only_copies_newer_files() {
    let server_repo = TestRepository::new();
    let client_repo = TestRepository::new();
    let server = open(&server_repo, &[]);
    let client = open(&client_repo, &[]);

    let old = parse_utc("2019-11-01T10:00:00.000Z").unwrap();
    let checkpoint = parse_utc("2020-01-01T00:00:00.000Z").unwrap();
    server.write_binary("/old.txt", b"old", Some(old), Layer::Base).unwrap();
    server.write_text("/new.txt", "new", Layer::Base).unwrap();

    assert_eq!(mirror(&server, &client, Some(checkpoint)), 1);
    assert!(client.get_file("/old.txt").is_none());
    assert!(client.get_file("/new.txt").is_some());
}

#[test]
fn excluded_paths_stay_local() {
    let server_repo = TestRepository::new();
    let client_repo = TestRepository::new();
    let server = open(&server_repo, &["/config/local.txt"]);
    let client = open(&client_repo, &[]);

    server.write_text("/config/local.txt", "server only", Layer::Base).unwrap();
    server.write_text("/wiki/page.txt", "shared", Layer::Base).unwrap();

    assert_eq!(mirror(&server, &client, None), 1);
    assert!(client.get_file("/config/local.txt").is_none());
    client_repo.assert_base_file_missing("config/local.txt");
}
