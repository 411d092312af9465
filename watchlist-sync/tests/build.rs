mod common;

use std::fs;
use std::path::Path;

use common::*;
use tempfile::TempDir;
use watchlist_catalog::{HEADER, read_cache};
use watchlist_sync::*;

fn config(dir: &Path, mode: SyncMode) -> WatchlistConfig {
    WatchlistConfig {
        mode,
        cache_path: dir.join("alice.csv"),
        base_url: BASE.to_string(),
        ..WatchlistConfig::for_user("alice")
    }
}

fn cache_line(title: &str, slug: &str, id: &str, imdb: &str) -> String {
    format!("{title};{};{id};{imdb}", film_url(slug))
}

fn write_lines(path: &Path, lines: &[String]) {
    let mut text = format!("{HEADER}\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

#[tokio::test]
async fn refresh_reuses_cache_and_fetches_only_new_items() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path(), SyncMode::Refresh);
    write_lines(&cfg.cache_path, &[cache_line("Heat", "heat", "42", "tt0113277")]);

    let fetcher = MockFetcher::new()
        .with_watchlist("alice", &[("42", "heat"), ("99", "pulp-fiction")])
        .with_film("pulp-fiction", "99", "Pulp Fiction", "tt0110912");

    let outcome = build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap();

    assert_eq!(outcome.dataset.len(), 2);
    assert_eq!(outcome.dataset.get("tt0113277").unwrap().title, "Heat");
    assert_eq!(outcome.dataset.get("tt0110912").unwrap().title, "Pulp Fiction");
    // One listing page plus two detail fetches for the new film.
    assert_eq!(fetcher.request_count(), 3);
    assert_eq!(fetcher.requests_for(&film_url("pulp-fiction")), 2);
    assert_eq!(fetcher.requests_for(&film_url("heat")), 0);

    let stats = outcome.reconcile.unwrap();
    assert_eq!((stats.kept, stats.fetched, stats.dropped), (1, 1, 0));
    assert_eq!(outcome.persisted, 2);

    let rows = read_cache(&cfg.cache_path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].title, "Pulp Fiction");
    assert_eq!(rows[1].local_id.as_deref(), Some("99"));
    assert_eq!(rows[1].global_id.as_deref(), Some("tt0110912"));
}

#[tokio::test]
async fn refresh_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path(), SyncMode::Refresh);
    write_lines(&cfg.cache_path, &[]);

    let fetcher = MockFetcher::new()
        .with_watchlist("alice", &[("1", "a"), ("2", "b")])
        .with_film("a", "1", "A", "tt0000001")
        .with_film("b", "2", "B", "tt0000002");

    build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap();
    let first = fs::read_to_string(&cfg.cache_path).unwrap();
    let before = fetcher.request_count();

    let outcome = build_dataset(&fetcher, &cfg, &LogProgress).await.unwrap();
    let second = fs::read_to_string(&cfg.cache_path).unwrap();

    assert_eq!(first, second);
    // Second run only reads the listing.
    assert_eq!(fetcher.request_count() - before, 1);
    assert_eq!(outcome.reconcile.unwrap().fetched, 0);
}

#[tokio::test]
async fn refresh_drops_removed_and_adds_new_in_listing_order() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path(), SyncMode::Refresh);
    write_lines(
        &cfg.cache_path,
        &[
            cache_line("Gone", "gone", "7", "tt0000007"),
            cache_line("Kept", "kept", "8", "tt0000008"),
        ],
    );

    let fetcher = MockFetcher::new()
        .with_watchlist("alice", &[("9", "new"), ("8", "kept")])
        .with_film("new", "9", "New", "tt0000009");

    let outcome = build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap();

    let keys: Vec<&str> = outcome.dataset.iter().map(|r| r.global_id.as_str()).collect();
    assert_eq!(keys, vec!["tt0000009", "tt0000008"]);
    assert!(!outcome.dataset.contains("tt0000007"));
    assert_eq!(outcome.reconcile.unwrap().dropped, 1);
}

#[tokio::test]
async fn refresh_walks_every_listing_page() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path(), SyncMode::Refresh);

    let ids: Vec<String> = (1..=30).map(|i| i.to_string()).collect();
    let slugs: Vec<String> = (1..=30).map(|i| format!("film-{i}")).collect();
    let films: Vec<(&str, &str)> = ids
        .iter()
        .zip(&slugs)
        .map(|(id, slug)| (id.as_str(), slug.as_str()))
        .collect();
    let lines: Vec<String> = films
        .iter()
        .map(|(id, slug)| cache_line(slug, slug, id, &format!("tt{id:0>7}")))
        .collect();
    write_lines(&cfg.cache_path, &lines);

    let fetcher = MockFetcher::new().with_watchlist("alice", &films);
    let outcome = build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap();

    assert_eq!(outcome.dataset.len(), 30);
    assert_eq!(
        fetcher.requests(),
        vec![page_url("alice", 1), page_url("alice", 2)]
    );
}

#[tokio::test]
async fn refresh_with_unreachable_listing_keeps_cache() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path(), SyncMode::Refresh);
    write_lines(
        &cfg.cache_path,
        &[
            cache_line("Heat", "heat", "42", "tt0113277"),
            cache_line("Alien", "alien", "43", "tt0078748"),
        ],
    );
    let before = fs::read_to_string(&cfg.cache_path).unwrap();

    let fetcher = MockFetcher::new();
    let outcome = build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap();

    assert!(outcome.listing_failed);
    assert!(outcome.reconcile.is_none());
    assert_eq!(outcome.dataset.len(), 2);
    assert_eq!(fs::read_to_string(&cfg.cache_path).unwrap(), before);
}

#[tokio::test]
async fn cache_only_with_complete_file_makes_no_requests() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path(), SyncMode::CacheOnly);
    write_lines(
        &cfg.cache_path,
        &[
            cache_line("Heat", "heat", "42", "tt0113277"),
            cache_line("Alien", "alien", "43", "tt0078748"),
        ],
    );

    let fetcher = MockFetcher::new();
    let outcome = build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap();

    assert_eq!(fetcher.request_count(), 0);
    assert_eq!(outcome.dataset.len(), 2);
    assert!(outcome.reconcile.is_none());
    let alien = outcome.dataset.get("tt0078748").unwrap();
    assert_eq!(alien.media_type, watchlist_catalog::MediaType::Movie);
    assert_eq!(alien.local_id, "43");
}

#[tokio::test]
async fn cache_only_resolves_absent_columns_from_export() {
    let tmp = TempDir::new().unwrap();
    let cfg = config(tmp.path(), SyncMode::CacheOnly);
    fs::write(
        &cfg.cache_path,
        format!(
            "Date,Name,Year,Letterboxd URI\n2024-01-02,Heat,1995,{}\n",
            film_url("heat")
        ),
    )
    .unwrap();

    let fetcher = MockFetcher::new().with_film("heat", "51568", "Heat", "tt0113277");
    let outcome = build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap();

    let heat = outcome.dataset.get("tt0113277").unwrap();
    assert_eq!(heat.local_id, "51568");
    assert_eq!(heat.title, "Heat");
    assert_eq!(fetcher.requests_for(&film_url("heat")), 1);

    // Written back in the cache format with all four columns.
    let text = fs::read_to_string(&cfg.cache_path).unwrap();
    assert!(text.starts_with(HEADER));
    assert!(read_cache(&cfg.cache_path).unwrap()[0].is_complete());
}

#[tokio::test]
async fn missing_cache_file_is_an_error_in_both_modes() {
    let tmp = TempDir::new().unwrap();
    for mode in [SyncMode::Refresh, SyncMode::CacheOnly] {
        let cfg = config(tmp.path(), mode);
        let fetcher = MockFetcher::new().with_watchlist("alice", &[("1", "a")]);
        let err = build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap_err();
        assert!(matches!(err, SyncError::CacheNotFound(_)));
        assert_eq!(fetcher.request_count(), 0);
    }
}

#[tokio::test]
async fn unresolved_records_are_excluded_unless_kept() {
    let tmp = TempDir::new().unwrap();
    let mut cfg = config(tmp.path(), SyncMode::Refresh);
    write_lines(&cfg.cache_path, &[]);

    let fetcher = MockFetcher::new()
        .with_watchlist("alice", &[("1", "short"), ("2", "known")])
        .with_film("short", "1", "A Short", "")
        .with_film("known", "2", "Known", "tt0000002");

    let outcome = build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap();
    assert_eq!(outcome.dataset.len(), 1);
    assert_eq!(outcome.unresolved.len(), 1);
    assert_eq!(outcome.unresolved[0].title, "A Short");
    assert_eq!(outcome.reconcile.unwrap().unresolved, 1);
    // Still persisted so the next run does not fetch it again.
    assert_eq!(outcome.persisted, 2);

    cfg.keep_unresolved = true;
    let outcome = build_dataset(&fetcher, &cfg, &SilentProgress).await.unwrap();
    assert_eq!(outcome.dataset.len(), 2);
    assert_eq!(outcome.dataset.get("").unwrap().title, "A Short");
}
