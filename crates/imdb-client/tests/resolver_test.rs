//! Integration tests for batch resolution.
//!
//! Pages are served from memory by `StaticFetcher`, so no network is needed.

use data_loader::Link;
use imdb_client::{DetailResolver, ResolveError, ResolverConfig, StaticFetcher};

const BASE: &str = "http://imdb.test/title/";

fn link(movie_id: u32, imdb_id: &str) -> Link {
    Link {
        movie_id,
        imdb_id: imdb_id.to_string(),
        tmdb_id: None,
    }
}

fn page(title: &str, director: &str, budget: &str, runtime: &str) -> String {
    format!(
        r#"<html><body>
            <div class="title_wrapper"><h1>{title}&nbsp;(1995)</h1></div>
            <div class="credit_summary_item"><h4 class="inline">Director:</h4> <a>{director}</a></div>
            <div class="txt-block"><h4 class="inline">Budget:</h4>{budget}</div>
            <div class="txt-block"><h4 class="inline">Cumulative Worldwide Gross:</h4> $1,000,000</div>
            <div class="txt-block"><h4 class="inline">Runtime:</h4> <time>{runtime}</time></div>
        </body></html>"#
    )
}

fn fetcher() -> StaticFetcher {
    StaticFetcher::new()
        .with_page(
            format!("{BASE}tt0114709/"),
            page("Toy Story", "John Lasseter", "$30,000,000 (estimated)", "81 min"),
        )
        .with_page(
            format!("{BASE}tt0113497/"),
            page("Jumanji", "Joe Johnston", "n/a", "104 min"),
        )
        .with_page(
            format!("{BASE}tt0113228/"),
            page("Grumpier Old Men", "Howard Deutch", "$25,000,000", "unknown"),
        )
        .with_page(format!("{BASE}tt0000004/"), "<html><body>no title</body></html>")
}

/// Show resolver logs in test output when run with `--nocapture`
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn links() -> Vec<Link> {
    // Deliberately out of movie-id order
    vec![
        link(3, "0113228"),
        link(1, "0114709"),
        link(5, "0000005"),
        link(2, "0113497"),
        link(4, "0000004"),
    ]
}

fn resolver(workers: usize) -> DetailResolver {
    DetailResolver::new(
        fetcher(),
        ResolverConfig::default()
            .with_base_url(BASE)
            .with_workers(workers),
    )
}

#[test]
fn test_resolve_all_sorted_by_movie_id() {
    let resolution = resolver(1).resolve_all(&links());

    let ids: Vec<u32> = resolution.records.iter().map(|r| r.movie_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let toy_story = &resolution.records[0];
    assert_eq!(toy_story.title, "Toy Story");
    assert_eq!(toy_story.director, "John Lasseter");
    assert_eq!(toy_story.budget, 30_000_000);
    assert_eq!(toy_story.gross, 1_000_000);
    assert_eq!(toy_story.runtime_minutes, 81);
}

#[test]
fn test_field_failures_use_sentinels_independently() {
    let resolution = resolver(1).resolve_all(&links());

    // Unparsable budget, everything else intact
    let jumanji = &resolution.records[1];
    assert_eq!(jumanji.budget, 0);
    assert_eq!(jumanji.director, "Joe Johnston");
    assert_eq!(jumanji.gross, 1_000_000);
    assert_eq!(jumanji.runtime_minutes, 104);

    // Unparsable runtime falls back to one minute
    let grumpier = &resolution.records[2];
    assert_eq!(grumpier.runtime_minutes, 1);
    assert_eq!(grumpier.budget, 25_000_000);
}

#[test]
fn test_failures_do_not_abort_batch() {
    let resolution = resolver(1).resolve_all(&links());

    assert_eq!(resolution.failures.len(), 2);
    assert_eq!(resolution.failures[0], ResolveError::MissingTitle { movie_id: 4 });
    assert!(matches!(
        resolution.failures[1],
        ResolveError::Fetch { movie_id: 5, .. }
    ));
}

#[test]
fn test_worker_pool_matches_serial() {
    init_logging();
    let serial = resolver(1).resolve_all(&links());
    let pooled = resolver(4).resolve_all(&links());

    assert_eq!(serial.records, pooled.records);
    assert_eq!(serial.failures, pooled.failures);
}
