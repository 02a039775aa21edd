mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use imdb_client::{DetailField, DetailResolver, ResolverConfig};
use output::Section;
use ranking::Metric;
use reports::{Links, Movies, Ratings, Tags};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// MovieLens Report - descriptive statistics over the MovieLens dataset
#[derive(Parser)]
#[command(name = "movielens-report")]
#[command(about = "Ranked reports over MovieLens ratings, tags, movies and IMDb links", long_about = None)]
struct Cli {
    /// Path to the MovieLens dataset directory
    #[arg(
        short,
        long,
        env = "MOVIELENS_DATA_DIR",
        default_value = "data/ml-latest-small"
    )]
    data_dir: PathBuf,

    /// Number of entries per ranked report
    #[arg(long, global = true, default_value_t = 10)]
    limit: usize,

    /// Print reports as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rating distributions and top movies and users
    Ratings {
        /// How to summarize a group of ratings ("average" or "median")
        #[arg(long, default_value = "average")]
        metric: Metric,
    },

    /// Tag lengths, popularity and search
    Tags {
        /// Only list tags containing this word (case-insensitive)
        #[arg(long)]
        word: Option<String>,
    },

    /// Release years and genres
    Movies,

    /// Details fetched from IMDb for the movies in links.csv
    Links {
        /// Prefix of IMDb detail URLs
        #[arg(long, default_value = "https://www.imdb.com/title/")]
        base_url: String,

        /// Number of pages fetched in parallel
        #[arg(long, default_value_t = 4)]
        workers: usize,

        /// Per-request read timeout
        #[arg(long, default_value_t = 15)]
        timeout_secs: u64,

        /// Only resolve the first N links
        #[arg(long)]
        max_links: Option<usize>,

        /// Print these fields per movie instead of the rankings
        #[arg(long, value_enum, value_delimiter = ',')]
        fields: Vec<FieldArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Title,
    Director,
    Budget,
    Gross,
    Runtime,
}

impl From<FieldArg> for DetailField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Title => DetailField::Title,
            FieldArg::Director => DetailField::Director,
            FieldArg::Budget => DetailField::Budget,
            FieldArg::Gross => DetailField::Gross,
            FieldArg::Runtime => DetailField::Runtime,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Reading MovieLens dataset from {}", cli.data_dir.display());

    let start = Instant::now();
    let sections = match cli.command {
        Commands::Ratings { metric } => ratings_report(&cli.data_dir, cli.limit, metric),
        Commands::Tags { word } => tags_report(&cli.data_dir, cli.limit, word.as_deref()),
        Commands::Movies => movies_report(&cli.data_dir, cli.limit),
        Commands::Links {
            base_url,
            workers,
            timeout_secs,
            max_links,
            fields,
        } => {
            let config = ResolverConfig::default()
                .with_base_url(base_url)
                .with_workers(workers)
                .with_read_timeout(Duration::from_secs(timeout_secs));
            let fields: Vec<DetailField> = fields.into_iter().map(DetailField::from).collect();
            links_report(&cli.data_dir, cli.limit, config, max_links, &fields)
        }
    };

    output::emit(&sections, cli.json).context("Failed to write report")?;
    if !cli.json {
        eprintln!("{} Done in {:?}", "✓".green(), start.elapsed());
    }
    Ok(())
}

fn ratings_report(data_dir: &Path, limit: usize, metric: Metric) -> Vec<Section> {
    let movies = Movies::open(data_dir.join("movies.csv"));
    let ratings = Ratings::open(data_dir.join("ratings.csv")).with_titles(movies.store());

    let by_movie = ratings.movies();
    let by_user = ratings.users();
    vec![
        Section::ranked("Ratings per year", &by_movie.dist_by_year(), None),
        Section::ranked("Ratings per value", &by_movie.dist_by_rating(), None),
        Section::ranked(
            "Most rated movies",
            &by_movie.top_by_num_of_ratings(limit),
            None,
        ),
        Section::ranked(
            format!("Top movies by {} rating", metric),
            &by_movie.top_by_ratings(limit, metric),
            None,
        ),
        Section::ranked(
            "Most controversial movies",
            &by_movie.top_controversial(limit),
            None,
        ),
        Section::ranked("Most active users", &by_user.top_valuers(), Some(limit)),
        Section::ranked(
            format!("Users by {} rating", metric),
            &by_user.valuers_with_ratings(metric),
            Some(limit),
        ),
        Section::ranked(
            "Most controversial users",
            &by_user.top_controversial_valuers(limit),
            None,
        ),
    ]
}

fn tags_report(data_dir: &Path, limit: usize, word: Option<&str>) -> Vec<Section> {
    let tags = Tags::open(data_dir.join("tags.csv"));

    if let Some(word) = word {
        return vec![Section::list(
            format!("Tags containing \"{}\"", word),
            tags.tags_with(word),
        )];
    }

    vec![
        Section::ranked("Tags with the most words", &tags.most_words(limit), None),
        Section::list("Longest tags", tags.longest(limit)),
        Section::list(
            "Tags with the most words that are also the longest",
            tags.most_words_and_longest(limit),
        ),
        Section::ranked("Most popular tags", &tags.most_popular(limit), None),
    ]
}

fn movies_report(data_dir: &Path, limit: usize) -> Vec<Section> {
    let movies = Movies::open(data_dir.join("movies.csv"));
    vec![
        Section::ranked("Movies per release year", &movies.dist_by_release(), Some(limit)),
        Section::ranked("Movies per genre", &movies.dist_by_genres(), None),
        Section::ranked("Movies with the most genres", &movies.most_genres(limit), None),
    ]
}

fn links_report(
    data_dir: &Path,
    limit: usize,
    config: ResolverConfig,
    max_links: Option<usize>,
    fields: &[DetailField],
) -> Vec<Section> {
    let links = Links::open(data_dir.join("links.csv"), DetailResolver::http(config))
        .with_limit(max_links);

    if !fields.is_empty() {
        let columns = std::iter::once("movieId".to_string())
            .chain(fields.iter().map(|field| field.to_string()))
            .collect();
        return vec![Section::table("IMDb details", columns, links.get_imdb(fields))];
    }

    let report = links.report();
    vec![
        Section::ranked("Top directors", &report.top_directors(limit), None),
        Section::ranked("Most expensive", &report.most_expensive(limit), None),
        Section::ranked("Most profitable", &report.most_profitable(limit), None),
        Section::ranked("Longest (minutes)", &report.longest(limit), None),
        Section::ranked("Cost per minute", &report.top_cost_per_minute(limit), None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ratings_with_metric() {
        let cli = Cli::try_parse_from(["movielens-report", "--data-dir", "/tmp/ml", "ratings", "--metric", "Median", "--limit", "5"])
            .unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/ml"));
        assert_eq!(cli.limit, 5);
        assert!(matches!(cli.command, Commands::Ratings { metric: Metric::Median }));
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let parsed = Cli::try_parse_from(["movielens-report", "ratings", "--metric", "mode"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_links_fields() {
        let cli = Cli::try_parse_from(["movielens-report", "links", "--fields", "title,budget", "--max-links", "20"])
            .unwrap();
        match cli.command {
            Commands::Links { fields, max_links, workers, .. } => {
                let fields: Vec<DetailField> = fields.into_iter().map(DetailField::from).collect();
                assert_eq!(fields, vec![DetailField::Title, DetailField::Budget]);
                assert_eq!(max_links, Some(20));
                assert_eq!(workers, 4);
            }
            _ => panic!("expected the links command"),
        }
    }
}
