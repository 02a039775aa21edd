use data_loader::{LinkStore, MovieStore, RatingStore, TagStore};
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/ml-latest-small");

    println!("Loading MovieLens CSV files...\n");

    let start = Instant::now();
    let ratings = RatingStore::open(data_dir.join("ratings.csv"));
    let tags = TagStore::open(data_dir.join("tags.csv"));
    let movies = MovieStore::open(data_dir.join("movies.csv"));
    let links = LinkStore::open(data_dir.join("links.csv"));
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Ratings: {}", ratings.len());
    println!("Tags: {}", tags.len());
    println!("Movies: {}", movies.len());
    println!("Links: {}", links.len());
    println!("\nPerformance: {:.0} ratings/second",
             ratings.len() as f64 / elapsed.as_secs_f64());
}
