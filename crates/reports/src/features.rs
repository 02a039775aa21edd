//! Text features derived from records.
//!
//! Small pure functions that turn one record into the value a report ranks
//! by. They never fail: a title without a year goes into its own bucket
//! instead of being dropped.

use data_loader::{Movie, Tag};
use std::collections::HashSet;

/// Bucket for movies whose title carries no "(YYYY)"
pub const YEAR_NOT_SPECIFIED: &str = "(year not specified)";

/// Number of whitespace-separated words in a tag
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Length of a tag in characters (not bytes)
pub fn char_length(text: &str) -> usize {
    text.chars().count()
}

/// Tag texts with duplicates removed, in first-seen order
pub fn distinct_tags<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|tag| tag.text.as_str())
        .filter(|text| seen.insert(*text))
        .collect()
}

/// Number of genres listed for a movie
pub fn genre_count(movie: &Movie) -> usize {
    movie.genres.len()
}

/// Release year as text, or the "(year not specified)" bucket
pub fn release_bucket(movie: &Movie) -> String {
    match movie.year {
        Some(year) => year.to_string(),
        None => YEAR_NOT_SPECIFIED.to_string(),
    }
}

/// Calendar year of a Unix timestamp, counting every year as 365 days
///
/// This matches how rating years have always been bucketed in these reports;
/// it drifts by a day every four years.
pub fn rating_year(timestamp: i64) -> i64 {
    timestamp / 31_536_000 + 1970
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> Tag {
        Tag {
            user_id: 1,
            movie_id: 1,
            text: text.to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("dark  hero"), 2);
        assert_eq!(word_count("funny"), 1);
    }

    #[test]
    fn test_char_length_counts_chars() {
        assert_eq!(char_length("Amélie"), 6);
    }

    #[test]
    fn test_distinct_tags() {
        let tags = vec![tag("funny"), tag("dark"), tag("funny")];
        assert_eq!(distinct_tags(&tags), vec!["funny", "dark"]);
    }

    #[test]
    fn test_release_bucket() {
        let mut movie = Movie {
            id: 1,
            title: "Babylon 5".to_string(),
            year: None,
            genres: vec![],
        };
        assert_eq!(release_bucket(&movie), YEAR_NOT_SPECIFIED);
        movie.year = Some(1994);
        assert_eq!(release_bucket(&movie), "1994");
    }

    #[test]
    fn test_rating_year() {
        assert_eq!(rating_year(0), 1970);
        assert_eq!(rating_year(1_260_759_144), 2009);
    }
}
