//! Plain-text rendering of session state.

use std::fmt::Write;

use popcorn_api::{MovieDetail, MovieSummary};
use popcorn_core::models::WatchedEntry;
use popcorn_core::watched::WatchedSummary;
use popcorn_runtime::{DetailState, SearchState};

/// Round to two decimals and drop trailing zeros ("7.75", "7", "135.5").
pub fn stat(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

pub fn num_results(results: &[MovieSummary]) -> String {
    format!("Found {} results", results.len())
}

pub fn search(state: &SearchState) -> String {
    if state.is_loading {
        return "Loading...".into();
    }
    if let Some(error) = &state.error {
        return format!("🚫 {error}");
    }

    let mut out = num_results(&state.results);
    for (i, movie) in state.results.iter().enumerate() {
        let _ = write!(
            out,
            "\n{:>3}. {} ({})  [{}]",
            i + 1,
            movie.title,
            movie.year,
            movie.imdb_id
        );
    }
    out
}

pub fn detail(movie: &MovieDetail, watched_rating: Option<u8>, pending: Option<u8>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", movie.title);
    let _ = writeln!(out, "{} • {}", movie.released, movie.runtime);
    let _ = writeln!(out, "{}", movie.genre);
    match movie.imdb_rating {
        Some(r) => {
            let _ = writeln!(out, "⭐ {r} IMDb rating");
        }
        None => {
            let _ = writeln!(out, "⭐ N/A IMDb rating");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", movie.plot);
    let _ = writeln!(out, "Starring {}", movie.actors);
    let _ = write!(out, "Directed by {}", movie.director);

    match (watched_rating, pending) {
        (Some(rating), _) => {
            let _ = write!(out, "\n\nYou rated this movie {rating} ⭐");
        }
        (None, Some(rating)) => {
            let _ = write!(out, "\n\nYour rating: {} ({rating}/10)  (:add to save)", stars(rating));
        }
        (None, None) => {}
    }
    out
}

pub fn detail_state(
    state: &DetailState,
    watched_rating: Option<u8>,
    pending: Option<u8>,
) -> String {
    match (&state.movie, state.is_loading) {
        (_, true) => "Loading...".into(),
        (Some(movie), false) => detail(movie, watched_rating, pending),
        (None, false) => match &state.imdb_id {
            Some(id) => format!("No details available for {id}"),
            None => String::new(),
        },
    }
}

pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(10));
    format!("{}{}", "★".repeat(filled), "☆".repeat(10 - filled))
}

pub fn summary(summary: &WatchedSummary) -> String {
    format!(
        "Movies you watched\n#️⃣ {} movies   ⭐️ {}   🌟 {}   ⏳ {} min",
        summary.count,
        stat(summary.avg_imdb_rating),
        stat(summary.avg_user_rating),
        stat(summary.avg_runtime),
    )
}

pub fn watched(entries: &[WatchedEntry]) -> String {
    if entries.is_empty() {
        return "Your watched list is empty".into();
    }
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let imdb = entry
            .imdb_rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".into());
        let runtime = entry
            .runtime
            .map(|r| format!("{r} min"))
            .unwrap_or_else(|| "N/A".into());
        let _ = write!(
            out,
            "{}  [{}]  ⭐️ {imdb}  🌟 {}  ⏳ {runtime}",
            entry.title, entry.imdb_id, entry.user_rating
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat() {
        assert_eq!(stat(7.75), "7.75");
        assert_eq!(stat(7.0), "7");
        assert_eq!(stat(135.5), "135.5");
        assert_eq!(stat(0.0), "0");
        assert_eq!(stat(6.666_666), "6.67");
    }

    #[test]
    fn test_search_states() {
        let loading = SearchState {
            is_loading: true,
            ..Default::default()
        };
        assert_eq!(search(&loading), "Loading...");

        let failed = SearchState {
            error: Some("movie not found".into()),
            ..Default::default()
        };
        assert_eq!(search(&failed), "🚫 movie not found");

        let found = SearchState {
            results: vec![MovieSummary {
                imdb_id: "tt0372784".into(),
                title: "Batman Begins".into(),
                year: "2005".into(),
                poster: "N/A".into(),
            }],
            ..Default::default()
        };
        let text = search(&found);
        assert!(text.starts_with("Found 1 results"));
        assert!(text.contains("1. Batman Begins (2005)  [tt0372784]"));
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆☆☆☆☆☆");
        assert_eq!(stars(10), "★★★★★★★★★★");
    }

    #[test]
    fn test_summary() {
        let text = summary(&WatchedSummary {
            count: 2,
            avg_imdb_rating: 7.75,
            avg_user_rating: 7.0,
            avg_runtime: 135.0,
        });
        assert!(text.contains("2 movies"));
        assert!(text.contains("⭐️ 7.75"));
        assert!(text.contains("🌟 7 "));
        assert!(text.contains("⏳ 135 min"));
    }

    #[test]
    fn test_empty_watched() {
        assert_eq!(watched(&[]), "Your watched list is empty");
    }
}
