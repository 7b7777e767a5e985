use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::record::Genre;

/// Fixed catalogue mapping each genre to its recommended titles
///
/// Four titles per genre, in a fixed order. There is no ranking, learning or
/// personalization behind this table.
lazy_static! {
    static ref CATALOG: HashMap<&'static str, Vec<&'static str>> = {
        let mut m = HashMap::new();
        m.insert(
            Genre::SciFi.as_str(),
            vec!["Inception", "The Matrix", "Interstellar", "Blade Runner 2049"],
        );
        m.insert(
            Genre::Animation.as_str(),
            vec!["Toy Story", "The Lion King", "Spirited Away", "Up"],
        );
        m.insert(
            Genre::Action.as_str(),
            vec!["Mad Max: Fury Road", "Die Hard", "Gladiator", "John Wick"],
        );
        m.insert(
            Genre::Comedy.as_str(),
            vec!["The Grand Budapest Hotel", "Groundhog Day", "Superbad", "Paddington 2"],
        );
        m
    };
}

/// Look up the recommended titles for a genre
///
/// Pure and total: every genre in the fixed set returns its fixed non-empty
/// list, any other input returns an empty list, never an error.
///
/// # Arguments
/// * `genre` - Genre display name, e.g. "Sci-Fi"
///
/// # Returns
/// * `&'static [&'static str]` - The titles for that genre, or empty
///
/// # Examples
/// ```
/// use moviepoll::recommend::recommend;
///
/// assert_eq!(recommend("Sci-Fi").len(), 4);
/// assert!(recommend("Horror").is_empty());
/// ```
pub fn recommend(genre: &str) -> &'static [&'static str] {
    match CATALOG.get(genre) {
        Some(titles) => titles,
        None => &[],
    }
}
