use serde::Serialize;

use crate::record::{Genre, UserRecord};

/// Aggregate summary of all stored records, shown in the sidebar of the
/// records page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Total number of records ("Total Users" metric)
    pub total: usize,

    /// Mean age across all records, `None` when there are no records
    pub average_age: Option<f64>,

    /// Per-genre record counts, in the fixed genre order
    pub genre_counts: Vec<GenreCount>,
}

/// Record count for one genre
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: Genre,
    pub count: usize,
}

/// Compute the summary for a set of records
///
/// Genres with no records still appear with a zero count so the panel
/// renders all four rows.
pub fn summarize(records: &[UserRecord]) -> Summary {
    let total = records.len();

    let average_age = if total == 0 {
        None
    } else {
        let sum: u32 = records.iter().map(|r| r.age as u32).sum();
        Some(sum as f64 / total as f64)
    };

    let genre_counts = Genre::ALL
        .iter()
        .map(|&genre| GenreCount {
            genre,
            count: records.iter().filter(|r| r.favorite_genre == genre).count(),
        })
        .collect();

    Summary {
        total,
        average_age,
        genre_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_zero_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_age, None);
        assert_eq!(summary.genre_counts.len(), 4);
        assert!(summary.genre_counts.iter().all(|c| c.count == 0));
    }

    #[test]
    fn counts_and_average_match_input() {
        let records = vec![
            UserRecord::new("Ada", 30, Genre::SciFi),
            UserRecord::new("Grace", 40, Genre::SciFi),
            UserRecord::new("Linus", 20, Genre::Comedy),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.average_age, Some(30.0));

        let sci_fi = summary
            .genre_counts
            .iter()
            .find(|c| c.genre == Genre::SciFi)
            .unwrap();
        assert_eq!(sci_fi.count, 2);

        let animation = summary
            .genre_counts
            .iter()
            .find(|c| c.genre == Genre::Animation)
            .unwrap();
        assert_eq!(animation.count, 0);
    }

    #[test]
    fn one_more_record_raises_total_by_one() {
        let mut records = vec![UserRecord::new("Ada", 30, Genre::SciFi)];
        let before = summarize(&records).total;

        records.push(UserRecord::new("Grace", 40, Genre::Animation));
        assert_eq!(summarize(&records).total, before + 1);
    }
}
