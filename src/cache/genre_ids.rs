//! Text form of a movie's genre ids as kept in `movies.genre_ids_csv`.

/// Joins ids with `,`; an empty slice encodes to an empty string.
pub fn encode(ids: &[i32]) -> String {
    ids.iter().map(i32::to_string).collect::<Vec<_>>().join(",")
}

/// Inverse of [`encode`]. Fragments that are not integers are skipped.
pub fn decode(csv: &str) -> Vec<i32> {
    if csv.trim().is_empty() {
        return Vec::new();
    }

    csv.split(',').filter_map(|part| part.trim().parse().ok()).collect()
}
