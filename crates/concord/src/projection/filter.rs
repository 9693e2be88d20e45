//! Feature search.

/// Case-insensitive substring match on a feature name. An empty query matches
/// everything.
pub fn feature_matches(feature: &str, query: &str) -> bool {
    feature.to_lowercase().contains(&query.to_lowercase())
}

/// Visibility of each feature for a search query, in input order.
pub fn filter_features<'a>(features: impl IntoIterator<Item = &'a str>, query: &str) -> Vec<bool> {
    let query = query.to_lowercase();
    features
        .into_iter()
        .map(|feature| feature.to_lowercase().contains(&query))
        .collect()
}
