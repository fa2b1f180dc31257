use super::model::{DailyCount, Dataset, LikeRange, TweetRecord, YearRange};

// ---------------------------------------------------------------------------
// Filter-aggregate pipeline
// ---------------------------------------------------------------------------
//
// Both functions borrow from the immutable dataset and keep source order.

/// Daily counts whose year lies inside `years` (inclusive).
pub fn daily_series(dataset: &Dataset, years: YearRange) -> Vec<&DailyCount> {
    dataset
        .daily
        .iter()
        .filter(|d| years.contains(d.year))
        .collect()
}

/// Tweets whose year lies inside `years` and whose like count lies inside
/// `likes`. `None` means the dataset-wide like bounds.
pub fn detail_series(
    dataset: &Dataset,
    years: YearRange,
    likes: Option<LikeRange>,
) -> Vec<&TweetRecord> {
    let Some(likes) = likes.or_else(|| dataset.like_bounds()) else {
        return Vec::new();
    };
    dataset
        .tweets
        .iter()
        .filter(|t| years.contains(t.year) && likes.contains(t.n_like))
        .collect()
}
