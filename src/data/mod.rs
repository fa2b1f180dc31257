/// Data layer: core types, loading, filtering and input sanitising.
///
/// Architecture:
/// ```text
///  tweets.csv        data_by_year.csv
///        │                  │
///        └───────┬──────────┘
///                ▼
///          ┌──────────┐
///          │  loader   │  fetch + parse → Dataset
///          └──────────┘
///                │
///                ▼
///          ┌──────────┐
///          │  Dataset  │  Vec<TweetRecord>, Vec<DailyCount>
///          └──────────┘
///                │
///                ▼
///          ┌──────────┐
///          │  filter   │  year / like ranges → borrowed series
///          └──────────┘
/// ```
///
/// `sanitize` sits beside the pipeline and only touches the two like inputs.

pub mod filter;
pub mod loader;
pub mod model;
pub mod sanitize;
