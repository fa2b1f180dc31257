use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised timestamp '{0}'")]
pub struct TimestampError(pub String);

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a raw timestamp into its calendar date.
///
/// When the timestamp carries an offset the date is taken in that offset,
/// not converted to UTC.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, TimestampError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(s, fmt) {
            return Ok(dt.date_naive());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| TimestampError(raw.to_string()))
}

// ---------------------------------------------------------------------------
// TweetRecord – one row of the detail table
// ---------------------------------------------------------------------------

/// A single tweet with its derived calendar columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TweetRecord {
    pub id: String,
    /// Timestamp exactly as it appeared in the source.
    pub date: String,
    /// Calendar date of `date`.
    pub datetime: NaiveDate,
    /// Year of `datetime`.
    pub year: i32,
    pub n_like: i64,
    pub content: String,
}

impl TweetRecord {
    /// Build a record, deriving `datetime` and `year` from the raw `date`.
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        n_like: i64,
        content: impl Into<String>,
    ) -> Result<Self, TimestampError> {
        let date = date.into();
        let datetime = parse_calendar_date(&date)?;
        Ok(Self {
            id: id.into(),
            date,
            datetime,
            year: datetime.year(),
            n_like,
            content: content.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// DailyCount – one row of the pre-aggregated table
// ---------------------------------------------------------------------------

/// Number of tweets posted on one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCount {
    pub datetime: NaiveDate,
    pub year: i32,
    /// Month as supplied by the source (number or label).
    pub month: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Build a range; the bounds are swapped if given out of order.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// Inclusive range of like counts. A range with `min > max` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeRange {
    pub min: i64,
    pub max: i64,
}

impl LikeRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, n_like: i64) -> bool {
        self.min <= n_like && n_like <= self.max
    }
}

// ---------------------------------------------------------------------------
// Dataset – both tables, immutable after load
// ---------------------------------------------------------------------------

/// The two source tables. Built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Per-tweet detail rows, in source order.
    pub tweets: Vec<TweetRecord>,
    /// Per-day counts, in source order.
    pub daily: Vec<DailyCount>,
}

impl Dataset {
    pub fn new(tweets: Vec<TweetRecord>, daily: Vec<DailyCount>) -> Self {
        Self { tweets, daily }
    }

    /// Smallest and largest year in the tweet table, or in the daily table
    /// when there are no tweets.
    pub fn year_bounds(&self) -> Option<YearRange> {
        let years = self.tweets.iter().map(|t| t.year);
        let (min, max) = if self.tweets.is_empty() {
            min_max(self.daily.iter().map(|d| d.year))?
        } else {
            min_max(years)?
        };
        Some(YearRange { min, max })
    }

    /// Distinct years present in the tweet table, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.tweets
            .iter()
            .map(|t| t.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Smallest and largest like count over all tweets.
    pub fn like_bounds(&self) -> Option<LikeRange> {
        let (min, max) = min_max(self.tweets.iter().map(|t| t.n_like))?;
        Some(LikeRange { min, max })
    }

    /// Largest like count over all tweets (0 for an empty table).
    pub fn max_likes(&self) -> i64 {
        self.like_bounds().map(|r| r.max).unwrap_or(0)
    }
}

fn min_max<T: Ord + Copy>(mut values: impl Iterator<Item = T>) -> Option<(T, T)> {
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}
