use std::io::Read;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use serde::Deserialize;

use super::model::{parse_calendar_date, DailyCount, Dataset, TweetRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Where the two tables come from: `http(s)://` URLs or local file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub tweets: String,
    pub daily: String,
}

/// Fetch and parse both tables. Any failure, including an empty table, is
/// returned as an error; the caller treats it as fatal.
pub fn load_dataset(sources: &DataSources) -> Result<Dataset> {
    let tweets_csv = fetch_source(&sources.tweets)
        .with_context(|| format!("fetching tweet table from {}", sources.tweets))?;
    let tweets = parse_tweets(tweets_csv.as_bytes())
        .with_context(|| format!("parsing tweet table from {}", sources.tweets))?;

    let daily_csv = fetch_source(&sources.daily)
        .with_context(|| format!("fetching daily table from {}", sources.daily))?;
    let daily = parse_daily(daily_csv.as_bytes())
        .with_context(|| format!("parsing daily table from {}", sources.daily))?;

    log::info!(
        "Loaded {} tweets and {} daily counts",
        tweets.len(),
        daily.len()
    );
    Ok(Dataset::new(tweets, daily))
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Read a source into memory, over HTTP for URLs and from disk otherwise.
pub fn fetch_source(source: &str) -> Result<String> {
    if is_remote(source) {
        let url = normalize_source_url(source);
        log::info!("Downloading {url}");
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        let resp = client.get(&url).send()?.error_for_status()?;
        Ok(decode_text(&resp.bytes()?))
    } else {
        log::info!("Reading {source}");
        let bytes = std::fs::read(Path::new(source)).context("reading local file")?;
        Ok(decode_text(&bytes))
    }
}

/// Both source kinds decode the same way: invalid UTF-8 sequences become
/// U+FFFD instead of failing the load.
fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Rewrite a Google Drive share link into its direct-download form.
/// Other URLs are returned unchanged.
///
/// `https://drive.google.com/file/d/<id>/view?usp=sharing`
/// becomes `https://drive.google.com/uc?id=<id>`.
pub fn normalize_source_url(url: &str) -> String {
    const SHARE_PREFIX: &str = "https://drive.google.com/file/d/";
    match url.strip_prefix(SHARE_PREFIX) {
        Some(rest) => {
            let id = rest.split(['/', '?']).next().unwrap_or_default();
            if id.is_empty() {
                url.to_string()
            } else {
                format!("https://drive.google.com/uc?id={id}")
            }
        }
        None => url.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tweet table
// ---------------------------------------------------------------------------

/// Header row must name `id`, `date`, `n_like` and `content`; other columns
/// are ignored.
#[derive(Debug, Deserialize)]
struct TweetRow {
    id: String,
    date: String,
    #[serde(default)]
    n_like: String,
    #[serde(default)]
    content: String,
}

pub fn parse_tweets<R: Read>(input: R) -> Result<Vec<TweetRecord>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut tweets = Vec::new();

    for (row_no, result) in reader.deserialize::<TweetRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let n_like = parse_like_count(&row.n_like)
            .with_context(|| format!("CSV row {row_no}: bad n_like"))?;
        let record = TweetRecord::new(row.id, row.date, n_like, row.content)
            .with_context(|| format!("CSV row {row_no}: bad date"))?;
        tweets.push(record);
    }

    if tweets.is_empty() {
        bail!("tweet table has no rows");
    }
    Ok(tweets)
}

/// Like counts arrive as integers or as integral floats (`"12.0"`).
/// An empty cell counts as zero.
fn parse_like_count(s: &str) -> Result<i64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }
    let n = match s.parse::<i64>() {
        Ok(i) => i,
        Err(_) => {
            let f: f64 = s.parse().with_context(|| format!("'{s}' is not a number"))?;
            if f.fract() != 0.0 || !f.is_finite() {
                bail!("'{s}' is not a whole number");
            }
            if f >= i64::MAX as f64 {
                bail!("'{s}' is too large for a like count");
            }
            f as i64
        }
    };
    if n < 0 {
        bail!("negative like count {n}");
    }
    Ok(n)
}

// ---------------------------------------------------------------------------
// Daily table
// ---------------------------------------------------------------------------

/// Header row must name `year`, `month`, `count` and a date column called
/// `datetime` or `date`.
#[derive(Debug, Deserialize)]
struct DailyRow {
    #[serde(alias = "date")]
    datetime: String,
    year: i32,
    month: String,
    count: u64,
}

pub fn parse_daily<R: Read>(input: R) -> Result<Vec<DailyCount>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut days = Vec::new();

    for (row_no, result) in reader.deserialize::<DailyRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let datetime = parse_calendar_date(&row.datetime)
            .with_context(|| format!("CSV row {row_no}: bad datetime"))?;
        if datetime.year() != row.year {
            log::warn!(
                "Daily row {row_no}: year column {} disagrees with date {datetime}",
                row.year
            );
        }
        days.push(DailyCount {
            datetime,
            year: row.year,
            month: row.month,
            count: row.count,
        });
    }

    if days.is_empty() {
        bail!("daily table has no rows");
    }
    Ok(days)
}
