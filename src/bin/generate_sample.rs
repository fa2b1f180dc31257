//! Writes a synthetic `tweets.csv` and `data_by_year.csv` so the dashboard
//! can run offline:
//!
//! ```text
//! cargo run --bin generate_sample -- sample
//! cargo run -- --tweets sample/tweets.csv --daily sample/data_by_year.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

const PHRASES: &[&str] = &[
    "the horizon is always flat",
    "why does water never curve",
    "ice wall confirmed",
    "NASA photos are CGI",
    "ships disappear bottom first, explain that",
    "research flat earth",
    "gravity is just density",
    "the globe model is a lie",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }

    /// Pareto-like heavy tail: most tweets get a handful of likes, a few
    /// get thousands.
    fn likes(&mut self) -> i64 {
        let u = self.next_f64().max(1e-9);
        ((1.0 / u.powf(0.9)) - 1.0).min(60_000.0) as i64
    }
}

/// Average tweets per day for a year; interest peaks around 2017-2018.
fn daily_rate(year: i32) -> f64 {
    let peak = 2017.5;
    let d = (year as f64 - peak) / 2.5;
    0.5 + 6.0 * (-d * d).exp()
}

fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".into()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let tweets_path = out_dir.join("tweets.csv");
    let daily_path = out_dir.join("data_by_year.csv");
    let mut tweets = csv::Writer::from_path(&tweets_path)?;
    let mut daily = csv::Writer::from_path(&daily_path)?;
    tweets.write_record(["id", "date", "n_like", "content"])?;
    daily.write_record(["datetime", "year", "month", "count"])?;

    let mut rng = SimpleRng::new(42);
    let mut next_id: u64 = 1_000_000_000_000_000_000;
    let mut n_tweets = 0usize;
    let mut n_days = 0usize;

    let start = NaiveDate::from_ymd_opt(2010, 1, 1).context("start date")?;
    let end = NaiveDate::from_ymd_opt(2022, 12, 31).context("end date")?;

    for day in start.iter_days().take_while(|d| *d <= end) {
        let rate = daily_rate(day.year());
        let count = (rate * 2.0 * rng.next_f64()).round() as u64;
        if count == 0 {
            continue;
        }

        for _ in 0..count {
            let secs = rng.below(86_400);
            let stamp = format!(
                "{day} {:02}:{:02}:{:02}+00:00",
                secs / 3600,
                (secs / 60) % 60,
                secs % 60
            );
            let phrase = PHRASES[rng.below(PHRASES.len() as u64) as usize];
            next_id += 1 + rng.below(1_000_000);
            tweets.write_record([
                next_id.to_string(),
                stamp,
                rng.likes().to_string(),
                phrase.to_string(),
            ])?;
            n_tweets += 1;
        }

        daily.write_record([
            day.to_string(),
            day.year().to_string(),
            day.month().to_string(),
            count.to_string(),
        ])?;
        n_days += 1;
    }

    tweets.flush()?;
    daily.flush()?;

    println!(
        "Wrote {n_tweets} tweets to {} and {n_days} daily counts to {}",
        tweets_path.display(),
        daily_path.display()
    );
    Ok(())
}
