//! Chart specifications built from the filtered series.
//!
//! A [`ChartSpec`] is toolkit-neutral: the UI layer decides how to draw it.
//! [`update_charts`] is the handler the UI calls whenever the year slider or
//! either like input changes.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::data::filter::{daily_series, detail_series};
use crate::data::model::{DailyCount, Dataset, LikeRange, TweetRecord, YearRange};

pub const TITLE_FONT_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Area,
}

/// Which of the two dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    Daily,
    Detail,
}

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartId::Daily => write!(f, "daily"),
            ChartId::Detail => write!(f, "detail"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no data in range for the {chart} chart")]
    NoData { chart: ChartId },
}

/// A column that appears in the hover annotation, or is explicitly hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverField {
    pub name: &'static str,
    pub shown: bool,
}

/// One plotted point with its hover annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// Bold header line of the hover annotation.
    pub hover_name: String,
    /// Values of the shown hover fields, same order as `ChartSpec::hover_fields`.
    pub hover_values: Vec<(&'static str, String)>,
}

impl ChartPoint {
    pub fn hover_text(&self) -> String {
        let mut text = self.hover_name.clone();
        for (name, value) in &self.hover_values {
            text.push('\n');
            text.push_str(name);
            text.push('=');
            text.push_str(value);
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub kind: ChartKind,
    pub title: String,
    pub x_field: &'static str,
    pub y_field: &'static str,
    pub hover_name: &'static str,
    pub hover_fields: Vec<HoverField>,
    pub points: Vec<ChartPoint>,
}

impl ChartSpec {
    /// Point closest to a cursor position, `x` in days since the Unix epoch.
    /// Ties on the x axis (several tweets on one day) are broken by `y`.
    pub fn nearest_point(&self, x: f64, y: f64) -> Option<&ChartPoint> {
        self.points.iter().min_by(|a, b| {
            let da = ((date_to_x(a.date) - x).abs(), (a.value - y).abs());
            let db = ((date_to_x(b.date) - x).abs(), (b.value - y).abs());
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

/// Days since 1970-01-01, the x coordinate used when plotting.
pub fn date_to_x(date: NaiveDate) -> f64 {
    (date - NaiveDate::default()).num_days() as f64
}

/// Inverse of [`date_to_x`], rounding to the nearest day.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    NaiveDate::default().checked_add_signed(chrono::Duration::try_days(x.round() as i64)?)
}

// ---------------------------------------------------------------------------
// The two charts
// ---------------------------------------------------------------------------

/// Area chart of tweets per day.
pub fn daily_chart(rows: &[&DailyCount]) -> Result<ChartSpec, RenderError> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Err(RenderError::NoData { chart: ChartId::Daily });
    };
    let title = format!(
        "Number of Flat Earth tweets between {} and {}",
        first.datetime, last.datetime
    );

    let points = rows
        .iter()
        .map(|d| ChartPoint {
            date: d.datetime,
            value: d.count as f64,
            hover_name: d.datetime.to_string(),
            hover_values: vec![("count", d.count.to_string()), ("month", d.month.clone())],
        })
        .collect();

    Ok(ChartSpec {
        id: ChartId::Daily,
        kind: ChartKind::Area,
        title,
        x_field: "datetime",
        y_field: "count",
        hover_name: "datetime",
        hover_fields: vec![
            HoverField { name: "count", shown: true },
            HoverField { name: "month", shown: true },
            HoverField { name: "datetime", shown: false },
        ],
        points,
    })
}

/// Area chart of like counts per tweet.
///
/// The title names the last date before the first one. That ordering is
/// what the dashboard has always shown and is kept as is.
pub fn detail_chart(rows: &[&TweetRecord]) -> Result<ChartSpec, RenderError> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Err(RenderError::NoData { chart: ChartId::Detail });
    };
    let min_likes = rows.iter().map(|t| t.n_like).min().unwrap_or_default();
    let max_likes = rows.iter().map(|t| t.n_like).max().unwrap_or_default();
    let title = format!(
        "Flat Earth tweets between {} and {} - Threshold of {} and {} likes",
        last.datetime, first.datetime, min_likes, max_likes
    );

    let points = rows
        .iter()
        .map(|t| ChartPoint {
            date: t.datetime,
            value: t.n_like as f64,
            hover_name: t.date.clone(),
            hover_values: vec![("n_like", t.n_like.to_string()), ("content", t.content.clone())],
        })
        .collect();

    Ok(ChartSpec {
        id: ChartId::Detail,
        kind: ChartKind::Area,
        title,
        x_field: "datetime",
        y_field: "n_like",
        hover_name: "date",
        hover_fields: vec![
            HoverField { name: "n_like", shown: true },
            HoverField { name: "date", shown: false },
            HoverField { name: "content", shown: true },
            HoverField { name: "id", shown: false },
            HoverField { name: "datetime", shown: false },
        ],
        points,
    })
}

// ---------------------------------------------------------------------------
// Dashboard update handler
// ---------------------------------------------------------------------------

/// Everything the charts depend on. An empty like bound falls back to the
/// dataset-wide minimum or maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardInputs {
    pub years: YearRange,
    pub like_min: Option<i64>,
    pub like_max: Option<i64>,
}

impl DashboardInputs {
    /// The like range to filter on, with empty sides filled from `dataset`.
    /// `None` when the dataset has no tweets to take bounds from.
    pub fn like_range(&self, dataset: &Dataset) -> Option<LikeRange> {
        let all = dataset.like_bounds()?;
        Some(LikeRange::new(
            self.like_min.unwrap_or(all.min),
            self.like_max.unwrap_or(all.max),
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCharts {
    pub daily: Result<ChartSpec, RenderError>,
    pub detail: Result<ChartSpec, RenderError>,
}

impl DashboardCharts {
    /// Both outcomes as JSON; an empty chart becomes `{"error": "..."}`.
    pub fn to_json(&self) -> serde_json::Value {
        fn outcome(chart: &Result<ChartSpec, RenderError>) -> serde_json::Value {
            match chart {
                Ok(spec) => serde_json::to_value(spec)
                    .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() })),
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            }
        }
        serde_json::json!({
            "daily": outcome(&self.daily),
            "detail": outcome(&self.detail),
        })
    }
}

/// Filter both tables for `inputs` and build both charts.
pub fn update_charts(dataset: &Dataset, inputs: &DashboardInputs) -> DashboardCharts {
    let daily = daily_series(dataset, inputs.years);
    let likes = inputs.like_range(dataset);
    let detail = detail_series(dataset, inputs.years, likes);
    log::debug!(
        "Refreshing charts for {:?}, likes {:?}: {} days, {} tweets",
        inputs.years,
        likes,
        daily.len(),
        detail.len()
    );

    DashboardCharts {
        daily: daily_chart(&daily),
        detail: detail_chart(&detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{day, tweet};

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                tweet("1", "2015-02-01 09:00:00+00:00", 40),
                tweet("2", "2015-02-01 18:00:00+00:00", 7),
                tweet("3", "2016-08-12 11:00:00+00:00", 300),
                tweet("4", "2019-01-01 00:00:00+00:00", 5),
            ],
            vec![
                day("2014-12-31", 2),
                day("2015-02-01", 2),
                day("2016-08-12", 1),
                day("2019-01-01", 1),
            ],
        )
    }

    #[test]
    fn daily_title_names_first_then_last_date() {
        let ds = dataset();
        let rows = daily_series(&ds, YearRange::new(2015, 2017));
        let spec = daily_chart(&rows).unwrap();
        assert_eq!(
            spec.title,
            "Number of Flat Earth tweets between 2015-02-01 and 2016-08-12"
        );
        assert_eq!(spec.kind, ChartKind::Area);
        assert_eq!((spec.x_field, spec.y_field), ("datetime", "count"));
        assert_eq!(spec.points.len(), 2);
    }

    #[test]
    fn detail_title_names_last_then_first_date_and_observed_likes() {
        let ds = dataset();
        let rows = detail_series(&ds, YearRange::new(2015, 2017), Some(LikeRange::new(0, 25000)));
        let spec = detail_chart(&rows).unwrap();
        assert_eq!(
            spec.title,
            "Flat Earth tweets between 2016-08-12 and 2015-02-01 - Threshold of 7 and 300 likes"
        );
        assert_eq!((spec.x_field, spec.y_field), ("datetime", "n_like"));
    }

    #[test]
    fn hover_fields_match_each_chart() {
        let ds = dataset();
        let inputs = DashboardInputs {
            years: YearRange::new(2015, 2017),
            like_min: Some(0),
            like_max: Some(25000),
        };
        let charts = update_charts(&ds, &inputs);

        let daily = charts.daily.unwrap();
        let shown: Vec<_> = daily.hover_fields.iter().filter(|h| h.shown).map(|h| h.name).collect();
        let hidden: Vec<_> = daily.hover_fields.iter().filter(|h| !h.shown).map(|h| h.name).collect();
        assert_eq!(shown, ["count", "month"]);
        assert_eq!(hidden, ["datetime"]);
        assert_eq!(daily.hover_name, "datetime");

        let detail = charts.detail.unwrap();
        let shown: Vec<_> = detail.hover_fields.iter().filter(|h| h.shown).map(|h| h.name).collect();
        let hidden: Vec<_> = detail.hover_fields.iter().filter(|h| !h.shown).map(|h| h.name).collect();
        assert_eq!(shown, ["n_like", "content"]);
        assert_eq!(hidden, ["date", "id", "datetime"]);
        assert_eq!(detail.hover_name, "date");

        assert_eq!(
            detail.points[0].hover_text(),
            "2015-02-01 09:00:00+00:00\nn_like=40\ncontent=tweet 1"
        );
    }

    #[test]
    fn empty_ranges_signal_no_data() {
        let ds = dataset();
        let inputs = DashboardInputs {
            years: YearRange::new(1990, 1991),
            like_min: Some(0),
            like_max: Some(25000),
        };
        let charts = update_charts(&ds, &inputs);
        assert_eq!(charts.daily, Err(RenderError::NoData { chart: ChartId::Daily }));
        assert_eq!(charts.detail, Err(RenderError::NoData { chart: ChartId::Detail }));
    }

    #[test]
    fn like_filter_can_empty_only_the_detail_chart() {
        let ds = dataset();
        let inputs = DashboardInputs {
            years: YearRange::new(2015, 2017),
            like_min: Some(1000),
            like_max: Some(2000),
        };
        let charts = update_charts(&ds, &inputs);
        assert!(charts.daily.is_ok());
        let err = charts.detail.unwrap_err();
        assert_eq!(err.to_string(), "no data in range for the detail chart");
    }

    #[test]
    fn empty_like_bounds_use_dataset_bounds() {
        let ds = dataset();
        let inputs = DashboardInputs {
            years: YearRange::new(2015, 2019),
            like_min: Some(6),
            like_max: None,
        };
        assert_eq!(inputs.like_range(&ds), Some(LikeRange::new(6, 300)));

        let detail = update_charts(&ds, &inputs).detail.unwrap();
        let likes: Vec<_> = detail.points.iter().map(|p| p.value).collect();
        assert_eq!(likes, [40.0, 7.0, 300.0]);

        let open = DashboardInputs { like_min: None, ..inputs };
        assert_eq!(open.like_range(&ds), Some(LikeRange::new(5, 300)));
        assert_eq!(open.like_range(&Dataset::default()), None);
    }

    #[test]
    fn nearest_point_breaks_same_day_ties_by_value() {
        let ds = dataset();
        let rows = detail_series(&ds, YearRange::new(2015, 2015), None);
        let spec = detail_chart(&rows).unwrap();
        let x = date_to_x(NaiveDate::from_ymd_opt(2015, 2, 1).unwrap());

        assert_eq!(spec.nearest_point(x, 35.0).unwrap().value, 40.0);
        assert_eq!(spec.nearest_point(x + 0.3, 8.0).unwrap().value, 7.0);
    }

    #[test]
    fn x_coordinate_round_trips_dates() {
        let d = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
        assert_eq!(x_to_date(date_to_x(d)), Some(d));
        assert_eq!(date_to_x(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1.0);
        assert_eq!(x_to_date(f64::NAN), None);
    }

    #[test]
    fn charts_export_as_json() {
        let ds = dataset();
        let inputs = DashboardInputs {
            years: YearRange::new(2016, 2016),
            like_min: Some(1000),
            like_max: Some(2000),
        };
        let json = update_charts(&ds, &inputs).to_json();
        assert_eq!(json["daily"]["kind"], "area");
        assert_eq!(json["daily"]["points"][0]["date"], "2016-08-12");
        assert_eq!(json["daily"]["points"][0]["hover_values"][0][0], "count");
        assert_eq!(json["detail"]["error"], "no data in range for the detail chart");
    }
}
