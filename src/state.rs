use std::sync::Arc;
use std::time::Duration;

use crate::chart::{update_charts, DashboardCharts, DashboardInputs};
use crate::config::DashboardConfig;
use crate::data::model::{Dataset, YearRange};
use crate::data::sanitize::{SanitizeJob, Sanitized};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which like input a committed edit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeBound {
    Min,
    Max,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded at startup, never mutated.
    pub dataset: Arc<Dataset>,

    /// Limits of the year slider.
    pub year_bounds: YearRange,

    /// Years shown as slider marks.
    pub year_marks: Vec<i32>,

    /// Current year selection.
    pub years: YearRange,

    /// Text currently in the like inputs (may be mid-edit).
    pub like_min_text: String,
    pub like_max_text: String,

    /// Last committed like inputs; these drive the charts. `None` is an
    /// empty input, which stands for the dataset-wide bound.
    pub like_min: Option<i64>,
    pub like_max: Option<i64>,

    /// Charts for the committed inputs (cached).
    pub charts: DashboardCharts,

    /// Last sanitised like bounds, shown beside the inputs.
    pub sanitized: Option<(i64, i64)>,

    pub page_title: String,
    pub repo_url: String,

    sanitize_delay: Duration,
    sanitize_job: Option<SanitizeJob>,
    generation: u64,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, config: &DashboardConfig) -> Self {
        let year_bounds = dataset.year_bounds().unwrap_or(YearRange::new(
            config.default_years[0],
            config.default_years[1],
        ));
        let clamp = |y: i32| y.clamp(year_bounds.min, year_bounds.max);
        let years = YearRange::new(clamp(config.default_years[0]), clamp(config.default_years[1]));
        let [like_min, like_max] = config.default_likes.map(Some);

        let inputs = DashboardInputs {
            years,
            like_min,
            like_max,
        };
        let charts = update_charts(&dataset, &inputs);

        let mut state = Self {
            year_marks: dataset.years(),
            dataset,
            year_bounds,
            years,
            like_min_text: like_text(like_min),
            like_max_text: like_text(like_max),
            like_min,
            like_max,
            charts,
            sanitized: None,
            page_title: config.title.clone(),
            repo_url: config.repo_url.clone(),
            sanitize_delay: config.sanitize_delay(),
            sanitize_job: None,
            generation: 0,
        };
        state.start_sanitize();
        state
    }

    pub fn inputs(&self) -> DashboardInputs {
        DashboardInputs {
            years: self.years,
            like_min: self.like_min,
            like_max: self.like_max,
        }
    }

    /// Recompute both charts from the current inputs.
    pub fn refresh_charts(&mut self) {
        self.charts = update_charts(&self.dataset, &self.inputs());
        if let Err(e) = &self.charts.daily {
            log::warn!("{e}");
        }
        if let Err(e) = &self.charts.detail {
            log::warn!("{e}");
        }
    }

    /// Move the year selection; the bounds are kept inside the slider limits
    /// and in order.
    pub fn set_years(&mut self, start: i32, end: i32) {
        let clamp = |y: i32| y.clamp(self.year_bounds.min, self.year_bounds.max);
        let years = YearRange::new(clamp(start), clamp(end));
        if years != self.years {
            self.years = years;
            self.refresh_charts();
        }
    }

    /// Commit the text of one like input. Empty text clears the bound;
    /// text that is not a whole number is rejected and the input reverts to
    /// its last committed value.
    pub fn commit_like(&mut self, bound: LikeBound) {
        let (text, committed) = match bound {
            LikeBound::Min => (&mut self.like_min_text, &mut self.like_min),
            LikeBound::Max => (&mut self.like_max_text, &mut self.like_max),
        };
        let trimmed = text.trim();
        let value = if trimmed.is_empty() {
            None
        } else {
            match trimmed.parse::<i64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    log::warn!("Ignoring like input {:?}: not a whole number", text);
                    *text = like_text(*committed);
                    return;
                }
            }
        };
        *text = like_text(value);
        if value == *committed {
            return;
        }
        *committed = value;
        self.refresh_charts();
        self.start_sanitize();
    }

    /// Start a sanitiser run for the committed like inputs. Any run still in
    /// flight is superseded.
    pub fn start_sanitize(&mut self) {
        if let Some(old) = self.sanitize_job.take() {
            log::debug!("Superseding sanitiser run {}", old.generation());
        }
        self.generation += 1;
        let (raw_min, raw_max) = self
            .inputs()
            .like_range(&self.dataset)
            .map(|r| (r.min, r.max))
            .unwrap_or((0, 0));
        log::debug!(
            "Sanitising likes {raw_min}..={raw_max} (generation {})",
            self.generation
        );
        self.sanitize_job = Some(SanitizeJob::spawn(
            self.generation,
            raw_min,
            raw_max,
            self.dataset.max_likes(),
            self.sanitize_delay,
        ));
    }

    /// Collect a finished sanitiser run, if any. Results from superseded
    /// runs are discarded.
    pub fn poll_sanitizer(&mut self) {
        let Some(job) = &self.sanitize_job else {
            return;
        };
        match job.poll() {
            Ok(None) => {}
            Ok(Some(Sanitized { generation, min, max })) => {
                if generation == self.generation {
                    self.sanitized = Some((min, max));
                }
                self.sanitize_job = None;
            }
            Err(e) => {
                log::error!("Sanitiser worker vanished: {e}");
                self.sanitize_job = None;
            }
        }
    }

    /// Whether the loading indicators should spin.
    pub fn is_sanitizing(&self) -> bool {
        self.sanitize_job.is_some()
    }
}

fn like_text(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::data::model::tests::{day, tweet};

    fn config() -> DashboardConfig {
        DashboardConfig {
            sanitize_delay_ms: 0,
            ..DashboardConfig::default()
        }
    }

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::new(
            vec![
                tweet("1", "2012-03-01", 3),
                tweet("2", "2015-05-05", 120),
                tweet("3", "2016-06-06", 9),
                tweet("4", "2020-01-01", 40),
            ],
            vec![
                day("2012-03-01", 1),
                day("2015-05-05", 1),
                day("2016-06-06", 1),
                day("2020-01-01", 1),
            ],
        ))
    }

    fn wait_for_sanitizer(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while state.is_sanitizing() && Instant::now() < deadline {
            state.poll_sanitizer();
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn starts_with_default_selection_and_charts() {
        let mut state = AppState::new(dataset(), &config());
        assert_eq!(state.years, YearRange::new(2015, 2017));
        assert_eq!(state.year_bounds, YearRange::new(2012, 2020));
        assert_eq!(state.year_marks, vec![2012, 2015, 2016, 2020]);
        assert_eq!(state.charts.detail.as_ref().unwrap().points.len(), 2);

        wait_for_sanitizer(&mut state);
        assert_eq!(state.sanitized, Some((0, 120)));
    }

    #[test]
    fn default_years_are_clamped_to_data() {
        let cfg = DashboardConfig {
            default_years: [2000, 2030],
            ..config()
        };
        let state = AppState::new(dataset(), &cfg);
        assert_eq!(state.years, YearRange::new(2012, 2020));
    }

    #[test]
    fn moving_the_slider_refreshes_charts() {
        let mut state = AppState::new(dataset(), &config());
        state.set_years(2020, 2012);
        assert_eq!(state.years, YearRange::new(2012, 2020));
        assert_eq!(state.charts.daily.as_ref().unwrap().points.len(), 4);
    }

    #[test]
    fn committed_like_input_drives_detail_chart_unsanitised() {
        let mut state = AppState::new(dataset(), &config());
        state.like_min_text = "-5".into();
        state.commit_like(LikeBound::Min);
        state.like_max_text = "10".into();
        state.commit_like(LikeBound::Max);

        assert_eq!((state.like_min, state.like_max), (Some(-5), Some(10)));
        let detail = state.charts.detail.as_ref().unwrap();
        assert_eq!(detail.points.len(), 1);

        wait_for_sanitizer(&mut state);
        assert_eq!(state.sanitized, Some((0, 10)));
    }

    #[test]
    fn rejected_like_text_reverts() {
        let mut state = AppState::new(dataset(), &config());
        state.like_max_text = "lots".into();
        state.commit_like(LikeBound::Max);
        assert_eq!(state.like_max, Some(25000));
        assert_eq!(state.like_max_text, "25000");
    }

    #[test]
    fn newer_sanitiser_run_wins() {
        let cfg = DashboardConfig {
            sanitize_delay_ms: 20,
            ..config()
        };
        let mut state = AppState::new(dataset(), &cfg);
        state.like_min_text = "50".into();
        state.commit_like(LikeBound::Min);
        state.like_min_text = "7".into();
        state.commit_like(LikeBound::Min);

        wait_for_sanitizer(&mut state);
        assert_eq!(state.sanitized, Some((7, 120)));
    }

    fn detail_values(state: &AppState) -> Vec<f64> {
        match &state.charts.detail {
            Ok(spec) => spec.points.iter().map(|p| p.value).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn cleared_max_input_falls_back_to_most_liked_tweet() {
        let mut state = AppState::new(dataset(), &config());
        state.set_years(2012, 2020);
        state.like_max_text = "100".into();
        state.commit_like(LikeBound::Max);
        let values = detail_values(&state);
        assert!(!values.contains(&120.0));

        state.like_max_text = "  ".into();
        state.commit_like(LikeBound::Max);
        assert_eq!(state.like_max, None);
        assert_eq!(state.like_max_text, "");
        let values = detail_values(&state);
        assert!(values.contains(&120.0));
        assert_eq!(values.len(), 4);

        wait_for_sanitizer(&mut state);
        assert_eq!(state.sanitized, Some((0, 120)));
    }

    #[test]
    fn empty_like_range_reports_no_data() {
        let mut state = AppState::new(dataset(), &config());
        state.like_min_text = "5000".into();
        state.commit_like(LikeBound::Min);
        assert!(state.charts.detail.is_err());
        assert!(state.charts.daily.is_ok());
    }
}
