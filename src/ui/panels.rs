use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, LikeBound};

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Page title and a link to the analysis repository.
pub fn header(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&state.page_title);
        ui.hyperlink_to("Github Repo", &state.repo_url);
    });
}

// ---------------------------------------------------------------------------
// Year range selector
// ---------------------------------------------------------------------------

/// Two linked sliders acting as one dual-ended range, with the available
/// years listed underneath as marks.
pub fn year_range(ui: &mut Ui, state: &mut AppState) {
    let bounds = state.year_bounds.min..=state.year_bounds.max;
    let mut start = state.years.min;
    let mut end = state.years.max;

    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Years");
        changed |= ui
            .add(egui::Slider::new(&mut start, bounds.clone()).step_by(1.0).text("from"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut end, bounds).step_by(1.0).text("to"))
            .changed();
    });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for &year in &state.year_marks {
            let text = RichText::new(year.to_string()).small();
            if state.years.contains(year) {
                ui.label(text.strong());
            } else {
                ui.label(text.weak());
            }
        }
    });

    if changed {
        // A dragged start past the end drags the end with it, and vice versa.
        let (start, end) = if start > state.years.max {
            (start, start)
        } else if end < state.years.min {
            (end, end)
        } else {
            (start, end)
        };
        state.set_years(start, end);
    }
}

// ---------------------------------------------------------------------------
// Like inputs
// ---------------------------------------------------------------------------

/// The two like-count inputs, each followed by its loading placeholder.
/// Edits only take effect once the input loses focus or Enter is pressed.
pub fn like_inputs(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Likes");
        like_input(ui, state, LikeBound::Min, "0");
        loading_placeholder(ui, state, LikeBound::Min);
        ui.add_space(25.0);
        like_input(ui, state, LikeBound::Max, "25000");
        loading_placeholder(ui, state, LikeBound::Max);
    });
}

fn like_input(ui: &mut Ui, state: &mut AppState, bound: LikeBound, hint: &str) {
    let text = match bound {
        LikeBound::Min => &mut state.like_min_text,
        LikeBound::Max => &mut state.like_max_text,
    };
    let response = ui.add(
        egui::TextEdit::singleline(text)
            .hint_text(hint)
            .desired_width(90.0),
    );
    if response.lost_focus() {
        state.commit_like(bound);
    }
}

fn loading_placeholder(ui: &mut Ui, state: &AppState, bound: LikeBound) {
    if state.is_sanitizing() {
        ui.add(egui::Spinner::new());
        return;
    }
    if let Some((min, max)) = state.sanitized {
        let value = match bound {
            LikeBound::Min => min,
            LikeBound::Max => max,
        };
        ui.label(RichText::new(value.to_string()).color(Color32::GRAY));
    }
}
