//! egui widgets: header, range controls and chart panels.

pub mod panels;
pub mod plot;
