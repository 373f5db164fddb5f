/// Rendering: filter side panel, top bar and the chart dashboard.
pub mod panels;
pub mod plot;
