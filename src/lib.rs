//! Car sales dashboard: a filter-and-aggregate pipeline over a static sales
//! table, plus the egui front end and text report that consume it.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod report;
pub mod state;
pub mod ui;
