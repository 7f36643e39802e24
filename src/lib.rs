//! Brent crude price forecasting dashboard: file-backed price history, a
//! restored forecasting model, and an egui front end over both.

pub mod app;
pub mod data;
pub mod forecast;
pub mod state;
pub mod ui;
