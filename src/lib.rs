pub mod aggregator;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod matrix;
pub mod output;
pub mod presenter;
pub mod profile;
pub mod report;
pub mod summary;
