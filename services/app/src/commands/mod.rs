pub mod ask;
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod performance;
pub mod quiz;
pub mod render;
pub mod schedule;
pub mod summaries;
pub mod upload;
