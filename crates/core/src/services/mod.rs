pub mod alignment;
pub mod fallback;
pub mod metrics;
pub mod normalization;
pub mod render_service;
pub mod report_service;
