//! Match event analytics for live rugby matches.
//!
//! The [`analytics`] module holds the pure derivations (score replay,
//! momentum, discipline impact, scoring breakdown). Everything else is the
//! service around it: polling the match API, replaying a snapshot on a timer
//! and serving the results as JSON.

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod feed;
pub mod models;
pub mod playback;
