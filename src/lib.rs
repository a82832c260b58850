//! Per-team season statistics from StatsBomb open-data event logs.
//!
//! Each match's events are reduced to per-team counters ([`match_stats`]),
//! folded across the season ([`season`]) and turned into per-match and
//! efficiency rates ([`metrics`]).

pub mod config;
pub mod event_source;
pub mod events;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod match_stats;
pub mod metrics;
pub mod open_data;
pub mod report;
pub mod season;
pub mod spatial;
pub mod team_names;
