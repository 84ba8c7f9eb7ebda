//! Core library for the LEO rewards service: the progression engine that turns
//! twice-daily brushing logs into points, streaks, leagues, and chest rewards,
//! plus the legacy token engine kept for older persisted state.

pub mod config;
pub mod error;
pub mod progression;
pub mod telemetry;
