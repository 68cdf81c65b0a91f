//! `TeamPulse` - team status engine with activity tracking.

pub mod activity;
pub mod app;
pub mod clock;
pub mod command;
pub mod config;
pub mod session;
pub mod stats;
pub mod store;
pub mod sweeper;
