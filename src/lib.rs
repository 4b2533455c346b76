//! Terminal dashboard for a single fund holding: a sign-in gate, stat tiles,
//! and a growth chart drawn from a synthetic daily history.

pub mod app;
pub mod auth;
pub mod config;
pub mod format;
pub mod logging;
pub mod position;
pub mod range;
pub mod series;
pub mod session;
pub mod ui;
