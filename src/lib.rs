//! designcheck — simulated design-file uploads with mock compliance,
//! security, and accessibility reports.
//!
//! ARCHITECTURE
//! ============
//! `services::upload` owns the upload/analysis state machine and its event
//! stream. `reports` holds the literal datasets. `routes` exposes both over
//! HTTP and a websocket for a browser rendering layer.

pub mod config;
pub mod frame;
pub mod random;
pub mod record;
pub mod reports;
pub mod routes;
pub mod services;
pub mod state;
