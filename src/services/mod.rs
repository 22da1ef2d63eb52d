//! Domain services used by the HTTP and websocket routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the simulation state so route handlers can stay
//! focused on protocol translation.

pub mod ticker;
pub mod upload;
