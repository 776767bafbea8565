//! Core business logic for warbler.
//!
//! Services sit between the HTTP layer and the repositories. They take plain
//! ids and tokens, return [`warbler_common::AppResult`], and never see HTTP types.

pub mod services;

pub use services::*;
