//! # quest
//!
//! Front-ends for the onboarding quest: a CLI, a local HTTP API, and the
//! configuration both share.

pub mod api;
pub mod cli;
pub mod config;
