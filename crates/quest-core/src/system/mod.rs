//! # System Module
//!
//! The stage catalog, the celebration rule table and journey-map status.
//!
//! Everything here is static or derived purely from a [`crate::QuestProgress`];
//! mutation lives in [`crate::tracker`].

mod stage;

pub use stage::*;
