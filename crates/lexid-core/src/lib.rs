//! Client-side session and authentication for the lexid citizen platform.
//!
//! This crate holds everything the interactive screens depend on but nothing
//! terminal-specific: the on-disk token store, the HTTP gateway to the
//! platform API, the session state machine, the form-flow state machines
//! (registration with email verification, forgot/reset password), and the
//! navigation guard.

pub mod api;
pub mod config;
pub mod flows;
pub mod routes;
pub mod session;
pub mod token;
pub mod validate;
