//! Common utilities and types shared across the session gateway crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for compact JWT format checks shared by token producers and consumers
pub mod jwt;
