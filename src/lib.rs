//! # Housekeeping Bot
//!
//! A Telegram bot that tracks hotel room cleaning for the day.
//!
//! ## Features
//! - Admins upload the day's plan as CSV (room, staff, cleaning type)
//! - Staff mark their rooms done, switch the cleaning type and leave comments
//! - Daily report in the report chat, CSV and XLSX exports
//! - Nightly carryover of unfinished rooms to the next day
//! - Persistent storage with SQLite

/// Bot commands, update handlers and inline keyboards
pub mod bot;
/// Configuration loaded from environment variables
pub mod config;
/// Database connection, migrations and models
pub mod database;
/// Domain error type
pub mod error;
/// CSV plan decoding and parsing
pub mod plan;
/// Room control, import, reports, jobs and the health endpoint
pub mod services;
/// Shared handler state
pub mod state;
/// Helpers for dates, validation, logging and user feedback
pub mod utils;
