// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite connection store.
//!
//! WAL-mode SQLite with embedded refinery migrations. Every statement runs
//! on the single tokio-rusqlite background thread.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
pub use models::ConnectionRow;
