// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled in with `embed_migrations!`
//! and run on every database open.

use bgpvpn_core::BgpvpnError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against `conn`.
///
/// Refinery records applied versions in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), BgpvpnError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| BgpvpnError::Persistence {
            source: Box::new(e),
        })?;
    Ok(())
}
