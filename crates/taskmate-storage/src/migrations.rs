// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, compiled in with refinery.

use taskmate_core::TaskmateError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply pending migrations. Refinery records applied versions in
/// `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), TaskmateError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| TaskmateError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
