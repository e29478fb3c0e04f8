// Database module - provides data access layer

use std::sync::Arc;

use color_eyre::{eyre::OptionExt, Result};

// Re-export models for convenience
pub mod models;
pub use models::*;

// Internal modules
mod schema;
mod helpers;
mod user;
mod course;
mod lesson;
mod quiz;
mod progress;
mod certificate;
mod feedback;
mod community;
mod challenge;
mod stats;

// Main database handle
#[derive(Clone)]
pub struct Db {
    db: Arc<libsql::Database>,
}

impl Db {
    pub async fn new(url: String, auth_token: String) -> Result<Self> {
        let db = if let Some(path) = url.strip_prefix("file:") {
            // Local SQLite file
            libsql::Builder::new_local(path).build().await?
        } else {
            // Remote Turso database
            libsql::Builder::new_remote(url.to_owned(), auth_token)
                .build()
                .await?
        };

        let conn = db.connect()?;

        // Verify connection
        let one = conn
            .query("SELECT 1", ())
            .await?
            .next()
            .await?
            .ok_or_eyre("connection check failed")?
            .get::<i32>(0)?;
        assert_eq!(one, 1);

        schema::create_schema(&conn).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { db: Arc::new(db) })
    }

    /// Open a connection with foreign-key enforcement on (SQLite leaves
    /// it off per connection, which would silently skip the CASCADEs).
    pub(crate) async fn connect(&self) -> Result<libsql::Connection> {
        let conn = self.db.connect()?;
        conn.execute("PRAGMA foreign_keys = ON", ()).await?;
        Ok(conn)
    }
}
