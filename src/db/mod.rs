// [rust] Module declarations - organize database-related functionality
pub mod filter; // Property search criteria and the dynamic query builder
pub mod models; // Row types returned to the web layer
pub mod queries; // Parameterized queries over users, properties and reservations

// [rust] Re-export child modules so callers can import from db:: directly
pub use filter::*;
pub use models::*;
pub use queries::*;

// [library] SQLx - a single PostgreSQL connection, no pool
use sqlx::{Connection, PgConnection};

// [library] Async mutex - the guard is held across the `.await` of a round-trip
use tokio::sync::{Mutex, MutexGuard};

use tracing::info;

use crate::config::Config;

/// The one connection shared by every query function.
///
/// Opened explicitly with [`Database::connect`] and closed with
/// [`Database::close`]; queries borrow it for a single round-trip each.
#[derive(Debug)]
pub struct Database {
    conn: Mutex<PgConnection>,
}

impl Database {
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        info!(
            "Connecting to database {} on {}:{}",
            config.db_name, config.db_host, config.db_port
        );
        let conn = PgConnection::connect_with(&config.connect_options()).await?;
        info!("Database connection established");

        Ok(Self::from_connection(conn))
    }

    // [rust] Wrap an already-open connection (tests, custom connect options)
    pub fn from_connection(conn: PgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    // [rust] Exclusive access to the connection until the guard is dropped
    pub async fn acquire(&self) -> MutexGuard<'_, PgConnection> {
        self.conn.lock().await
    }

    // [business] Graceful shutdown - sends Terminate instead of just dropping the socket
    pub async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.into_inner().close().await?;
        info!("Database connection closed");
        Ok(())
    }
}
