//! HTTP server configuration object.

use healthcare_backend::outbound::persistence::DbPool;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Vec<u8>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from the bind address and the token
    /// signing secret.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: Vec<u8>) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without a pool the server falls back to in-memory stores, which is
    /// only useful for local development and tests.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
