use crate::{Connection, Result, CONFIG};
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
#[cfg(feature = "sqlite")]
use diesel::{dsl::sql_query, ConnectionError, RunQueryDsl};

pub type DbPool = Pool<ConnectionManager<Connection>>;
pub type PooledConn = PooledConnection<ConnectionManager<Connection>>;

#[derive(Debug)]
pub struct PragmaForeignKey;

impl CustomizeConnection<Connection, diesel::r2d2::Error> for PragmaForeignKey {
    #[cfg(feature = "sqlite")] // will default to an empty function for postgres
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), diesel::r2d2::Error> {
        sql_query("PRAGMA foreign_keys = on;")
            .execute(conn)
            .map(|_| ())
            .map_err(|_| {
                diesel::r2d2::Error::ConnectionError(ConnectionError::BadConnection(String::from(
                    "PRAGMA foreign_keys = on failed",
                )))
            })
    }
}

/// Builds the connection pool described by the configuration.
pub fn init_pool() -> Result<DbPool> {
    init_pool_for(&CONFIG.database_url)
}

pub fn init_pool_for(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<Connection>::new(database_url);
    let mut builder = Pool::builder()
        .connection_customizer(Box::new(PragmaForeignKey))
        .min_idle(CONFIG.db_min_idle);
    if let Some(max_size) = CONFIG.db_max_size {
        builder = builder.max_size(max_size);
    };
    Ok(builder.build(manager)?)
}
