#![allow(proc_macro_derive_resolution_fallback)] // This can be removed after diesel-1.4

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate lazy_static;

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub type Connection = diesel::SqliteConnection;

#[cfg(all(not(feature = "sqlite"), feature = "postgres"))]
pub type Connection = diesel::PgConnection;

/// All the possible errors that can be encoutered in this crate
#[derive(Debug)]
pub enum Error {
    Db(diesel::result::Error),
    DbPool,
    DuplicateSlug(String),
    Io(std::io::Error),
    NotFound,
    Unauthorized,
    UserAlreadyExists,
    Validation(String),
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Error::NotFound,
            err => Error::Db(err),
        }
    }
}

impl From<diesel::r2d2::PoolError> for Error {
    fn from(_: diesel::r2d2::PoolError) -> Self {
        Error::DbPool
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Db(err) => write!(f, "database error: {}", err),
            Error::DbPool => write!(f, "no database connection available"),
            Error::DuplicateSlug(slug) => write!(f, "the slug \"{}\" is already used", slug),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::NotFound => write!(f, "not found"),
            Error::Unauthorized => write!(f, "you are not allowed to do that"),
            Error::UserAlreadyExists => write!(f, "this username is already taken"),
            Error::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Adds a function to a model, that returns the first
/// matching row for a given list of fields.
///
/// Usage:
///
/// ```rust,ignore
/// impl Model {
///     find_by!(model_table, name_of_the_function, field1 as String, field2 as i32);
/// }
///
/// // Get the Model with field1 == "", and field2 == 0
/// Model::name_of_the_function(connection, String::new(), 0);
/// ```
macro_rules! find_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        /// Try to find a $table with a given $col
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Self> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve a row by ID
///
/// # Usage
///
/// ```rust,ignore
/// impl Model {
///     get!(model_table);
/// }
///
/// // Get the Model with ID 1
/// Model::get(connection, 1);
/// ```
macro_rules! get {
    ($table:ident) => {
        pub fn get(conn: &crate::Connection, id: i32) -> Result<Self> {
            $table::table
                .filter($table::id.eq(id))
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to insert a new row
///
/// # Usage
///
/// ```rust,ignore
/// impl Model {
///     insert!(model_table, NewModelType);
/// }
///
/// // Insert a new row
/// Model::insert(connection, NewModelType::new());
/// ```
macro_rules! insert {
    ($table:ident, $from:ty) => {
        insert!($table, $from, |x, _conn| Ok(x));
    };
    ($table:ident, $from:ty, |$val:ident, $conn:ident | $( $after:tt )+) => {
        last!($table);

        pub fn insert(conn: &crate::Connection, new: $from) -> Result<Self> {
            diesel::insert_into($table::table)
                .values(new)
                .execute(conn)?;
            #[allow(unused_mut)]
            let mut $val = Self::last(conn)?;
            let $conn = conn;
            $( $after )+
        }
    };
}

/// Returns the last row of a table.
///
/// # Usage
///
/// ```rust,ignore
/// impl Model {
///     last!(model_table);
/// }
///
/// // Get the last Model
/// Model::last(connection)
/// ```
macro_rules! last {
    ($table:ident) => {
        pub fn last(conn: &crate::Connection) -> Result<Self> {
            $table::table
                .order_by($table::id.desc())
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Number of items shown on every paginated listing
pub const ITEMS_PER_PAGE: i32 = 10;

#[cfg(test)]
#[macro_use]
mod tests {
    use crate::{migrations::IMPORTED_MIGRATIONS, Connection as Conn, CONFIG};
    use diesel::Connection;
    use std::env::temp_dir;

    /// A fresh, migrated database for a single test
    pub fn db() -> Conn {
        let conn = Conn::establish(CONFIG.database_url.as_str())
            .expect("Couldn't connect to the database");
        #[cfg(feature = "sqlite")]
        diesel::connection::SimpleConnection::batch_execute(&conn, "PRAGMA foreign_keys = on;")
            .expect("Couldn't enable foreign keys");
        IMPORTED_MIGRATIONS
            .run_pending_migrations(&conn, &temp_dir())
            .expect("Couldn't run migrations");
        conn
    }
}

pub mod comments;
pub mod config;
pub mod db_conn;
pub mod feed;
pub mod follows;
pub mod groups;
pub mod migrations;
pub mod pagination;
pub mod posts;
pub mod repository;
pub mod schema;
pub mod users;

pub use config::CONFIG;
