mod postgres;
mod sqlite;

use std::fmt;

use crate::connection::Connection;
use anyhow::Result;
use serde::Deserialize;

pub use self::postgres::Postgres;
pub use self::sqlite::Sqlite;

pub const SELECT_USERS: &str = "SELECT id, name, age FROM users";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseType {
    #[default]
    #[serde(rename = "postgres")]
    Postgres,
    #[serde(rename = "sqlite")]
    Sqlite,
}

/// One row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub age: i32,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Name: {}, Age: {}", self.id, self.name, self.age)
    }
}

/// A live connection to a store holding the `users` table.
pub trait UserStore {
    /// Lightweight round-trip confirming the connection is usable.
    fn ping(&mut self) -> Result<()>;
    /// Insert one user; the store assigns the id. Returns rows affected.
    fn insert_user(&mut self, name: &str, age: i32) -> Result<u64>;
    fn fetch_users(&mut self) -> Result<Vec<User>>;
    /// Release the connection. Dropping the handle does the same, silently.
    fn close(self: Box<Self>) -> Result<()>;
}

pub struct DB;

impl DB {
    /// Open a connection for `conn` and verify it with a liveness check.
    pub fn connect(conn: &Connection) -> Result<Box<dyn UserStore>> {
        let mut store: Box<dyn UserStore> = match conn.r#type {
            DatabaseType::Postgres => Box::new(Postgres::connect(conn)?),
            DatabaseType::Sqlite => Box::new(Sqlite::connect(conn)?),
        };
        store.ping()?;
        Ok(store)
    }
}
