use anyhow::{Context, Result};
use postgres::fallible_iterator::FallibleIterator;

use crate::connection::Connection;
use crate::db::{User, UserStore, SELECT_USERS};
use crate::logger::{debug, trace, warn};

const INSERT_USER: &str = "INSERT INTO users (name, age) VALUES ($1, $2)";

pub struct Postgres {
    client: postgres::Client,
}

impl Postgres {
    pub fn connect(conn: &Connection) -> Result<Self> {
        if let Some(mode) = conn.sslmode.as_deref() {
            if mode != "disable" && mode != "prefer" {
                warn(&format!(
                    "postgres: sslmode={} needs TLS, which is not compiled in",
                    mode
                ));
            }
        }
        debug(&format!("postgres: connecting to {}", conn.display_name()));
        let pg = Self::open(&conn.conn_string())?;
        debug("postgres: connected");
        Ok(pg)
    }

    fn open(params: &str) -> Result<Self> {
        let client = postgres::Client::connect(params, postgres::NoTls)
            .context("unable to connect to database")?;
        Ok(Self { client })
    }

    /// Stream rows of `sql` (columns id, name, age) into users. Errors raised
    /// after the first row arrives surface as iteration errors.
    fn query_users(&mut self, sql: &str) -> Result<Vec<User>> {
        let mut it = self
            .client
            .query_raw(sql, std::iter::empty::<i32>())
            .context("failed to query users")?;

        let mut users = Vec::new();
        while let Some(row) = it.next().context("row iteration error")? {
            let user = User {
                id: row.try_get(0).context("failed to scan user row")?,
                name: row.try_get(1).context("failed to scan user row")?,
                age: row.try_get(2).context("failed to scan user row")?,
            };
            trace(&format!("postgres: scanned {}", user));
            users.push(user);
        }
        debug(&format!("postgres: {} user rows", users.len()));
        Ok(users)
    }
}

impl UserStore for Postgres {
    fn ping(&mut self) -> Result<()> {
        self.client
            .simple_query("")
            .context("database ping failed")?;
        Ok(())
    }

    fn insert_user(&mut self, name: &str, age: i32) -> Result<u64> {
        debug(&format!("postgres: inserting user {}", name));
        let n = self.client.execute(INSERT_USER, &[&name, &age])?;
        Ok(n)
    }

    fn fetch_users(&mut self) -> Result<Vec<User>> {
        self.query_users(SELECT_USERS)
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.client.close().context("failed to close connection")?;
        debug("postgres: connection closed");
        Ok(())
    }
}
