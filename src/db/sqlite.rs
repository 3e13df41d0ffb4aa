use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection as SqliteConn;

use crate::connection::Connection;
use crate::db::{User, UserStore, SELECT_USERS};
use crate::logger::{debug, trace};

const INSERT_USER: &str = "INSERT INTO users (name, age) VALUES (?1, ?2)";

pub struct Sqlite {
    conn: SqliteConn,
}

impl Sqlite {
    /// Open the configured file, or a private in-memory database when no
    /// path is set.
    pub fn connect(conn: &Connection) -> Result<Self> {
        let sc = match conn.path.as_ref() {
            Some(path) => {
                let path = expand_path(path)
                    .ok_or_else(|| anyhow::anyhow!("invalid sqlite path"))?;
                debug(&format!("sqlite: opening {}", path.display()));
                SqliteConn::open(path)
            }
            None => {
                debug("sqlite: opening in-memory database");
                SqliteConn::open_in_memory()
            }
        }
        .context("unable to connect to database")?;
        debug("sqlite: opened");
        Ok(Self { conn: sc })
    }
}

impl UserStore for Sqlite {
    fn ping(&mut self) -> Result<()> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .context("database ping failed")?;
        Ok(())
    }

    fn insert_user(&mut self, name: &str, age: i32) -> Result<u64> {
        debug(&format!("sqlite: inserting user {}", name));
        let n = self.conn.execute(INSERT_USER, rusqlite::params![name, age])?;
        Ok(n as u64)
    }

    fn fetch_users(&mut self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(SELECT_USERS)
            .context("failed to query users")?;
        let mut rows = stmt.query([]).context("failed to query users")?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().context("row iteration error")? {
            // INTEGER PRIMARY KEY is a 64-bit rowid; User ids are 32-bit.
            let rowid: i64 = row.get(0).context("failed to scan user row")?;
            let id = i32::try_from(rowid).with_context(|| {
                format!("failed to scan user row: id {} does not fit in 32 bits", rowid)
            })?;
            let user = User {
                id,
                name: row.get(1).context("failed to scan user row")?,
                age: row.get(2).context("failed to scan user row")?,
            };
            trace(&format!("sqlite: scanned {}", user));
            users.push(user);
        }
        debug(&format!("sqlite: {} user rows", users.len()));
        Ok(users)
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("failed to close connection")?;
        debug("sqlite: connection closed");
        Ok(())
    }
}

fn expand_path(path: &Path) -> Option<PathBuf> {
    let mut expanded_path = PathBuf::new();
    let mut path_iter = path.iter();
    if path.starts_with("~") {
        path_iter.next()?;
        expanded_path = expanded_path.join(dirs_next::home_dir()?);
    }
    for path in path_iter {
        let path = path.to_str()?;
        expanded_path = if cfg!(unix) && path.starts_with('$') {
            expanded_path.join(std::env::var(path.strip_prefix('$')?).unwrap_or_default())
        } else if cfg!(windows) && path.starts_with('%') && path.ends_with('%') {
            expanded_path
                .join(std::env::var(path.strip_prefix('%')?.strip_suffix('%')?).unwrap_or_default())
        } else {
            expanded_path.join(path)
        }
    }
    Some(expanded_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseType, DB};

    const SCHEMA: &str =
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50), age INT)";

    fn sqlite_conn(path: Option<PathBuf>) -> Connection {
        Connection {
            r#type: DatabaseType::Sqlite,
            path,
            ..Connection::default()
        }
    }

    fn with_schema() -> Sqlite {
        let db = Sqlite::connect(&sqlite_conn(None)).unwrap();
        db.conn.execute_batch(SCHEMA).unwrap();
        db
    }

    #[test]
    fn connect_and_ping() {
        let mut db = Sqlite::connect(&sqlite_conn(None)).unwrap();
        db.ping().unwrap();
    }

    #[test]
    fn unopenable_path_fails_to_connect() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("missing").join("nested").join("users.db");
        let err = DB::connect(&sqlite_conn(Some(bad))).err().expect("should fail");
        assert!(format!("{:#}", err).contains("unable to connect to database"));
    }

    #[test]
    fn insert_then_select_returns_inserted_row() {
        let mut db = with_schema();
        assert_eq!(db.insert_user("Alice", 30).unwrap(), 1);
        assert_eq!(db.insert_user("Bob", 41).unwrap(), 1);

        let users = db.fetch_users().unwrap();
        assert_eq!(users.len(), 2);
        let alice = users.iter().find(|u| u.name == "Alice").unwrap();
        assert_eq!(alice.age, 30);
        assert!(alice.id > 0);
        assert_ne!(users[0].id, users[1].id);
    }

    #[test]
    fn empty_table_yields_empty_vec() {
        let mut db = with_schema();
        assert!(db.fetch_users().unwrap().is_empty());
    }

    #[test]
    fn missing_table_is_a_query_error() {
        let mut db = Sqlite::connect(&sqlite_conn(None)).unwrap();
        let err = db.fetch_users().unwrap_err();
        assert!(format!("{:#}", err).contains("failed to query users"));
        assert!(db.insert_user("Alice", 30).is_err());
    }

    #[test]
    fn malformed_column_is_a_query_error() {
        let db = with_schema();
        assert!(db.conn.prepare("SELECT id, nmae, age FROM users").is_err());
    }

    #[test]
    fn null_name_is_a_scan_error() {
        let mut db = with_schema();
        db.conn
            .execute("INSERT INTO users (name, age) VALUES (NULL, 5)", [])
            .unwrap();
        let err = db.fetch_users().unwrap_err();
        assert!(format!("{:#}", err).contains("failed to scan user row"));
    }

    #[test]
    fn rowid_beyond_i32_is_rejected_with_id_in_message() {
        let mut db = with_schema();
        db.conn
            .execute("INSERT INTO users (id, name, age) VALUES (3000000000, 'Big', 1)", [])
            .unwrap();
        let err = db.fetch_users().unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("id 3000000000 does not fit in 32 bits"), "{}", msg);
    }

    #[test]
    fn repeated_open_close_on_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.db");
        SqliteConn::open(&path).unwrap().execute_batch(SCHEMA).unwrap();

        for run in 1..=3 {
            let mut store = DB::connect(&sqlite_conn(Some(path.clone()))).unwrap();
            store.insert_user("Alice", 30).unwrap();
            assert_eq!(store.fetch_users().unwrap().len(), run);
            store.close().unwrap();
        }
    }

    #[test]
    fn expand_path_keeps_plain_paths() {
        let p = expand_path(Path::new("/var/lib/users.db")).unwrap();
        assert_eq!(p, PathBuf::from("/var/lib/users.db"));
    }
}
