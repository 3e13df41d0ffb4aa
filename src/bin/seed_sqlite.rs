use anyhow::{Context, Result};

/// Create `dev/sqlite/users.db` with a `users` table matching the PostgreSQL
/// layout and a few rows, for running pguserdemo without a server.
fn main() -> Result<()> {
    let path = std::path::Path::new("dev/sqlite");
    std::fs::create_dir_all(path)?;
    let db_path = path.join("users.db");
    let conn = rusqlite::Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            name VARCHAR(50),
            age INT
        );
        DELETE FROM users;
        INSERT INTO users (name, age) VALUES
          ('Bob', 41),
          ('Carol', 52),
          ('Dave', 27);
        "#,
    )?;
    println!("Seeded SQLite at {}", db_path.display());
    println!("Point a connection at it:\n- name: dev\n  type: sqlite\n  path: {}", db_path.display());
    Ok(())
}
