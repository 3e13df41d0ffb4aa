use serde::Deserialize;

use crate::db::DatabaseType;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Connection {
    #[serde(default)]
    pub r#type: DatabaseType,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub dbname: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub sslmode: Option<String>,
    pub path: Option<std::path::PathBuf>,
}

impl Default for Connection {
    /// Placeholder credentials; edit them or provide a connections file.
    fn default() -> Self {
        Self {
            r#type: DatabaseType::Postgres,
            name: None,
            user: Some("youruser".to_string()),
            password: Some("yourpassword".to_string()),
            dbname: Some("yourdbname".to_string()),
            host: Some("localhost".to_string()),
            port: Some(5432),
            sslmode: Some("disable".to_string()),
            path: None,
        }
    }
}

impl Connection {
    /// Render the key=value connection string understood by libpq and the
    /// `postgres` crate.
    pub fn conn_string(&self) -> String {
        let port = self.port.map(|p| p.to_string());
        let fields = [
            ("user", self.user.as_deref()),
            ("password", self.password.as_deref()),
            ("dbname", self.dbname.as_deref()),
            ("host", self.host.as_deref()),
            ("port", port.as_deref()),
            ("sslmode", self.sslmode.as_deref()),
        ];
        fields
            .iter()
            .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, quote_value(v))))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Label used in log lines; never includes the password.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match self.r#type {
            DatabaseType::Postgres => format!(
                "{}@{}:{}",
                self.dbname.as_deref().unwrap_or("postgres"),
                self.host.as_deref().unwrap_or("localhost"),
                self.port.unwrap_or(5432)
            ),
            DatabaseType::Sqlite => self
                .path
                .as_ref()
                .map_or(":memory:".to_string(), |p| p.display().to_string()),
        }
    }
}

fn quote_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}
