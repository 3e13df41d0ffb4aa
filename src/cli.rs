use std::path::PathBuf;

use crate::logger::LogLevel;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Args {
    /// YAML file holding a list of connections
    ///
    /// Defaults to connections.yaml in the app config directory. When that
    /// file does not exist the built-in placeholder credentials are used.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Name of the connection entry to use (first entry if omitted)
    #[arg(short = 'C', long = "connection", value_name = "NAME")]
    pub connection: Option<String>,

    /// Name of the user row to insert
    #[arg(long, default_value = "Alice")]
    pub name: String,

    /// Age of the user row to insert
    #[arg(long, default_value_t = 30)]
    pub age: i32,

    /// Skip the insert and only list users
    #[arg(long)]
    pub no_insert: bool,

    /// Log level (overrides PGUSERDEMO_LOG)
    #[arg(short, long, value_name = "LEVEL")]
    pub log: Option<LogLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_insert_alice() {
        let args = Args::try_parse_from(["pguserdemo"]).unwrap();
        assert_eq!(args.name, "Alice");
        assert_eq!(args.age, 30);
        assert!(!args.no_insert);
        assert!(args.config.is_none());
        assert!(args.log.is_none());
    }

    #[test]
    fn short_n_is_not_a_connection_alias() {
        assert!(Args::try_parse_from(["pguserdemo", "-n", "local"]).is_err());
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "pguserdemo",
            "--config",
            "/etc/users.yaml",
            "-C",
            "local",
            "--name",
            "Bob",
            "--age",
            "41",
            "--no-insert",
            "--log",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/etc/users.yaml")));
        assert_eq!(args.connection.as_deref(), Some("local"));
        assert_eq!(args.name, "Bob");
        assert_eq!(args.age, 41);
        assert!(args.no_insert);
        assert_eq!(args.log, Some(LogLevel::Debug));
    }
}
