mod cli;
mod config;
mod connection;
mod db;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Args;
use crate::connection::Connection;
use crate::db::{UserStore, DB};
use crate::logger::{error, info, warn};

fn main() {
    let args = Args::parse();
    logger::set_level(args.log);

    // Mirror log lines into a file under the app config directory
    if let Ok(dir) = config::get_app_config_path() {
        let _ = logger::init(dir.join(config::LOG_FILE));
    }

    if let Err(err) = run(&args) {
        error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn resolve_connection(args: &Args) -> Result<Connection> {
    let list = match &args.config {
        Some(path) => config::load_connections_from(path)?,
        None => config::load_connections()?,
    };
    config::select_connection(list, args.connection.as_deref())
}

fn run(args: &Args) -> Result<()> {
    let conn = resolve_connection(args).context("could not load connection settings")?;
    info(&format!("connecting to {}", conn.display_name()));

    let mut store =
        DB::connect(&conn).context("could not initialize database connection")?;
    println!("Successfully connected to the database!");

    if !args.no_insert {
        insert_user(store.as_mut(), &args.name, args.age);
    }

    let users = store.fetch_users().context("could not get users")?;

    println!("\nUsers found in the database:");
    for user in &users {
        println!("{}", user);
    }

    store.close()
}

/// Insert failures are not fatal; the row may already exist.
fn insert_user(store: &mut dyn UserStore, name: &str, age: i32) {
    if let Err(err) = store.insert_user(name, age) {
        warn(&format!("could not insert user: {:#}", err));
    }
}
