//! Command-line interface.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "regapp", version, about = "Registration app authentication gate")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE", default_value = "regapp.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Serve from an in-memory store holding only this identity,
        /// for local development
        #[arg(long, value_name = "EMAIL:PASSWORD", value_parser = parse_seed_user)]
        seed_user: Option<SeedUser>,
    },
    /// Read a password from stdin and print its hash
    HashPassword,
    /// Add an identity to the flat-file store; the password is read from stdin
    AddUser {
        #[arg(long)]
        email: String,
        /// Role to grant, may be repeated; defaults to USER
        #[arg(long = "role", value_name = "ROLE")]
        roles: Vec<String>,
        /// Accept passwords that fail the strength policy
        #[arg(long)]
        allow_weak_password: bool,
    },
}

#[derive(Debug, Clone)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
}

fn parse_seed_user(raw: &str) -> Result<SeedUser, String> {
    match raw.split_once(':') {
        Some((email, password)) if !email.is_empty() && !password.is_empty() => Ok(SeedUser {
            email: email.to_string(),
            password: password.to_string(),
        }),
        _ => Err("expected EMAIL:PASSWORD".to_string()),
    }
}
