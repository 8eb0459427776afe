// crates/backend-bin/src/main.rs
mod cli;

use anyhow::{bail, Context};
use backend_lib::{
    auth::{validate_password_strength, PasswordEncoder, PasswordRequirements},
    config::Settings,
    router,
    storage::{FlatFileIdentityStore, InMemoryIdentityStore},
    telemetry, AppState,
};
use clap::Parser;
use cli::{Cli, Command, SeedUser};
use regapp_common::Identity;
use std::io::BufRead;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};
use zeroize::Zeroize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command.unwrap_or(Command::Serve { seed_user: None }) {
        Command::Serve { seed_user } => {
            telemetry::init_tracing(&settings.log)?;
            serve(settings, seed_user).await
        },
        Command::HashPassword => hash_password(&settings),
        Command::AddUser {
            email,
            roles,
            allow_weak_password,
        } => add_user(&settings, email, roles, allow_weak_password).await,
    }
}

async fn serve(settings: Settings, seed_user: Option<SeedUser>) -> anyhow::Result<()> {
    let state = match seed_user {
        Some(mut seed) => {
            warn!(email = %seed.email, "serving from an in-memory store with a seeded user");
            let encoder = PasswordEncoder::new(settings.security.password_hash_cost)?;
            let store = InMemoryIdentityStore::new();
            store.insert(Identity::new(seed.email.clone(), encoder.hash_secure(&mut seed.password)?).with_role("USER"))?;
            AppState::new(store, &settings)?
        },
        None => {
            let storage = FlatFileIdentityStore::new(&settings.storage.path)?;
            info!(path = %storage.path().display(), "using flat-file identity store");
            AppState::new(storage, &settings)?
        },
    };
    let state = Arc::new(state);

    if !settings.security.csrf_enabled {
        warn!("CSRF protection is disabled");
    }

    // Setup a background task for session cleanup
    let sessions = state.sessions.clone();
    let cleanup_every = Duration::from_secs(settings.session.cleanup_interval_secs);
    tokio::spawn(async move {
        let mut interval = interval(cleanup_every);
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired_sessions().await;
            debug!(removed, "expired sessions purged");
        }
    });

    let app = router::create_router(state);

    let addr = settings.bind_addr()?;
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    axum_serve(listener, app).await
}

async fn axum_serve(listener: TcpListener, app: axum::Router) -> anyhow::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
        })
        .await?;
    Ok(())
}

fn read_password() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    line.zeroize();
    if password.is_empty() {
        bail!("no password given on stdin");
    }
    Ok(password)
}

fn hash_password(settings: &Settings) -> anyhow::Result<()> {
    let encoder = PasswordEncoder::new(settings.security.password_hash_cost)?;
    let mut password = read_password()?;
    println!("{}", encoder.hash_secure(&mut password)?);
    Ok(())
}

async fn add_user(
    settings: &Settings,
    email: String,
    roles: Vec<String>,
    allow_weak_password: bool,
) -> anyhow::Result<()> {
    let mut password = read_password()?;
    if !allow_weak_password
        && !validate_password_strength(&password, &PasswordRequirements::default())
    {
        password.zeroize();
        bail!("password does not meet the strength policy (use --allow-weak-password to override)");
    }

    let encoder = PasswordEncoder::new(settings.security.password_hash_cost)?;
    let mut identity = Identity::new(email, encoder.hash_secure(&mut password)?);
    if roles.is_empty() {
        identity = identity.with_role("USER");
    }
    identity.roles.extend(roles);

    let store = FlatFileIdentityStore::new(&settings.storage.path)?;
    let email = identity.email.clone();
    store.insert(identity).await?;
    println!("added {email} to {}", store.path().display());
    Ok(())
}
