use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    AuthContext, FormState, HttpAuthService, LoginController, Navigator, NotificationState, Route,
    SessionStore, SignupController, SqliteSessionStore, SubmitOutcome,
};
use shared::domain::Field;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};

/// Extra time allowed after the handoff delay before giving up on navigation.
const HANDOFF_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "auth-client", about = "Log in or register against the auth service")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides `api_base_url` from the config file and environment.
    #[arg(long)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    Signup {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
    /// Print the persisted session, if any.
    Session,
}

struct ConsoleNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        info!(route = %route, "navigating");
        let _ = self.tx.send(route);
    }
}

struct ConsoleAuthContext;

impl AuthContext for ConsoleAuthContext {
    fn establish(&self, username: &str) {
        info!(username, "session established");
        println!("Signed in as {username}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(url) = args.api_base_url {
        settings.api_base_url = url;
    }
    settings.validate()?;
    info!(api_base_url = %settings.api_base_url, "loaded settings");

    match args.command {
        Command::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ").await?,
            };
            run_login(&settings, username, password).await
        }
        Command::Signup {
            firstname,
            lastname,
            username,
            email,
            phone,
        } => {
            let values = [
                (Field::Firstname, firstname),
                (Field::Lastname, lastname),
                (Field::Username, username),
                (Field::Email, email),
                (Field::Phone, phone),
            ];
            run_signup(&settings, values).await
        }
        Command::Session => show_session(&settings).await,
    }
}

async fn run_login(settings: &Settings, username: String, password: String) -> Result<()> {
    let service = Arc::new(HttpAuthService::new(&settings.api_base_url)?);
    let sessions = Arc::new(SqliteSessionStore::open(&settings.session_database_url).await?);
    let delay = settings.timings().login_handoff_delay;
    let (tx, mut routes) = mpsc::unbounded_channel();
    let controller = LoginController::new_with_settings(
        service,
        sessions,
        Arc::new(ConsoleNavigator { tx }),
        Arc::new(ConsoleAuthContext),
        delay,
        settings.login_policy(),
    );

    controller.set_field(Field::Username, username).await?;
    controller.set_field(Field::Password, password).await?;

    let outcome = controller.submit().await;
    report(&controller.form().await, &controller.notification());
    await_handoff(outcome, &mut routes, delay).await
}

async fn run_signup(settings: &Settings, values: [(Field, String); 5]) -> Result<()> {
    let service = Arc::new(HttpAuthService::new(&settings.api_base_url)?);
    let delay = settings.timings().signup_handoff_delay;
    let (tx, mut routes) = mpsc::unbounded_channel();
    let controller = SignupController::new_with_settings(
        service,
        Arc::new(ConsoleNavigator { tx }),
        delay,
        settings.signup_policy(),
    );

    for (field, value) in values {
        controller.set_field(field, value).await?;
    }

    let outcome = controller.submit().await;
    report(&controller.form().await, &controller.notification());
    await_handoff(outcome, &mut routes, delay).await
}

async fn show_session(settings: &Settings) -> Result<()> {
    let sessions = SqliteSessionStore::open(&settings.session_database_url).await?;
    match sessions.load_session().await? {
        Some(record) => println!("user_id={} (token stored)", record.user_id),
        None => println!("no session stored"),
    }
    Ok(())
}

async fn await_handoff(
    outcome: SubmitOutcome,
    routes: &mut mpsc::UnboundedReceiver<Route>,
    delay: Duration,
) -> Result<()> {
    match outcome {
        SubmitOutcome::Accepted { .. } => {
            let route = tokio::time::timeout(delay + HANDOFF_GRACE, routes.recv())
                .await
                .context("timed out waiting for navigation")?
                .context("navigator closed before handing off")?;
            println!("-> {route}");
            Ok(())
        }
        SubmitOutcome::Invalid(result) => {
            bail!("{} field(s) failed validation", result.errors().len())
        }
        SubmitOutcome::Busy => bail!("a submission is already in flight"),
        SubmitOutcome::Rejected { message } | SubmitOutcome::Failed { message } => bail!(message),
    }
}

fn report(form: &FormState, notification: &NotificationState) {
    for (field, _, error) in form.fields() {
        if let Some(error) = error {
            eprintln!("  {field}: {error}");
        }
    }
    if notification.visible {
        println!("[{}] {}", notification.severity, notification.message);
    }
}

async fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
