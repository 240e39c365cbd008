use std::sync::Arc;

use clap::{Parser, Subcommand};
use vms_portal::api::ApiClient;
use vms_portal::config::PortalConfig;
use vms_portal::guard::{self, RouteDecision};
use vms_portal::services::{
    AccessDecision, AuthService, HomeDetails, LoginPayload, RecentValidation, SecurityRole,
    SecurityUser, ValidationResult, ValidationService,
};
use vms_portal::state::{Session, ValidationPhase, ValidationSession, ValidationState};
use vms_portal::storage::{FileTokenStore, TokenStore};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Please enter both email and password.")]
    MissingCredentials,
    #[error("not signed in; run `vms-cli login` first")]
    NotAuthenticated,
    #[error("{0}")]
    Config(#[from] vms_portal::config::ConfigError),
    #[error("{0}")]
    Auth(#[from] vms_portal::services::AuthError),
    #[error("gateway setup failed: {0}")]
    Gateway(#[from] vms_portal::api::ApiClientError),
    #[error("{0}")]
    Validation(String),
}

#[derive(Parser, Debug)]
#[command(name = "vms-cli", about = "Visitor management security portal CLI")]
struct Cli {
    /// Gateway base URL; overrides VMS_API_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "VMS_TOKEN_FILE", default_value = ".vms-token")]
    token_file: String,

    /// Recent-validation rows to request; overrides VMS_HISTORY_LIMIT.
    #[arg(long)]
    history_limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    token_file: String,
    history_limit: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session token.
    Login {
        #[arg(long, env = "VMS_EMAIL")]
        email: Option<String>,

        #[arg(long, env = "VMS_PASSWORD")]
        password: Option<String>,
    },
    /// Discard the stored session token.
    Logout,
    /// Show the signed-in officer.
    Whoami,
    /// Validate a typed visitor access code.
    Validate { code: String },
    /// Validate a scanned QR payload.
    ValidateQr { qr_data: String },
    /// Show the most recent validations.
    History,
}

struct Portal {
    session: Session,
    validation: ValidationSession,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = PortalConfig::resolve(cli.base_url.as_deref(), cli.history_limit)?;
    let ctx = CliContext {
        base_url: config.base_url,
        token_file: cli.token_file,
        history_limit: config.history_limit,
    };
    let portal = build_portal(&ctx)?;

    match cli.command {
        Command::Login { email, password } => run_login(&portal, email, password).await,
        Command::Logout => run_logout(&portal),
        Command::Whoami => run_whoami(&portal).await,
        Command::Validate { code } => run_validate(&portal, Target::Code(code)).await,
        Command::ValidateQr { qr_data } => run_validate(&portal, Target::Qr(qr_data)).await,
        Command::History => run_history(&portal).await,
    }
}

fn build_portal(ctx: &CliContext) -> Result<Portal, CliError> {
    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(ctx.token_file.as_str()));
    let api = Arc::new(ApiClient::new(ctx.base_url.as_str(), tokens.clone())?);
    let session = Session::new(Arc::new(AuthService::new(api.clone())), tokens);
    let validation =
        ValidationSession::with_history_limit(Arc::new(ValidationService::new(api)), ctx.history_limit);
    Ok(Portal { session, validation })
}

async fn run_login(
    portal: &Portal,
    email: Option<String>,
    password: Option<String>,
) -> Result<(), CliError> {
    let session = portal.session.hydrate().await;
    if guard::public_only_for(&session) == RouteDecision::RedirectToPortal {
        if let Some(user) = session.user {
            println!("already signed in as {} {}", user.first_name, user.last_name);
        }
        return Ok(());
    }

    let email = email.unwrap_or_default();
    let password = password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(CliError::MissingCredentials);
    }

    let user = portal.session.login(&LoginPayload { email, password }).await?;
    println!(
        "signed in as {} {} ({})",
        user.first_name,
        user.last_name,
        role_label(user.role)
    );
    Ok(())
}

fn run_logout(portal: &Portal) -> Result<(), CliError> {
    portal.session.logout();
    println!("signed out");
    Ok(())
}

async fn run_whoami(portal: &Portal) -> Result<(), CliError> {
    let user = require_officer(portal).await?;
    println!(
        "{} {} <{}> ({})",
        user.first_name,
        user.last_name,
        user.email,
        role_label(user.role)
    );
    Ok(())
}

enum Target {
    Code(String),
    Qr(String),
}

async fn run_validate(portal: &Portal, target: Target) -> Result<(), CliError> {
    require_officer(portal).await?;

    let state = match target {
        Target::Code(code) => portal.validation.validate(&code).await,
        Target::Qr(qr_data) => portal.validation.validate_qr(&qr_data).await,
    };
    report_validation(&state)
}

async fn run_history(portal: &Portal) -> Result<(), CliError> {
    require_officer(portal).await?;

    let state = portal.validation.fetch_history().await;
    print_history(&state.history);
    Ok(())
}

/// Hydrate the session and apply the protected-route guard.
async fn require_officer(portal: &Portal) -> Result<SecurityUser, CliError> {
    let session = portal.session.hydrate().await;
    match (guard::protected_for(&session), session.user) {
        (RouteDecision::Render, Some(user)) => Ok(user),
        _ => Err(CliError::NotAuthenticated),
    }
}

fn report_validation(state: &ValidationState) -> Result<(), CliError> {
    match state.phase {
        ValidationPhase::Success | ValidationPhase::Denied => {
            if let Some(card) = &state.result {
                print_card(card);
            }
            if let Some(reason) = &state.error_message {
                println!("reason:    {reason}");
            }
            Ok(())
        }
        ValidationPhase::Error => {
            let message = state
                .error_message
                .clone()
                .unwrap_or_else(|| "Validation failed".to_owned());
            Err(CliError::Validation(message))
        }
        ValidationPhase::Idle | ValidationPhase::Loading => Ok(()),
    }
}

fn print_card(card: &ValidationResult) {
    println!("{}  {}", decision_label(card.result), card.code);
    if let Some(name) = &card.visitor_name {
        println!("visitor:   {name}");
    }
    if let Some(name) = &card.resident_name {
        println!("resident:  {name}");
    }
    if let Some(home) = card.home_details.as_ref().and_then(format_home) {
        println!("home:      {home}");
    }
    println!("validated: {}", card.validated_at);
    if let Some(note) = &card.message {
        println!("note:      {note}");
    }
}

fn print_history(rows: &[RecentValidation]) {
    if rows.is_empty() {
        println!("no recent validations");
        return;
    }
    for row in rows {
        let place = match (&row.resident_name, &row.home) {
            (Some(resident), Some(home)) => format!("  {resident} ({home})"),
            (Some(resident), None) => format!("  {resident}"),
            (None, Some(home)) => format!("  ({home})"),
            (None, None) => String::new(),
        };
        println!(
            "{}  {:7}  {}  {}{place}",
            row.validated_at,
            decision_label(row.result),
            row.code,
            row.visitor_name
        );
    }
}

fn format_home(home: &HomeDetails) -> Option<String> {
    match (home.plot_number.as_deref(), home.street.as_deref()) {
        (Some(plot), Some(street)) => Some(format!("Plot {plot}, {street}")),
        (Some(plot), None) => Some(format!("Plot {plot}")),
        (None, Some(street)) => Some(street.to_owned()),
        (None, None) => None,
    }
}

fn decision_label(decision: AccessDecision) -> &'static str {
    match decision {
        AccessDecision::Granted => "GRANTED",
        AccessDecision::Denied => "DENIED",
    }
}

fn role_label(role: SecurityRole) -> &'static str {
    match role {
        SecurityRole::SecurityOfficer => "security officer",
        SecurityRole::Admin => "admin",
    }
}
