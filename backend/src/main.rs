use dotenvy::dotenv;
use anyhow::Context;
use axum::{
    routing::{any, get},
    Router,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{TraceLayer, DefaultMakeSpan, DefaultOnResponse};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use std::net::SocketAddr;
use std::sync::Arc;

mod config {
    pub mod contact_config;
}
mod handlers {
    pub mod contact_dtos;
    pub mod contact_handlers;
}
mod utils {
    pub mod contact_log;
    pub mod contact_mail;
    pub mod contact_validation;
    pub mod mail;
}

use config::contact_config::{ContactConfig, MailTransportKind};
use handlers::contact_handlers;
use utils::contact_log::ContactLog;
use utils::mail::{MailTransport, SendmailMailer, SmtpMailer};

async fn health_check() -> &'static str {
    "OK"
}

pub struct AppState {
    pub config: ContactConfig,
    pub mailer: Arc<dyn MailTransport>,
    pub contact_log: ContactLog,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        // the handler answers non-POST methods itself so the 405 body keeps the outcome shape
        .route("/api/contact", any(contact_handlers::handle_contact))
        .route("/contact.php", any(contact_handlers::handle_contact))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
        )
        .layer(
            CorsLayer::new()
                .allow_methods([
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_origin(Any)
                .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
                .expose_headers([axum::http::header::CONTENT_TYPE])
        )
        .with_state(state)
}

fn build_mailer(transport: &MailTransportKind) -> anyhow::Result<Arc<dyn MailTransport>> {
    Ok(match transport {
        MailTransportKind::Sendmail { command } => {
            Arc::new(SendmailMailer::new(command.as_deref()))
        }
        MailTransportKind::Smtp { url } => {
            Arc::new(SmtpMailer::from_url(url).context("SMTP_URL is not a valid smtp url")?)
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // disabled when SENTRY_DSN is unset
    let _guard = sentry::init((std::env::var("SENTRY_DSN").ok(), sentry::ClientOptions {
        release: sentry::release_name!(),
        ..Default::default()
    }));

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ContactConfig::from_env()?;
    let mailer = build_mailer(&config.transport)?;
    let contact_log = ContactLog::open(&config.log_dir, config.timezone);
    let bind_addr = config.bind_addr;

    tracing::info!(
        "Contact relay for {} via {:?}, logging to {:?}",
        config.recipient,
        config.transport,
        contact_log.path()
    );

    let state = Arc::new(AppState {
        config,
        mailer,
        contact_log,
    });

    use tokio::net::TcpListener;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    axum::serve(listener, app(state).into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
