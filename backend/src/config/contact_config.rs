use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use chrono_tz::Tz;

pub const DEFAULT_SUBJECT_PREFIX: &str = "【サングッディーズ】お問い合わせ";
pub const DEFAULT_LOG_DIR: &str = "storage/logs";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTransportKind {
    /// Hand the message to the local `sendmail` binary.
    Sendmail { command: Option<String> },
    Smtp { url: String },
}

/// Deployment settings for the mail relay endpoint.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub recipient: String,
    pub from_address: String,
    pub subject_prefix: String,
    pub log_dir: PathBuf,
    pub timezone: Tz,
    pub bind_addr: SocketAddr,
    pub transport: MailTransportKind,
}

impl ContactConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // empty values count as unset, same as a blank line in .env
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let recipient = get("CONTACT_RECIPIENT").context("CONTACT_RECIPIENT must be set")?;
        let from_address = get("CONTACT_FROM").context("CONTACT_FROM must be set")?;

        let timezone = match get("CONTACT_TIMEZONE") {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|e| anyhow!("invalid CONTACT_TIMEZONE {raw:?}: {e}"))?,
            None => chrono_tz::Asia::Tokyo,
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 127.0.0.1:3000")?;

        let transport = match get("MAIL_TRANSPORT").as_deref() {
            None | Some("sendmail") => MailTransportKind::Sendmail {
                command: get("SENDMAIL_COMMAND"),
            },
            Some("smtp") => MailTransportKind::Smtp {
                url: get("SMTP_URL").context("SMTP_URL must be set when MAIL_TRANSPORT=smtp")?,
            },
            Some(other) => bail!("unknown MAIL_TRANSPORT {other:?}, expected sendmail or smtp"),
        };

        Ok(Self {
            recipient,
            from_address,
            subject_prefix: get("CONTACT_SUBJECT_PREFIX")
                .unwrap_or_else(|| DEFAULT_SUBJECT_PREFIX.to_string()),
            log_dir: get("CONTACT_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            timezone,
            bind_addr,
            transport,
        })
    }
}
