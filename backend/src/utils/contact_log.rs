use std::path::{Path, PathBuf};

use chrono::Utc;
use chrono_tz::Tz;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

pub const LOG_FILE_NAME: &str = "contact.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEventKind {
    RequestReceived,
    ValidationFailed,
    MailSendFailed,
    MailSent,
}

impl ContactEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactEventKind::RequestReceived => "REQUEST_RECEIVED",
            ContactEventKind::ValidationFailed => "VALIDATION_FAILED",
            ContactEventKind::MailSendFailed => "MAIL_SEND_FAILED",
            ContactEventKind::MailSent => "MAIL_SENT",
        }
    }
}

/// One line of the contact log.
#[derive(Debug, Serialize)]
pub struct ContactEvent {
    pub timestamp: String,
    pub event: &'static str,
    pub context: serde_json::Value,
}

/// Append-only JSON lines log of contact requests.
///
/// Writes are best effort: a failed write is reported through `tracing` and
/// never reaches the caller.
#[derive(Debug, Clone)]
pub struct ContactLog {
    path: Option<PathBuf>,
    timezone: Tz,
}

impl ContactLog {
    pub fn open(dir: &Path, timezone: Tz) -> Self {
        let path = match std::fs::create_dir_all(dir) {
            Ok(()) => Some(dir.join(LOG_FILE_NAME)),
            Err(e) => {
                tracing::warn!(
                    "Cannot create contact log directory {}: {}; events go to tracing only",
                    dir.display(),
                    e
                );
                None
            }
        };
        Self { path, timezone }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn record(&self, kind: ContactEventKind, context: serde_json::Value) {
        let event = ContactEvent {
            timestamp: Utc::now()
                .with_timezone(&self.timezone)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            event: kind.as_str(),
            context,
        };

        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(_) => format!("[{}] {}", event.timestamp, event.event),
        };
        tracing::info!(event = event.event, "{}", line);

        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = append_line(path, &line).await {
            tracing::warn!("Failed to append to contact log {}: {}", path.display(), e);
        }
    }
}

async fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    // one write per line keeps concurrent appends from interleaving
    file.write_all(format!("{line}\n").as_bytes()).await?;
    file.flush().await
}

/// Cuts `message` to at most `max_width` display columns, ending with `…`
/// when anything was dropped. East Asian wide characters take two columns.
pub fn message_preview(message: &str, max_width: usize) -> String {
    const MARKER: char = '…';

    if display_width(message) <= max_width {
        return message.to_string();
    }

    let budget = max_width.saturating_sub(char_width(MARKER));
    let mut used = 0;
    let mut preview = String::new();
    for c in message.chars() {
        let w = char_width(c);
        if used + w > budget {
            break;
        }
        used += w;
        preview.push(c);
    }
    preview.push(MARKER);
    preview
}

fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

fn char_width(c: char) -> usize {
    match c as u32 {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1FAFF
        | 0x20000..=0x2FFFD
        | 0x30000..=0x3FFFD => 2,
        _ => 1,
    }
}
