use async_trait::async_trait;
use lettre::{
    address::AddressError,
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSendmailTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mailbox {value:?}: {source}")]
    InvalidMailbox {
        value: String,
        #[source]
        source: AddressError,
    },
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("sendmail failed: {0}")]
    Sendmail(#[from] lettre::transport::sendmail::Error),
    #[error("smtp failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("invalid smtp url: {0}")]
    SmtpUrl(String),
}

/// A plain text mail ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    pub fn to_message(&self) -> Result<Message, MailError> {
        Ok(Message::builder()
            .from(parse_mailbox(&self.from)?)
            .reply_to(parse_mailbox(&self.reply_to)?)
            .to(parse_mailbox(&self.to)?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())?)
    }
}

fn parse_mailbox(value: &str) -> Result<Mailbox, MailError> {
    value.parse().map_err(|source| MailError::InvalidMailbox {
        value: value.to_string(),
        source,
    })
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// The host's `sendmail` binary.
pub struct SendmailMailer {
    transport: AsyncSendmailTransport<Tokio1Executor>,
}

impl SendmailMailer {
    pub fn new(command: Option<&str>) -> Self {
        let transport = match command {
            Some(command) => AsyncSendmailTransport::<Tokio1Executor>::new_with_command(command),
            None => AsyncSendmailTransport::<Tokio1Executor>::new(),
        };
        Self { transport }
    }
}

#[async_trait]
impl MailTransport for SendmailMailer {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = mail.to_message()?;
        self.transport.send(message).await?;
        Ok(())
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// `smtps://`, TLS from the first byte.
    Wrapper,
    /// `smtp://...?tls=required`
    StartTls,
    /// Plain `smtp://`, for local relays and test catchers.
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: Option<u16>,
    pub security: SmtpSecurity,
    pub credentials: Option<(String, String)>,
}

impl SmtpSettings {
    /// Reads `smtp[s]://[user[:password]@]host[:port][?tls=required]`.
    pub fn parse(raw: &str) -> Result<Self, MailError> {
        let url = Url::parse(raw).map_err(|e| MailError::SmtpUrl(e.to_string()))?;

        let tls_required = url
            .query_pairs()
            .any(|(key, value)| key == "tls" && value == "required");
        let security = match url.scheme() {
            "smtps" => SmtpSecurity::Wrapper,
            "smtp" if tls_required => SmtpSecurity::StartTls,
            "smtp" => SmtpSecurity::Plain,
            other => return Err(MailError::SmtpUrl(format!("unsupported scheme {other:?}"))),
        };

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| MailError::SmtpUrl("missing host".into()))?
            .to_string();

        let credentials = if url.username().is_empty() {
            None
        } else {
            Some((
                decode(url.username())?,
                decode(url.password().unwrap_or_default())?,
            ))
        };

        Ok(Self {
            host,
            port: url.port(),
            security,
            credentials,
        })
    }
}

fn decode(value: &str) -> Result<String, MailError> {
    urlencoding::decode(value)
        .map(|v| v.into_owned())
        .map_err(|e| MailError::SmtpUrl(e.to_string()))
}

impl SmtpMailer {
    pub fn from_url(url: &str) -> Result<Self, MailError> {
        Self::from_settings(&SmtpSettings::parse(url)?)
    }

    pub fn from_settings(settings: &SmtpSettings) -> Result<Self, MailError> {
        let mut builder = match settings.security {
            SmtpSecurity::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            }
            SmtpSecurity::Plain => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
            }
        };
        if let Some(port) = settings.port {
            builder = builder.port(port);
        }
        if let Some((user, password)) = &settings.credentials {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }
        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = mail.to_message()?;
        self.transport.send(message).await?;
        Ok(())
    }
}
