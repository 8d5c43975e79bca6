use serde::{Deserialize, Serialize};

use crate::field::FieldErrors;

/// Machine readable failure codes carried in `DeliveryOutcome::message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeCode {
    MethodNotAllowed,
    ValidationFailed,
    MailSendFailed,
}

impl OutcomeCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            OutcomeCode::ValidationFailed => "VALIDATION_FAILED",
            OutcomeCode::MailSendFailed => "MAIL_SEND_FAILED",
        }
    }
}

/// The one response shape of the mail relay endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl DeliveryOutcome {
    pub fn sent(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
        }
    }

    pub fn failed(code: OutcomeCode) -> Self {
        Self {
            success: false,
            message: code.as_str().to_string(),
            errors: None,
        }
    }

    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::failed(OutcomeCode::ValidationFailed)
        }
    }
}
