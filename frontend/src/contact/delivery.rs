use thiserror::Error;

use crate::contact::endpoint::{EndpointBackend, FormTransport};
use crate::contact::fields::FormFieldSet;
use crate::contact::relay::{RelayBackend, RelayClient};

pub const NOT_CONFIGURED_MESSAGE: &str =
    "送信設定が完了していません。送信先の接続設定をご確認ください。";
pub const SEND_FAILED_MESSAGE: &str = "送信に失敗しました。お手数ですが再度お試しください。";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("FORM_ENDPOINT_NOT_CONFIGURED")]
    EndpointNotConfigured,
    #[error("FORM_SUBMIT_FAILED: {0}")]
    SubmitFailed(String),
    #[error("relay rejected the message: {0}")]
    RelayRejected(String),
}

impl DeliveryError {
    /// The only text a visitor ever sees for a failed delivery.
    pub fn user_message(&self) -> &'static str {
        match self {
            DeliveryError::EndpointNotConfigured => NOT_CONFIGURED_MESSAGE,
            DeliveryError::SubmitFailed(_) | DeliveryError::RelayRejected(_) => SEND_FAILED_MESSAGE,
        }
    }
}

/// Something that can get a validated message to its recipient.
#[allow(async_fn_in_trait)]
pub trait DeliveryBackend {
    async fn send(&self, fields: &FormFieldSet) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryRoute {
    Relay,
    Endpoint,
}

/// Picks exactly one backend per submission. There is no fallback from the
/// relay to the endpoint when the relay fails.
pub struct Dispatcher<C, T> {
    relay: RelayBackend<C>,
    endpoint: EndpointBackend<T>,
}

impl<C: RelayClient, T: FormTransport> Dispatcher<C, T> {
    pub fn new(relay: RelayBackend<C>, endpoint: EndpointBackend<T>) -> Self {
        Self { relay, endpoint }
    }

    pub fn route(&self) -> DeliveryRoute {
        if self.relay.is_available() {
            DeliveryRoute::Relay
        } else {
            DeliveryRoute::Endpoint
        }
    }

    pub async fn deliver(&self, fields: &FormFieldSet) -> Result<(), DeliveryError> {
        let route = self.route();
        log::info!("Delivering contact form via {:?}", route);
        let result = match route {
            DeliveryRoute::Relay => self.relay.send(fields).await,
            DeliveryRoute::Endpoint => self.endpoint.send(fields).await,
        };
        if let Err(e) = &result {
            log::error!("Contact delivery failed: {}", e);
        }
        result
    }
}
