//! Posts the form to an HTTP endpoint, normally our own mail relay.

use common::rules::AGREEMENT_CHECKED;
use common::Field;
use gloo_net::http::Request;
use web_sys::FormData;

use crate::contact::delivery::{DeliveryBackend, DeliveryError};
use crate::contact::fields::FormFieldSet;

/// Left in the endpoint URL until someone fills in the real form id.
pub const ENDPOINT_PLACEHOLDER_TOKEN: &str = "{your-id}";

#[allow(async_fn_in_trait)]
pub trait FormTransport {
    /// Sends `entries` as multipart form data, returning the HTTP status.
    async fn post_form(&self, url: &str, entries: &[(String, String)]) -> Result<u16, String>;
}

pub struct EndpointBackend<T> {
    action: Option<String>,
    transport: T,
}

impl<T: FormTransport> EndpointBackend<T> {
    pub fn new(action: Option<String>, transport: T) -> Self {
        Self { action, transport }
    }

    pub fn destination(&self) -> Result<&str, DeliveryError> {
        match self.action.as_deref().map(str::trim) {
            Some(action) if !action.is_empty() && !action.contains(ENDPOINT_PLACEHOLDER_TOKEN) => {
                Ok(action)
            }
            _ => Err(DeliveryError::EndpointNotConfigured),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: FormTransport> DeliveryBackend for EndpointBackend<T> {
    async fn send(&self, fields: &FormFieldSet) -> Result<(), DeliveryError> {
        let url = self.destination()?;
        let status = self
            .transport
            .post_form(url, &form_entries(fields))
            .await
            .map_err(DeliveryError::SubmitFailed)?;

        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(DeliveryError::SubmitFailed(format!("status {status}")))
        }
    }
}

/// The body the mail relay expects, one entry per form value.
pub fn form_entries(fields: &FormFieldSet) -> Vec<(String, String)> {
    let mut entries = vec![
        (Field::Name.as_str().to_string(), fields.name.clone()),
        (Field::Email.as_str().to_string(), fields.email.clone()),
        (Field::Phone.as_str().to_string(), fields.phone.clone()),
        (Field::Message.as_str().to_string(), fields.message.clone()),
    ];
    for method in &fields.contact_methods {
        entries.push((Field::ContactMethod.as_str().to_string(), method.value().to_string()));
    }
    entries.push(("contact_method_summary".to_string(), fields.contact_method_summary()));
    if fields.agreement {
        entries.push((Field::Agreement.as_str().to_string(), AGREEMENT_CHECKED.to_string()));
    }
    entries
}

/// Browser `fetch` through gloo-net.
pub struct GlooTransport;

impl FormTransport for GlooTransport {
    async fn post_form(&self, url: &str, entries: &[(String, String)]) -> Result<u16, String> {
        let data = FormData::new().map_err(|e| format!("{:?}", e))?;
        for (key, value) in entries {
            data.append_with_str(key, value)
                .map_err(|e| format!("{:?}", e))?;
        }

        let response = Request::post(url)
            .header("Accept", "application/json")
            .body(data)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Ok(response.status())
    }
}
