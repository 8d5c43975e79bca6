//! Third party email relay (EmailJS) called straight from the browser.

use std::cell::Cell;

use common::contact_method;
use common::rules;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::contact::delivery::{DeliveryBackend, DeliveryError};
use crate::contact::fields::FormFieldSet;

pub const PLACEHOLDER_PUBLIC_KEY: &str = "YOUR_PUBLIC_KEY";
pub const PLACEHOLDER_SERVICE_ID: &str = "YOUR_SERVICE_ID";
pub const PLACEHOLDER_TEMPLATE_ID: &str = "YOUR_TEMPLATE_ID";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayCredentials {
    pub public_key: String,
    pub service_id: String,
    pub template_id: String,
}

impl RelayCredentials {
    pub fn new(
        public_key: impl Into<String>,
        service_id: impl Into<String>,
        template_id: impl Into<String>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            service_id: service_id.into(),
            template_id: template_id.into(),
        }
    }

    pub fn placeholders() -> Self {
        Self::new(PLACEHOLDER_PUBLIC_KEY, PLACEHOLDER_SERVICE_ID, PLACEHOLDER_TEMPLATE_ID)
    }

    /// True only when none of the three values is still a placeholder.
    pub fn is_configured(&self) -> bool {
        self.public_key != PLACEHOLDER_PUBLIC_KEY
            && self.service_id != PLACEHOLDER_SERVICE_ID
            && self.template_id != PLACEHOLDER_TEMPLATE_ID
    }
}

/// Named parameters the relay template expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub name: String,
    pub email: String,
    pub tel: String,
    pub message: String,
    pub contact_method: String,
}

impl TemplateParams {
    pub fn from_fields(fields: &FormFieldSet) -> Self {
        Self {
            name: fields.name.clone(),
            email: fields.email.clone(),
            tel: rules::or_not_entered(&fields.phone).to_string(),
            message: fields.message.clone(),
            contact_method: contact_method::summary_or_default(&fields.contact_methods),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait RelayClient {
    /// Whether the relay SDK is present on the page.
    fn is_loaded(&self) -> bool;
    fn init(&self, public_key: &str);
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<(), String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayInit {
    Uninitialized,
    Ready,
}

pub struct RelayBackend<C> {
    credentials: RelayCredentials,
    client: C,
    init: Cell<RelayInit>,
}

impl<C: RelayClient> RelayBackend<C> {
    pub fn new(credentials: RelayCredentials, client: C) -> Self {
        Self {
            credentials,
            client,
            init: Cell::new(RelayInit::Uninitialized),
        }
    }

    pub fn is_available(&self) -> bool {
        self.credentials.is_configured() && self.client.is_loaded()
    }

    pub fn init_state(&self) -> RelayInit {
        self.init.get()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn ensure_initialized(&self) {
        if self.init.get() == RelayInit::Uninitialized {
            self.client.init(&self.credentials.public_key);
            self.init.set(RelayInit::Ready);
        }
    }
}

impl<C: RelayClient> DeliveryBackend for RelayBackend<C> {
    async fn send(&self, fields: &FormFieldSet) -> Result<(), DeliveryError> {
        if !self.is_available() {
            return Err(DeliveryError::RelayRejected("relay is not configured".into()));
        }
        self.ensure_initialized();

        let params = TemplateParams::from_fields(fields);
        self.client
            .send(&self.credentials.service_id, &self.credentials.template_id, &params)
            .await
            .map_err(DeliveryError::RelayRejected)
    }
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = emailjs, js_name = init)]
    fn emailjs_init(public_key: &str);

    #[wasm_bindgen(js_namespace = emailjs, js_name = send, catch)]
    async fn emailjs_send(
        service_id: &str,
        template_id: &str,
        params: JsValue,
    ) -> Result<JsValue, JsValue>;
}

/// The EmailJS browser SDK loaded as `window.emailjs`.
pub struct EmailJs;

impl RelayClient for EmailJs {
    fn is_loaded(&self) -> bool {
        web_sys::window()
            .and_then(|window| js_sys::Reflect::has(&window, &JsValue::from_str("emailjs")).ok())
            .unwrap_or(false)
    }

    fn init(&self, public_key: &str) {
        emailjs_init(public_key);
    }

    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<(), String> {
        let params = serde_wasm_bindgen::to_value(params).map_err(|e| e.to_string())?;
        emailjs_send(service_id, template_id, params)
            .await
            .map(|_| ())
            .map_err(|e| format!("{:?}", e))
    }
}
