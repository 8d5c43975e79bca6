use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequest, Multipart, Request},
    http::header,
    Form,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use common::rules::{self, NO_PREFERENCE, UNKNOWN};
use serde_json::json;

use crate::utils::contact_log::message_preview;

/// Width of the message excerpt written to the contact log.
pub const MESSAGE_PREVIEW_WIDTH: usize = 120;

/// Posted form fields, every value kept in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RawForm {
    values: HashMap<String, Vec<String>>,
}

impl RawForm {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            form.push(key.into(), value.into());
        }
        form
    }

    /// Reads a multipart or urlencoded body. Anything unreadable yields an
    /// empty form, which then fails validation like any other blank post.
    pub async fn from_request(request: Request) -> Self {
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            match Multipart::from_request(request, &()).await {
                Ok(multipart) => Self::from_multipart(multipart).await,
                Err(e) => {
                    tracing::warn!("Rejected multipart contact body: {}", e);
                    Self::default()
                }
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            match Form::<Vec<(String, String)>>::from_request(request, &()).await {
                Ok(Form(pairs)) => Self::from_pairs(pairs),
                Err(e) => {
                    tracing::warn!("Rejected urlencoded contact body: {}", e);
                    Self::default()
                }
            }
        } else {
            tracing::warn!("Contact post with unsupported content type {:?}", content_type);
            Self::default()
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Self {
        let mut form = Self::default();
        loop {
            match multipart.next_field().await {
                Ok(Some(field)) => {
                    let Some(name) = field.name().map(str::to_string) else {
                        continue;
                    };
                    // uploads have no place in a contact message
                    if field.file_name().is_some() {
                        continue;
                    }
                    match field.text().await {
                        Ok(text) => form.push(name, text),
                        Err(e) => {
                            tracing::warn!("Unreadable multipart field {}: {}", name, e);
                            break;
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Malformed multipart contact body: {}", e);
                    break;
                }
            }
        }
        form
    }

    fn push(&mut self, key: String, value: String) {
        // `contact_method[]` and `contact_method` are the same field
        let key = key.strip_suffix("[]").map(str::to_string).unwrap_or(key);
        self.values.entry(key).or_default().push(value);
    }

    /// First value of a field, untouched.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// First value of a field, trimmed; empty when the field is missing.
    pub fn value(&self, key: &str) -> String {
        self.raw(key).map(|v| v.trim().to_string()).unwrap_or_default()
    }
}

/// The fields of one contact post after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub contact_method_summary: String,
    pub agreement: bool,
}

impl ContactSubmission {
    pub fn from_form(form: &RawForm) -> Self {
        let summary = form.value("contact_method_summary");
        Self {
            name: form.value("name"),
            email: form.value("email"),
            phone: form.value("phone"),
            message: form.value("message"),
            contact_method_summary: if summary.is_empty() {
                NO_PREFERENCE.to_string()
            } else {
                summary
            },
            agreement: form.raw("agreement").is_some_and(rules::is_agreement_token),
        }
    }

    pub fn phone_or_placeholder(&self) -> &str {
        rules::or_not_entered(&self.phone)
    }

    /// Context for the `REQUEST_RECEIVED` log event.
    pub fn log_context(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "email": self.email,
            "phone": self.phone_or_placeholder(),
            "contact_method": self.contact_method_summary,
            "agreement": if self.agreement { "accepted" } else { "missing" },
            "message_preview": message_preview(&self.message, MESSAGE_PREVIEW_WIDTH),
        })
    }
}

/// Facts about the request that end up in the mail footer.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub received_at: DateTime<Tz>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    pub fn from_request(request: &Request, timezone: Tz) -> Self {
        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .filter(|v| !v.is_empty());

        Self {
            received_at: Utc::now().with_timezone(&timezone),
            client_ip,
            user_agent,
        }
    }

    pub fn received_at_display(&self) -> String {
        self.received_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn client_ip_or_unknown(&self) -> &str {
        self.client_ip.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn user_agent_or_unknown(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(UNKNOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn multi_value_fields_take_the_first() {
        let form = RawForm::from_pairs([
            ("name", "  田中太郎 "),
            ("name", "ignored"),
            ("contact_method[]", "phone"),
        ]);
        assert_eq!(form.value("name"), "田中太郎");
        assert_eq!(form.value("contact_method"), "phone");
        assert_eq!(form.value("missing"), "");
    }

    #[test]
    fn agreement_follows_checkbox_convention() {
        let on = ContactSubmission::from_form(&RawForm::from_pairs([("agreement", "on")]));
        let one = ContactSubmission::from_form(&RawForm::from_pairs([("agreement", "1")]));
        let yes = ContactSubmission::from_form(&RawForm::from_pairs([("agreement", "yes")]));
        let absent = ContactSubmission::from_form(&RawForm::default());

        assert!(on.agreement);
        assert!(one.agreement);
        assert!(!yes.agreement);
        assert!(!absent.agreement);
    }

    #[test]
    fn blank_summary_defaults() {
        let submission = ContactSubmission::from_form(&RawForm::from_pairs([
            ("contact_method_summary", " "),
        ]));
        assert_eq!(submission.contact_method_summary, NO_PREFERENCE);
    }

    #[test]
    fn log_context_marks_missing_values() {
        let submission = ContactSubmission::from_form(&RawForm::from_pairs([
            ("name", "田中太郎"),
            ("email", "t@example.com"),
            ("message", "相談したいです"),
        ]));
        let context = submission.log_context();
        assert_eq!(context["phone"], "未入力");
        assert_eq!(context["agreement"], "missing");
        assert_eq!(context["message_preview"], "相談したいです");
    }

    #[tokio::test]
    async fn reads_urlencoded_body() {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=%E7%94%B0%E4%B8%AD&agreement=on&contact_method%5B%5D=email"))
            .unwrap();

        let form = RawForm::from_request(request).await;
        assert_eq!(form.value("name"), "田中");
        assert_eq!(form.raw("agreement"), Some("on"));
        assert_eq!(form.value("contact_method"), "email");
    }

    #[tokio::test]
    async fn unknown_content_type_is_empty() {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"x"}"#))
            .unwrap();

        let form = RawForm::from_request(request).await;
        assert_eq!(form.raw("name"), None);
    }

    #[test]
    fn meta_defaults_to_unknown() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let meta = RequestMeta::from_request(&request, chrono_tz::Asia::Tokyo);
        assert_eq!(meta.client_ip_or_unknown(), UNKNOWN);
        assert_eq!(meta.user_agent_or_unknown(), UNKNOWN);
        assert_eq!(meta.received_at_display().len(), "2024-01-01 00:00:00".len());
    }
}
