use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    Json,
};
use common::{DeliveryOutcome, OutcomeCode};
use serde_json::json;

use crate::handlers::contact_dtos::{ContactSubmission, RawForm, RequestMeta};
use crate::utils::contact_log::ContactEventKind;
use crate::utils::contact_mail::compose_contact_mail;
use crate::utils::contact_validation::validation_errors;
use crate::AppState;

pub const SENT_MESSAGE: &str = "メールを送信しました。";

type ContactResponse = Result<Json<DeliveryOutcome>, (StatusCode, Json<DeliveryOutcome>)>;

/// Validates a contact post and mails it to the configured recipient.
///
/// Only POST is accepted. Every other step is logged to the contact log
/// before the response leaves.
pub async fn handle_contact(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> ContactResponse {
    if request.method() != Method::POST {
        return Err((
            StatusCode::METHOD_NOT_ALLOWED,
            Json(DeliveryOutcome::failed(OutcomeCode::MethodNotAllowed)),
        ));
    }

    let meta = RequestMeta::from_request(&request, state.config.timezone);
    let form = RawForm::from_request(request).await;
    let submission = ContactSubmission::from_form(&form);
    let errors = validation_errors(&submission);

    state
        .contact_log
        .record(ContactEventKind::RequestReceived, submission.log_context())
        .await;

    if !errors.is_empty() {
        state
            .contact_log
            .record(ContactEventKind::ValidationFailed, json!({ "errors": errors }))
            .await;
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(DeliveryOutcome::invalid(errors)),
        ));
    }

    let mail = compose_contact_mail(&state.config, &submission, &meta);

    match state.mailer.deliver(&mail).await {
        Ok(()) => {
            state
                .contact_log
                .record(
                    ContactEventKind::MailSent,
                    json!({
                        "recipient": state.config.recipient,
                        "name": submission.name,
                        "email": submission.email,
                        "contact_method": submission.contact_method_summary,
                    }),
                )
                .await;
            Ok(Json(DeliveryOutcome::sent(SENT_MESSAGE)))
        }
        Err(e) => {
            tracing::error!("Failed to send contact mail to {}: {}", state.config.recipient, e);
            state
                .contact_log
                .record(
                    ContactEventKind::MailSendFailed,
                    json!({
                        "recipient": state.config.recipient,
                        "name": submission.name,
                        "email": submission.email,
                        "error": e.to_string(),
                    }),
                )
                .await;
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DeliveryOutcome::failed(OutcomeCode::MailSendFailed)),
            ))
        }
    }
}
