//! Two step contact form: fill in, review, send.
//!
//! The controller never touches the DOM or the network. It answers each
//! submit with a [`SubmitAction`] and the component carries it out, then
//! reports the delivery result back through [`FormController::delivery_finished`].

use common::{Field, FieldErrors};

use crate::contact::delivery::DeliveryError;
use crate::contact::fields::{FormFieldSet, RawFormInput};
use crate::contact::preview::ConfirmationView;
use crate::contact::validation::validation_errors;

pub const CHECK_INPUT_MESSAGE: &str = "入力内容をご確認ください。";
pub const CONFIRM_PROMPT_MESSAGE: &str =
    "入力内容をご確認ください。内容に問題なければ送信ボタンを押してください。";
pub const SENDING_MESSAGE: &str = "送信中です…";
pub const SENT_MESSAGE: &str = "送信が完了しました。担当者より折り返しご連絡いたします。";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormState {
    Input,
    Confirm,
    /// A delivery is in flight; further submits are ignored.
    Submitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Neutral,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn none() -> Self {
        Self::neutral("")
    }

    pub fn neutral(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: StatusKind::Neutral,
        }
    }

    pub fn success(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: StatusKind::Error,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitAction {
    /// Validation failed; errors and status are set.
    Invalid,
    /// Moved to the review step.
    Confirm,
    /// Reviewed and revalidated; hand these fields to a delivery backend.
    Deliver(FormFieldSet),
    /// A previous delivery has not finished yet.
    Busy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormController {
    state: FormState,
    errors: FieldErrors,
    status: Status,
    confirmation: Option<ConfirmationView>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            state: FormState::Input,
            errors: FieldErrors::new(),
            status: Status::none(),
            confirmation: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn confirmation(&self) -> Option<&ConfirmationView> {
        self.confirmation.as_ref()
    }

    /// Handles a submit of the form. Fields are re-read and revalidated on
    /// every call, including the one from the review step.
    pub fn submit(&mut self, raw: &RawFormInput) -> SubmitAction {
        if self.state == FormState::Submitting {
            log::warn!("Ignoring submit while a delivery is in flight");
            return SubmitAction::Busy;
        }

        self.errors.clear_all();
        self.status = Status::none();

        let fields = FormFieldSet::extract(raw);
        let errors = validation_errors(&fields);
        if !errors.is_empty() {
            self.errors = errors;
            self.status = Status::error(CHECK_INPUT_MESSAGE);
            return SubmitAction::Invalid;
        }

        match self.state {
            FormState::Input => {
                self.confirmation = Some(ConfirmationView::render(&fields));
                self.state = FormState::Confirm;
                self.status = Status::neutral(CONFIRM_PROMPT_MESSAGE);
                SubmitAction::Confirm
            }
            FormState::Confirm => {
                self.state = FormState::Submitting;
                self.status = Status::neutral(SENDING_MESSAGE);
                SubmitAction::Deliver(fields)
            }
            FormState::Submitting => SubmitAction::Busy,
        }
    }

    /// Back from the review step to the inputs. Entered values are untouched.
    pub fn edit(&mut self) {
        if self.state == FormState::Submitting {
            return;
        }
        self.state = FormState::Input;
        self.confirmation = None;
        self.status = Status::none();
    }

    /// The visitor changed `field`; drop its error without revalidating.
    pub fn field_edited(&mut self, field: Field) {
        self.errors.clear(field);
    }

    /// Applies a delivery result. Returns true when the inputs should be cleared.
    pub fn delivery_finished(&mut self, result: Result<(), DeliveryError>) -> bool {
        match result {
            Ok(()) => {
                self.state = FormState::Input;
                self.confirmation = None;
                self.status = Status::success(SENT_MESSAGE);
                true
            }
            Err(e) => {
                self.state = FormState::Confirm;
                self.status = Status::error(e.user_message());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::contact::delivery::tests::{FakeRelay, FakeTransport};
    use crate::contact::delivery::{Dispatcher, NOT_CONFIGURED_MESSAGE, SEND_FAILED_MESSAGE};
    use crate::contact::endpoint::EndpointBackend;
    use crate::contact::relay::{RelayBackend, RelayCredentials};

    fn scenario_input() -> RawFormInput {
        RawFormInput {
            name: "田中太郎".into(),
            email: "t@example.com".into(),
            phone: String::new(),
            message: "相談したいです".into(),
            agreement: true,
            contact_methods: Vec::new(),
        }
    }

    #[test]
    fn starts_in_input() {
        let controller = FormController::new();
        assert_eq!(controller.state(), FormState::Input);
        assert!(controller.confirmation().is_none());
        assert_eq!(controller.status(), &Status::none());
    }

    #[test]
    fn missing_required_fields_block_confirmation() {
        let breakers: [fn(&mut RawFormInput); 4] = [
            |raw| raw.name = "   ".into(),
            |raw| raw.email.clear(),
            |raw| raw.message.clear(),
            |raw| raw.agreement = false,
        ];
        for breaker in breakers {
            let mut raw = scenario_input();
            breaker(&mut raw);
            let mut controller = FormController::new();

            assert_eq!(controller.submit(&raw), SubmitAction::Invalid);
            assert_eq!(controller.state(), FormState::Input);
            assert!(!controller.errors().is_empty());
            assert_eq!(controller.status(), &Status::error(CHECK_INPUT_MESSAGE));
        }
    }

    #[test]
    fn valid_input_moves_to_confirm_with_preview() {
        let mut controller = FormController::new();
        assert_eq!(controller.submit(&scenario_input()), SubmitAction::Confirm);
        assert_eq!(controller.state(), FormState::Confirm);

        let view = controller.confirmation().unwrap();
        assert_eq!(view.slot(Field::Name), "田中太郎");
        assert_eq!(view.slot(Field::Email), "t@example.com");
        assert_eq!(view.slot(Field::Phone), "未入力");
        assert_eq!(view.slot(Field::Message), "相談したいです");
        assert_eq!(controller.status(), &Status::neutral(CONFIRM_PROMPT_MESSAGE));
    }

    #[test]
    fn second_submit_revalidates() {
        let mut controller = FormController::new();
        let mut raw = scenario_input();
        controller.submit(&raw);

        // autofill or similar changed the inputs behind the review step
        raw.email = "foo@bar".into();
        assert_eq!(controller.submit(&raw), SubmitAction::Invalid);
        assert_eq!(controller.state(), FormState::Confirm);
        assert!(controller.errors().contains(Field::Email));
    }

    #[test]
    fn edit_round_trip_keeps_values() {
        let raw = scenario_input();
        let mut controller = FormController::new();
        controller.submit(&raw);
        let first = controller.confirmation().cloned();

        controller.edit();
        assert_eq!(controller.state(), FormState::Input);
        assert!(controller.confirmation().is_none());

        controller.submit(&raw);
        assert_eq!(controller.confirmation().cloned(), first);
        assert_eq!(raw, scenario_input());
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut controller = FormController::new();
        controller.submit(&RawFormInput::default());
        assert!(controller.errors().contains(Field::Name));
        assert!(controller.errors().contains(Field::Agreement));

        controller.field_edited(Field::Agreement);
        assert!(!controller.errors().contains(Field::Agreement));
        assert!(controller.errors().contains(Field::Name));
        assert_eq!(controller.state(), FormState::Input);
    }

    #[test]
    fn confirmed_submit_delivers_and_blocks_reentry() {
        let raw = scenario_input();
        let mut controller = FormController::new();
        controller.submit(&raw);

        match controller.submit(&raw) {
            SubmitAction::Deliver(fields) => assert_eq!(fields.name, "田中太郎"),
            other => panic!("expected delivery, got {:?}", other),
        }
        assert_eq!(controller.state(), FormState::Submitting);
        assert_eq!(controller.status(), &Status::neutral(SENDING_MESSAGE));

        assert_eq!(controller.submit(&raw), SubmitAction::Busy);
        controller.edit();
        assert_eq!(controller.state(), FormState::Submitting);
    }

    #[test]
    fn success_resets_to_input() {
        let raw = scenario_input();
        let mut controller = FormController::new();
        controller.submit(&raw);
        controller.submit(&raw);

        assert!(controller.delivery_finished(Ok(())));
        assert_eq!(controller.state(), FormState::Input);
        assert!(controller.confirmation().is_none());
        assert_eq!(controller.status(), &Status::success(SENT_MESSAGE));
    }

    #[test]
    fn failure_stays_in_confirm_and_can_retry() {
        let raw = scenario_input();
        let mut controller = FormController::new();
        controller.submit(&raw);
        controller.submit(&raw);

        assert!(!controller.delivery_finished(Err(DeliveryError::SubmitFailed("status 500".into()))));
        assert_eq!(controller.state(), FormState::Confirm);
        assert_eq!(controller.status(), &Status::error(SEND_FAILED_MESSAGE));
        assert!(matches!(controller.submit(&raw), SubmitAction::Deliver(_)));
    }

    #[test]
    fn unconfigured_endpoint_surfaces_configuration_error() {
        let dispatcher = Dispatcher::new(
            RelayBackend::new(RelayCredentials::placeholders(), FakeRelay::default()),
            EndpointBackend::new(
                Some("https://formspree.io/f/{your-id}".into()),
                FakeTransport::answering(200),
            ),
        );
        let raw = scenario_input();
        let mut controller = FormController::new();

        assert_eq!(controller.submit(&raw), SubmitAction::Confirm);
        assert_eq!(controller.confirmation().unwrap().phone, "未入力");

        let SubmitAction::Deliver(fields) = controller.submit(&raw) else {
            panic!("expected delivery");
        };
        let result = block_on(dispatcher.deliver(&fields));
        assert_eq!(result, Err(DeliveryError::EndpointNotConfigured));

        let reset = controller.delivery_finished(result);
        assert!(!reset);
        assert_eq!(controller.state(), FormState::Confirm);
        assert_eq!(controller.status(), &Status::error(NOT_CONFIGURED_MESSAGE));
    }
}
