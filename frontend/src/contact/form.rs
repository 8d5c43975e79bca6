use std::rc::Rc;

use common::Field;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::config;
use crate::contact::controller::{FormController, FormState, StatusKind, SubmitAction};
use crate::contact::delivery::{DeliveryError, Dispatcher};
use crate::contact::endpoint::{EndpointBackend, GlooTransport};
use crate::contact::fields::RawFormInput;
use crate::contact::relay::{EmailJs, RelayBackend};

pub enum ContactFormMsg {
    SetText(Field, String),
    SetAgreement(bool),
    SetContactMethod(String, bool),
    Submit,
    Edit,
    Delivered(Result<(), DeliveryError>),
}

pub struct ContactForm {
    controller: FormController,
    input: RawFormInput,
    dispatcher: Rc<Dispatcher<EmailJs, GlooTransport>>,
}

impl ContactForm {
    fn text_input(&self, ctx: &Context<Self>, field: Field, label: &str, kind: &str, value: &str) -> Html {
        let id = format!("contact-{}", field.as_str());
        html! {
            <div class="contact-field">
                <label for={id.clone()}>{ label.to_string() }</label>
                <input
                    id={id}
                    type={kind.to_string()}
                    name={field.as_str()}
                    value={value.to_string()}
                    oninput={ctx.link().callback(move |e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        ContactFormMsg::SetText(field, input.value())
                    })}
                />
                { self.error_region(field) }
            </div>
        }
    }

    fn error_region(&self, field: Field) -> Html {
        let message = self.controller.errors().get(field).unwrap_or_default();
        html! {
            <p class="contact-error" data-error-for={field.as_str()} aria-live="polite">
                { message.to_string() }
            </p>
        }
    }

    fn contact_method_box(&self, ctx: &Context<Self>, value: &'static str, label: &str) -> Html {
        html! {
            <label class="contact-method">
                <input
                    type="checkbox"
                    name="contact_method[]"
                    value={value}
                    checked={self.input.has_contact_method(value)}
                    onchange={ctx.link().callback(move |e: Event| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        ContactFormMsg::SetContactMethod(value.to_string(), input.checked())
                    })}
                />
                { label.to_string() }
            </label>
        }
    }

    fn confirmation_panel(&self, ctx: &Context<Self>) -> Html {
        let Some(view) = self.controller.confirmation() else {
            return html! {};
        };
        let slots = [
            (Field::Name, "お名前"),
            (Field::Email, "メールアドレス"),
            (Field::Phone, "お電話番号"),
            (Field::ContactMethod, "ご希望の連絡方法"),
            (Field::Message, "ご相談内容"),
        ];
        html! {
            <div class="contact-confirm">
                <dl>
                    { for slots.iter().map(|(field, label)| html! {
                        <>
                            <dt>{ label.to_string() }</dt>
                            <dd data-confirm={field.as_str()}>{ view.slot(*field).to_string() }</dd>
                        </>
                    }) }
                </dl>
                <button
                    type="button"
                    class="contact-edit"
                    disabled={self.controller.state() == FormState::Submitting}
                    onclick={ctx.link().callback(|_| ContactFormMsg::Edit)}
                >
                    { "修正する" }
                </button>
            </div>
        }
    }
}

impl Component for ContactForm {
    type Message = ContactFormMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let dispatcher = Dispatcher::new(
            RelayBackend::new(config::relay_credentials(), EmailJs),
            EndpointBackend::new(Some(config::contact_endpoint()), GlooTransport),
        );
        Self {
            controller: FormController::new(),
            input: RawFormInput::default(),
            dispatcher: Rc::new(dispatcher),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ContactFormMsg::SetText(field, value) => {
                self.input.set_text(field, value);
                self.controller.field_edited(field);
                true
            }
            ContactFormMsg::SetAgreement(checked) => {
                self.input.agreement = checked;
                self.controller.field_edited(Field::Agreement);
                true
            }
            ContactFormMsg::SetContactMethod(value, checked) => {
                self.input.set_contact_method(&value, checked);
                self.controller.field_edited(Field::ContactMethod);
                true
            }
            ContactFormMsg::Submit => match self.controller.submit(&self.input) {
                SubmitAction::Deliver(fields) => {
                    let dispatcher = self.dispatcher.clone();
                    ctx.link().send_future(async move {
                        ContactFormMsg::Delivered(dispatcher.deliver(&fields).await)
                    });
                    true
                }
                SubmitAction::Busy => false,
                SubmitAction::Invalid | SubmitAction::Confirm => true,
            },
            ContactFormMsg::Edit => {
                self.controller.edit();
                true
            }
            ContactFormMsg::Delivered(result) => {
                if self.controller.delivery_finished(result) {
                    self.input = RawFormInput::default();
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let state = self.controller.state();
        let status = self.controller.status();
        let status_class = match status.kind {
            StatusKind::Neutral => "contact-status",
            StatusKind::Success => "contact-status is-success",
            StatusKind::Error => "contact-status is-error",
        };
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            ContactFormMsg::Submit
        });
        let submit_label = match state {
            FormState::Input => "確認する",
            FormState::Confirm => "送信する",
            FormState::Submitting => "送信中…",
        };

        html! {
            <form class={classes!("contact-form", format!("is-{:?}", state).to_lowercase())} novalidate=true {onsubmit}>
                <div class="contact-inputs" hidden={state != FormState::Input}>
                    { self.text_input(ctx, Field::Name, "お名前", "text", &self.input.name) }
                    { self.text_input(ctx, Field::Email, "メールアドレス", "email", &self.input.email) }
                    { self.text_input(ctx, Field::Phone, "お電話番号", "tel", &self.input.phone) }
                    <fieldset class="contact-field">
                        <legend>{ "ご希望の連絡方法" }</legend>
                        { self.contact_method_box(ctx, "phone", "電話") }
                        { self.contact_method_box(ctx, "email", "メール") }
                        { self.error_region(Field::ContactMethod) }
                    </fieldset>
                    <div class="contact-field">
                        <label for="contact-message">{ "ご相談内容" }</label>
                        <textarea
                            id="contact-message"
                            name="message"
                            value={self.input.message.clone()}
                            oninput={ctx.link().callback(|e: InputEvent| {
                                let input: HtmlTextAreaElement = e.target_unchecked_into();
                                ContactFormMsg::SetText(Field::Message, input.value())
                            })}
                        />
                        { self.error_region(Field::Message) }
                    </div>
                    <div class="contact-field">
                        <label>
                            <input
                                type="checkbox"
                                name="agreement"
                                checked={self.input.agreement}
                                onchange={ctx.link().callback(|e: Event| {
                                    let input: HtmlInputElement = e.target_unchecked_into();
                                    ContactFormMsg::SetAgreement(input.checked())
                                })}
                            />
                            { "個人情報の取り扱いに同意する" }
                        </label>
                        { self.error_region(Field::Agreement) }
                    </div>
                </div>

                { self.confirmation_panel(ctx) }

                <p class={status_class} role="status" aria-live="polite">{ status.message.clone() }</p>

                <button type="submit" disabled={state == FormState::Submitting}>
                    { submit_label }
                </button>
            </form>
        }
    }
}
