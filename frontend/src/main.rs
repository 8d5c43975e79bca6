use log::{info, Level};
use yew::prelude::*;

mod config;
mod contact {
    pub mod controller;
    pub mod delivery;
    pub mod endpoint;
    pub mod fields;
    pub mod form;
    pub mod preview;
    pub mod relay;
    pub mod validation;
}

use contact::form::ContactForm;

#[function_component]
fn App() -> Html {
    html! {
        <main class="contact-page">
            <h1>{ "お問い合わせ" }</h1>
            <ContactForm />
        </main>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting contact form");
    yew::Renderer::<App>::new().render();
}
