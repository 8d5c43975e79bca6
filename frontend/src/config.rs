use crate::contact::relay::{
    RelayCredentials, PLACEHOLDER_PUBLIC_KEY, PLACEHOLDER_SERVICE_ID, PLACEHOLDER_TEMPLATE_ID,
};

#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3000"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

/// Relay credentials baked in at build time; placeholders keep the relay off.
pub fn relay_credentials() -> RelayCredentials {
    RelayCredentials::new(
        option_env!("EMAILJS_PUBLIC_KEY").unwrap_or(PLACEHOLDER_PUBLIC_KEY),
        option_env!("EMAILJS_SERVICE_ID").unwrap_or(PLACEHOLDER_SERVICE_ID),
        option_env!("EMAILJS_TEMPLATE_ID").unwrap_or(PLACEHOLDER_TEMPLATE_ID),
    )
}

/// Where the endpoint backend posts to. Defaults to our own mail relay.
pub fn contact_endpoint() -> String {
    match option_env!("CONTACT_ENDPOINT") {
        Some(endpoint) if !endpoint.trim().is_empty() => endpoint.trim().to_string(),
        _ => format!("{}/api/contact", get_backend_url()),
    }
}
