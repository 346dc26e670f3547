//! Client-side behavior for a risk-based-authentication login page.
//!
//! Two components, sequenced on page-ready and otherwise independent:
//!
//! - **Channel Keeper** ([`channel`]): opens one full-duplex message
//!   channel per page load, targeted at the page's own host and path
//!   under a fixed `/ws` namespace, and echoes every inbound message
//!   verbatim. The server measures round-trip times over the echoes for
//!   its risk scoring; the client's whole job is the echo. Lifecycle is
//!   reported through `tracing` only — a lost channel never blocks or
//!   alters the login flow the user is completing.
//! - **Form Mode Controller** ([`form`]): reads the passcode input's
//!   hidden/visible presentation once and renders either the direct
//!   password UI or the passcode-verification UI with its one-shot
//!   resend affordance.
//!
//! The crate has no process boundary of its own: a host environment
//! builds the [`Document`] from the server-rendered markup, constructs
//! the [`PageLocation`], and calls [`on_page_ready`] exactly once from
//! within a tokio runtime.

pub mod channel;
pub mod config;
pub mod document;
pub mod error;
pub mod form;
pub mod location;

pub use config::ClientConfig;
pub use document::{Document, NodeId, Presentation};
pub use error::Error;
pub use form::{FormController, FormMode, ResendState};
pub use location::PageLocation;

/// Page-ready entry point, the equivalent of a `DOMContentLoaded`
/// handler: open the channel (fire-and-forget) and render the correct
/// login mode.
///
/// The channel's result is intentionally not consumed; channel failures
/// are logged and never affect the returned controller. Errors come only
/// from the form side, when the document violates the markup contract.
pub fn on_page_ready(
    doc: &mut Document,
    location: &PageLocation,
    config: &ClientConfig,
) -> Result<FormController, Error> {
    channel::open(location, config);
    form::initialize(doc, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_page(passcode_hidden: bool) -> Document {
        let mut doc = Document::new();
        let title = doc.create("h3");
        doc.element_mut(title).class = Some("login-title".to_string());
        let form = doc.create("form");
        doc.element_mut(form).action = Some("/auth/login/".to_string());
        let passcode = doc.create("input");
        doc.element_mut(passcode).id = Some("id_passcode".to_string());
        doc.element_mut(passcode).presentation = Some(if passcode_hidden {
            Presentation::Hidden
        } else {
            Presentation::Visible
        });
        doc.append(form, passcode);
        let submit = doc.create("button");
        doc.element_mut(submit).id = Some("loginBtn".to_string());
        doc.append(form, submit);
        doc
    }

    #[tokio::test]
    async fn test_on_page_ready_initializes_form_even_when_channel_fails() {
        // Nothing listens on the derived channel target; the connect
        // failure is logged and must not surface here.
        let mut doc = login_page(true);
        let location = PageLocation::new(false, "127.0.0.1:1", "/auth/login/");
        let controller = on_page_ready(&mut doc, &location, &ClientConfig::default()).unwrap();
        assert_eq!(controller.mode(), FormMode::DirectLogin);
    }

    #[tokio::test]
    async fn test_on_page_ready_verify_mode() {
        let mut doc = login_page(false);
        let location = PageLocation::new(false, "127.0.0.1:1", "/auth/login/");
        let controller = on_page_ready(&mut doc, &location, &ClientConfig::default()).unwrap();
        assert_eq!(controller.mode(), FormMode::VerifyIdentity);
        assert_eq!(controller.resend_state(), Some(ResendState::Armed));
    }

    #[tokio::test]
    async fn test_on_page_ready_missing_markup_halts() {
        let mut doc = Document::new();
        let location = PageLocation::new(true, "example.com", "/auth/login/");
        let err = on_page_ready(&mut doc, &location, &ClientConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingElement { .. }));
    }
}
