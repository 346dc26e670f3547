//! Form Mode Controller — renders the correct login UI variant, once.
//!
//! The server decides, per login attempt, whether the user must complete
//! a passcode verification step; it signals the decision by rendering the
//! passcode input hidden (no verification) or visible (verification
//! required). This controller reads that signal exactly once on
//! page-ready and mutates the document accordingly. It never re-evaluates
//! the mode within a page load and it shares no state with the channel.

use crate::config::ClientConfig;
use crate::document::{Document, NodeId, Presentation};
use crate::error::Error;

/// Which login UI variant this page load renders. Decided once; terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Ordinary password entry; the passcode input stays out of the way.
    DirectLogin,
    /// Passcode verification step with a one-shot resend affordance.
    VerifyIdentity,
}

/// State of the resend affordance within `VerifyIdentity` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendState {
    /// Clickable; the passcode input is still enabled.
    Armed,
    /// Consumed. The passcode input is disabled and stays disabled.
    Spent,
}

/// The four elements the markup contract guarantees, located up front.
#[derive(Debug, Clone, Copy)]
pub struct InitContext {
    pub title: NodeId,
    pub submit: NodeId,
    pub passcode: NodeId,
    pub form: NodeId,
}

impl InitContext {
    /// Locate all four contract elements before any conditional logic.
    ///
    /// A missing element is a markup-contract violation by the
    /// server-rendered page; initialization halts rather than recovering.
    pub fn locate(doc: &Document, config: &ClientConfig) -> Result<Self, Error> {
        let title = doc.first_by_class(&config.title_class).ok_or_else(|| {
            Error::MissingElement { selector: format!(".{}", config.title_class) }
        })?;
        let submit = doc.by_id(&config.submit_id).ok_or_else(|| Error::MissingElement {
            selector: format!("#{}", config.submit_id),
        })?;
        let passcode = doc.by_id(&config.passcode_id).ok_or_else(|| Error::MissingElement {
            selector: format!("#{}", config.passcode_id),
        })?;
        let form = doc.form_by_action(&config.login_form_action).ok_or_else(|| {
            Error::MissingElement {
                selector: format!("form[action='{}']", config.login_form_action),
            }
        })?;
        Ok(InitContext { title, submit, passcode, form })
    }
}

/// Stages every `VerifyIdentity` mutation, then applies them in one step,
/// so a partially-applied verification UI is never observable.
struct VerificationUi {
    title_text: String,
    submit_label: String,
    prompt_text: String,
    affordance_text: String,
    affordance_color: String,
}

impl VerificationUi {
    fn from_config(config: &ClientConfig) -> Self {
        VerificationUi {
            title_text: config.verify_title.clone(),
            submit_label: config.continue_label.clone(),
            prompt_text: config.resend_prompt.clone(),
            affordance_text: config.resend_label.clone(),
            affordance_color: config.resend_color.clone(),
        }
    }

    /// Apply all staged mutations: title, submit label, and the two new
    /// inline elements prepended before the submit control's container's
    /// existing children (prompt first, affordance second). Returns the
    /// affordance element.
    fn apply(self, doc: &mut Document, ctx: &InitContext) -> NodeId {
        let footer = doc.parent_of(ctx.submit).unwrap_or(ctx.form);

        let prompt = doc.create("p");
        {
            let el = doc.element_mut(prompt);
            el.text = self.prompt_text;
            el.style.inline = true;
        }
        let affordance = doc.create("p");
        {
            let el = doc.element_mut(affordance);
            el.text = self.affordance_text;
            el.style.inline = true;
            el.style.color = Some(self.affordance_color);
            el.style.pointer_cursor = true;
        }

        doc.element_mut(ctx.title).text = self.title_text;
        doc.element_mut(ctx.submit).text = self.submit_label;
        // Prepend the affordance first, then the prompt in front of it,
        // leaving the final order: prompt, affordance, prior children.
        doc.prepend(footer, affordance);
        doc.prepend(footer, prompt);

        affordance
    }
}

/// The initialized controller. Holds the located context, the decided
/// mode, and (in `VerifyIdentity` mode) the resend affordance state.
#[derive(Debug)]
pub struct FormController {
    ctx: InitContext,
    mode: FormMode,
    resend: Option<(NodeId, ResendState)>,
}

impl FormController {
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// The resend affordance element, when the mode has one.
    pub fn resend_affordance(&self) -> Option<NodeId> {
        self.resend.map(|(node, _)| node)
    }

    pub fn resend_state(&self) -> Option<ResendState> {
        self.resend.map(|(_, state)| state)
    }

    /// User activation of the resend affordance.
    ///
    /// `Armed → Spent`, exactly once: disables the passcode input, then
    /// programmatically activates the submit control (a normal form
    /// submission with whatever fields are currently enabled). Any later
    /// activation is a no-op — the passcode input stays disabled and no
    /// second submission is produced.
    pub fn activate_resend(&mut self, doc: &mut Document) {
        // Spent, or DirectLogin mode: nothing to do.
        if let Some((node, ResendState::Armed)) = self.resend {
            doc.element_mut(self.ctx.passcode).disabled = true;
            doc.activate_submit(self.ctx.submit);
            self.resend = Some((node, ResendState::Spent));
        }
    }
}

/// Initialize the controller against `doc`, once, on page-ready.
///
/// Locates the contract elements, decides the mode from the passcode
/// input's presentation, and mutates the document for that mode. The
/// decision is never revisited within the page load; a new mode requires
/// a new server-rendered document.
pub fn initialize(doc: &mut Document, config: &ClientConfig) -> Result<FormController, Error> {
    let ctx = InitContext::locate(doc, config)?;

    if doc.element(ctx.passcode).presentation == Some(Presentation::Hidden) {
        // Direct login: make sure the passcode input is interactable in
        // case a previous round left it disabled. No other UI changes.
        doc.element_mut(ctx.passcode).disabled = false;
        Ok(FormController { ctx, mode: FormMode::DirectLogin, resend: None })
    } else {
        let affordance = VerificationUi::from_config(config).apply(doc, &ctx);
        Ok(FormController {
            ctx,
            mode: FormMode::VerifyIdentity,
            resend: Some((affordance, ResendState::Armed)),
        })
    }
}
