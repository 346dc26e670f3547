//! Client configuration: endpoint paths, element selectors, UI strings.
//!
//! Defaults reproduce the values the server-rendered login page ships
//! with; deployments that remount the login view under different paths
//! or want localized labels can override any field from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Everything the client needs to know about the page it attaches to.
///
/// All fields default, so a partial TOML file overrides only what it
/// names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Path prefix the channel endpoint lives under (page path is
    /// appended to this).
    pub channel_path_prefix: String,
    /// Action attribute of the login form to attach to.
    pub login_form_action: String,
    /// Class of the login title element.
    pub title_class: String,
    /// Id of the submit control.
    pub submit_id: String,
    /// Id of the passcode input whose presentation selects the mode.
    pub passcode_id: String,
    /// Title shown in the passcode-verification mode.
    pub verify_title: String,
    /// Submit label shown in the passcode-verification mode.
    pub continue_label: String,
    /// Static phrase preceding the resend affordance.
    pub resend_prompt: String,
    /// Clickable resend affordance label.
    pub resend_label: String,
    /// Color applied to the resend affordance.
    pub resend_color: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            channel_path_prefix: "/ws".to_string(),
            login_form_action: "/auth/login/".to_string(),
            title_class: "login-title".to_string(),
            submit_id: "loginBtn".to_string(),
            passcode_id: "id_passcode".to_string(),
            verify_title: "Verify Your Identity".to_string(),
            continue_label: "Continue".to_string(),
            resend_prompt: "Did not receive a message? ".to_string(),
            resend_label: "Re-send code.".to_string(),
            resend_color: "blue".to_string(),
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, Error> {
        Ok(toml::from_str(raw)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
