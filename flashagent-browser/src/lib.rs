//! Browser session descriptors for FlashAgent.
//!
//! The actual browser automation (page lifecycle, DOM interaction, CDP
//! negotiation) lives entirely inside the external agent backend. This crate
//! only describes the sessions that backend should open: a long-lived
//! [`BrowserProfile`] built once from configuration, and lightweight
//! [`BrowserSession`] handles minted per attachment. One shared session may
//! serve many concurrently issued tasks; coordinating that sharing is the
//! backend's job, not ours.

use std::path::PathBuf;

use flashagent_config::BrowserSettings;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Browser viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 1100,
        }
    }
}

/// Launch profile handed to the agent backend for every session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserProfile {
    /// Run without a visible window.
    #[serde(default)]
    pub headless: bool,
    /// How long to wait for network idle after a page load.
    #[serde(default = "default_network_idle_secs")]
    pub wait_for_network_idle_page_load_secs: f64,
    #[serde(default)]
    pub viewport: Viewport,
    pub user_agent: String,
    /// Draw interaction-target overlays on the page.
    #[serde(default)]
    pub highlight_elements: bool,
    /// Extra pixels of DOM context captured beyond the viewport.
    #[serde(default = "default_viewport_expansion")]
    pub viewport_expansion: u32,
    /// Keep the underlying browser process alive between runs.
    #[serde(default)]
    pub keep_alive: bool,
    #[serde(default)]
    pub chromium_sandbox: bool,
}

fn default_network_idle_secs() -> f64 {
    3.0
}

fn default_viewport_expansion() -> u32 {
    500
}

impl BrowserProfile {
    /// Profile used for every shared session: windowed by default, patient
    /// page loads, a widened capture area, overlays and sandbox off.
    pub fn standard(user_agent: &str) -> Self {
        Self {
            headless: false,
            wait_for_network_idle_page_load_secs: 3.0,
            viewport: Viewport::default(),
            user_agent: user_agent.to_string(),
            highlight_elements: false,
            viewport_expansion: 500,
            keep_alive: false,
            chromium_sandbox: false,
        }
    }
}

/// Opaque handle describing one browser attachment.
///
/// Passed as-is to the agent backend's run operation; nothing in this
/// workspace dereferences it beyond logging the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSession {
    pub id: Uuid,
    pub profile: BrowserProfile,
    /// Overrides the profile's headless flag for this session.
    pub headless: bool,
    /// `None` keeps the backend on an ephemeral user-data directory.
    pub user_data_dir: Option<PathBuf>,
}

/// Builds the long-lived profile once and mints session handles from it.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    profile: BrowserProfile,
}

impl SessionFactory {
    pub fn new(settings: &BrowserSettings) -> Self {
        Self {
            profile: BrowserProfile::standard(&settings.user_agent),
        }
    }

    /// Mint a session handle over the shared profile.
    pub fn shared_session(&self, headless: bool) -> BrowserSession {
        let session = BrowserSession {
            id: Uuid::new_v4(),
            profile: self.profile.clone(),
            headless,
            user_data_dir: None,
        };
        tracing::debug!(session_id = %session.id, headless, "minted browser session");
        session
    }

    pub fn profile(&self) -> &BrowserProfile {
        &self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BrowserSettings {
        serde_json::from_value(serde_json::json!({ "user-agent": "AgentBot/1.0" })).unwrap()
    }

    #[test]
    fn standard_profile_matches_launch_defaults() {
        let profile = BrowserProfile::standard("AgentBot/1.0");
        assert!(!profile.headless);
        assert_eq!(profile.viewport, Viewport { width: 1280, height: 1100 });
        assert_eq!(profile.viewport_expansion, 500);
        assert!(!profile.highlight_elements);
        assert!(!profile.chromium_sandbox);
    }

    #[test]
    fn shared_sessions_share_the_profile_but_not_the_id() {
        let factory = SessionFactory::new(&settings());
        let a = factory.shared_session(true);
        let b = factory.shared_session(true);
        assert_ne!(a.id, b.id);
        assert_eq!(a.profile.user_agent, b.profile.user_agent);
        assert!(a.headless);
        assert!(a.user_data_dir.is_none());
    }
}
