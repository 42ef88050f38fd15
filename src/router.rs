//! View Router
//!
//! Single-active-section navigation. Exactly one [`Section`] is active at any
//! time; `Dashboard` and `Upload` are reachable only while authenticated.
//! The router also tracks which modal overlay (login or register) is open.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::sync::Pipeline;

/// Top-level view region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Home,
    About,
    Dashboard,
    Upload,
    BlockchainExplorer,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::About,
        Section::Dashboard,
        Section::Upload,
        Section::BlockchainExplorer,
    ];

    /// Reachable only with a session
    pub fn is_protected(self) -> bool {
        matches!(self, Section::Dashboard | Section::Upload)
    }

    /// Pipelines refreshed on every visit
    pub fn pipelines(self) -> &'static [Pipeline] {
        match self {
            Section::Dashboard => &[Pipeline::Memories, Pipeline::Transactions],
            Section::BlockchainExplorer => &[Pipeline::Ledger],
            Section::Home | Section::About | Section::Upload => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::About => "about",
            Section::Dashboard => "dashboard",
            Section::Upload => "upload",
            Section::BlockchainExplorer => "blockchain-explorer",
        }
    }

    /// Navigation link text
    pub fn title(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::About => "About",
            Section::Dashboard => "Dashboard",
            Section::Upload => "Upload",
            Section::BlockchainExplorer => "Explorer",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown section: {0}")]
pub struct SectionParseError(String);

impl FromStr for Section {
    type Err = SectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Section::Home),
            "about" => Ok(Section::About),
            "dashboard" => Ok(Section::Dashboard),
            "upload" => Ok(Section::Upload),
            "blockchain-explorer" | "blockchain" | "explorer" => Ok(Section::BlockchainExplorer),
            other => Err(SectionParseError(other.to_string())),
        }
    }
}

/// Modal overlay above the active section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Login,
    Register,
}

/// Navigation affordance for one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub section: Section,
    pub enabled: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    active: Section,
    overlay: Overlay,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    /// Activate `section`
    ///
    /// Returns `false` and leaves the active section untouched when the target
    /// is protected and there is no session.
    pub fn navigate(&mut self, section: Section, authenticated: bool) -> bool {
        if section.is_protected() && !authenticated {
            tracing::debug!(section = %section, "Ignoring navigation to protected section");
            return false;
        }
        if self.active != section {
            tracing::debug!(from = %self.active, to = %section, "Navigated");
        }
        self.active = section;
        true
    }

    /// Session ended: leave any protected section. Returns whether it moved.
    pub fn on_logged_out(&mut self) -> bool {
        if self.active.is_protected() {
            tracing::debug!(from = %self.active, "Session ended, returning home");
            self.active = Section::Home;
            true
        } else {
            false
        }
    }

    /// Session started: move from Home to the dashboard. Returns whether it moved.
    pub fn on_logged_in(&mut self) -> bool {
        if self.active == Section::Home {
            self.active = Section::Dashboard;
            true
        } else {
            false
        }
    }

    pub fn open(&mut self, overlay: Overlay) {
        self.overlay = overlay;
    }

    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    /// Affordances for every section, in menu order
    pub fn links(&self, authenticated: bool) -> Vec<NavLink> {
        Section::ALL
            .iter()
            .map(|&section| NavLink {
                section,
                enabled: authenticated || !section.is_protected(),
                active: section == self.active,
            })
            .collect()
    }
}
