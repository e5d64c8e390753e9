use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Settings for the plain-HTTP content fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Value sent in the User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

/// Settings for browser sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Deadline for one interactive operation, session setup included
    #[serde(default = "default_operation_timeout")]
    pub timeout_secs: u64,

    /// How long a single step waits for an element to become visible.
    ///
    /// Kept well below `timeout_secs` so a missing element is reported as
    /// such instead of as an expired operation.
    #[serde(default = "default_wait")]
    pub wait_secs: u64,

    /// Ask the browser to run without a window
    #[serde(default = "default_headless")]
    pub headless: bool,
}

/// What `verify_structure` and the suites expect from a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureExpectations {
    /// Exact title text
    pub title: String,

    /// Exact number of section elements
    pub section_count: usize,

    /// Prefix an element id must start with to count as a section
    #[serde(default = "default_section_prefix")]
    pub section_prefix: String,

    /// Number of distinct links the suite expects; not part of verify_structure
    #[serde(default)]
    pub link_count: Option<usize>,
}

/// Locators for the interactive sandbox widgets.
///
/// These follow the sandbox's current markup and are the only place that
/// markup is encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxLocators {
    pub reveal_button: String,
    pub hidden_element: String,

    pub text_field: String,

    pub checkboxes: Vec<String>,
    pub first_checkbox_label: String,
    pub radio_buttons: [String; 2],

    pub select: String,
    pub select_value: String,
    pub menu_button: String,
    pub menu: String,
    pub menu_option: String,
    pub submit_button: String,

    pub popup_button: String,
    pub modal: String,
    pub modal_body: String,
    pub modal_close: String,

    pub shadow_host: String,
    pub shadow_element: String,

    pub dynamic_table: String,
    pub static_table: String,
    pub table_row: usize,
    pub table_cell: usize,
}

impl Default for SandboxLocators {
    fn default() -> Self {
        Self {
            reveal_button: "button.btn.btn-primary".to_string(),
            hidden_element: "#hidden-element".to_string(),
            text_field: "#formBasicText".to_string(),
            checkboxes: (0..5).map(|i| format!("#checkbox-{i}")).collect(),
            first_checkbox_label: "#checkbox-0 + label".to_string(),
            radio_buttons: ["#formRadio1".to_string(), "#formRadio2".to_string()],
            select: "#formBasicSelect".to_string(),
            select_value: "Fútbol".to_string(),
            menu_button: "#dropdown-basic-button".to_string(),
            menu: ".dropdown-menu".to_string(),
            menu_option: ".dropdown-menu a[href=\"#/action-2\"]".to_string(),
            submit_button: "button.btn.btn-primary".to_string(),
            popup_button: "#root > div > div:nth-child(5) > div > button".to_string(),
            modal: "body > div.fade.modal.show > div > div".to_string(),
            modal_body: "body > div.fade.modal.show > div > div > div.modal-body".to_string(),
            modal_close: "body > div.fade.modal.show > div > div > div.modal-footer > button"
                .to_string(),
            shadow_host: "#shadow-root-example".to_string(),
            shadow_element: "#shadow-host".to_string(),
            dynamic_table: "#root > div > div:nth-child(7) > div > table".to_string(),
            static_table: "#root > div > div:nth-child(8) > div > table".to_string(),
            table_row: 1,
            table_cell: 1,
        }
    }
}

/// Which page variant a site needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Plain HTTP fetch and parse
    Static,
    /// Live browser session
    Interactive,
}

/// A target site and what it should look like
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub url: String,
    pub kind: PageKind,
    pub expect: StructureExpectations,
}

/// Top-level configuration for the harness and CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub driver: DriverConfig,

    #[serde(default)]
    pub locators: SandboxLocators,

    #[serde(default = "SiteConfig::home")]
    pub home: SiteConfig,

    #[serde(default = "SiteConfig::sandbox")]
    pub sandbox: SiteConfig,
}

impl HarnessConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override the WebDriver URL with an environment value if provided
    pub fn apply_webdriver_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|u| !u.is_empty()) {
            ::log::debug!("Using WebDriver URL from environment: {}", url);
            self.driver.webdriver_url = url;
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            driver: DriverConfig::default(),
            locators: SandboxLocators::default(),
            home: SiteConfig::home(),
            sandbox: SiteConfig::sandbox(),
        }
    }
}

impl SiteConfig {
    /// The Free Range Testers landing page
    pub fn home() -> Self {
        Self {
            url: "https://www.freerangetesters.com".to_string(),
            kind: PageKind::Static,
            expect: StructureExpectations {
                title: "Free Range Testers".to_string(),
                section_count: 16,
                section_prefix: default_section_prefix(),
                link_count: Some(10),
            },
        }
    }

    /// The automation sandbox with its interactive widgets
    pub fn sandbox() -> Self {
        Self {
            url: "https://thefreerangetester.github.io/sandbox-automation-testing/".to_string(),
            kind: PageKind::Interactive,
            expect: StructureExpectations {
                title: "Automation Sandbox".to_string(),
                section_count: 16,
                section_prefix: default_section_prefix(),
                link_count: Some(5),
            },
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            timeout_secs: default_operation_timeout(),
            wait_secs: default_wait(),
            headless: default_headless(),
        }
    }
}

fn default_user_agent() -> String {
    "FreeRangeTesters E2E Tests".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_operation_timeout() -> u64 {
    15
}

fn default_wait() -> u64 {
    5
}

fn default_headless() -> bool {
    true
}

fn default_section_prefix() -> String {
    "page_section".to_string()
}
