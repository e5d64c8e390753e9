use super::{PageObject, parse_url};
use crate::config::{HarnessConfig, SandboxLocators, SiteConfig, StructureExpectations};
use crate::driver::{self, Launcher, Session, WebDriverLauncher, scripts};
use crate::error::{DriverError, PageError};
use crate::parsers;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Values read by the checkbox and radio probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceProbe {
    /// Label text next to the first checkbox
    pub checkbox_label: String,
    /// Value of whichever radio ended up checked, empty if neither
    pub radio_value: String,
}

/// Values read back from the two dropdowns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownSelection {
    /// Value held by the native select after setting it
    pub select_value: String,
    /// Text of the option clicked in the menu-style dropdown
    pub menu_value: String,
}

/// One cell from each table, read before and after a reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    pub dynamic_before: String,
    pub dynamic_after: String,
    pub static_before: String,
    pub static_after: String,
}

impl TableSnapshot {
    pub fn dynamic_changed(&self) -> bool {
        self.dynamic_before != self.dynamic_after
    }

    pub fn static_unchanged(&self) -> bool {
        self.static_before == self.static_after
    }
}

#[derive(Deserialize)]
struct ShadowProbe {
    html: Option<String>,
    missing: Option<String>,
}

/// A page driven through a live browser.
///
/// Each operation opens its own session, navigates to the page, runs a
/// fixed script of waits, clicks and evaluations, and closes the session.
/// Nothing is shared between operations.
pub struct InteractiveScenario<L: Launcher = WebDriverLauncher> {
    url: Url,
    launcher: L,
    locators: SandboxLocators,
    timeout: Duration,
    wait: Duration,
    expect: StructureExpectations,
}

impl InteractiveScenario<WebDriverLauncher> {
    /// Scenario for `site` using a WebDriver-backed launcher
    pub fn from_config(site: &SiteConfig, config: &HarnessConfig) -> Result<Self, PageError> {
        Self::new(
            &site.url,
            WebDriverLauncher::new(&config.driver),
            config.locators.clone(),
            Duration::from_secs(config.driver.timeout_secs),
            site.expect.clone(),
        )
        .map(|scenario| scenario.with_wait(Duration::from_secs(config.driver.wait_secs)))
    }
}

impl<L: Launcher> InteractiveScenario<L> {
    pub fn new(
        url: &str,
        launcher: L,
        locators: SandboxLocators,
        timeout: Duration,
        expect: StructureExpectations,
    ) -> Result<Self, PageError> {
        Ok(Self {
            url: parse_url(url)?,
            launcher,
            locators,
            timeout,
            wait: timeout / 3,
            expect,
        })
    }

    /// Set how long each step waits for an element to show up
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Per-step visibility budget, capped at half the operation deadline
    fn step_wait(&self) -> Duration {
        self.wait.min(self.timeout / 2)
    }

    pub fn locators(&self) -> &SandboxLocators {
        &self.locators
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    async fn run<T, F, Fut>(&self, operation: &'static str, steps: F) -> Result<T, PageError>
    where
        F: FnOnce(L::Session) -> Fut + Send,
        Fut: Future<Output = Result<T, PageError>> + Send,
        T: Send,
    {
        ::log::info!("Running {} on {}", operation, self.url);
        let started = std::time::Instant::now();
        let result = driver::with_session(
            &self.launcher,
            self.url.as_str(),
            self.timeout,
            operation,
            steps,
        )
        .await;
        ::log::debug!(
            "{} finished in {:.2} seconds",
            operation,
            started.elapsed().as_secs_f64()
        );
        result
    }

    /// Clicks the reveal button and returns the text of the element it uncovers
    pub async fn dynamic_reveal(&self) -> Result<String, PageError> {
        let loc = &self.locators;
        let within = self.step_wait();
        self.run("dynamic reveal", move |s| async move {
            s.require_visible(&loc.reveal_button, within).await?;
            s.click(&loc.reveal_button).await?;
            if !s.wait_visible(&loc.hidden_element, within).await? {
                return Err(PageError::Visibility(loc.hidden_element.clone()));
            }
            Ok(s.inner_text(&loc.hidden_element).await?)
        })
        .await
    }

    /// Types `text` into the text field and returns what the field then holds
    pub async fn enter_text(&self, text: &str) -> Result<String, PageError> {
        let loc = &self.locators;
        let within = self.step_wait();
        self.run("text entry", move |s| async move {
            s.require_visible(&loc.text_field, within).await?;
            s.set_value(&loc.text_field, text).await?;
            Ok(s.value(&loc.text_field).await?)
        })
        .await
    }

    /// Ticks every checkbox, clicks both radios in turn and reports what stuck.
    ///
    /// Radios are exclusive, so both reading as checked is an error rather
    /// than a coin flip between the two values.
    pub async fn probe_choices(&self) -> Result<ChoiceProbe, PageError> {
        let loc = &self.locators;
        let within = self.step_wait();
        self.run("checkbox and radio probe", move |s| async move {
            if let Some(first) = loc.checkboxes.first() {
                s.require_visible(first, within).await?;
            }
            for checkbox in &loc.checkboxes {
                s.click(checkbox).await?;
            }

            let [first_radio, second_radio] = &loc.radio_buttons;
            for radio in [first_radio, second_radio] {
                s.require_visible(radio, within).await?;
                s.click(radio).await?;
            }

            let first_checked = s.is_checked(first_radio).await?;
            let second_checked = s.is_checked(second_radio).await?;
            let radio_value = match (first_checked, second_checked) {
                (true, true) => return Err(PageError::AmbiguousSelection),
                (true, false) => s.value(first_radio).await?,
                (false, true) => s.value(second_radio).await?,
                (false, false) => {
                    ::log::warn!("Neither radio button is checked");
                    String::new()
                }
            };

            let checkbox_label = s.inner_text(&loc.first_checkbox_label).await?;
            Ok(ChoiceProbe {
                checkbox_label,
                radio_value,
            })
        })
        .await
    }

    /// Sets the native select, picks an option from the menu dropdown and submits
    pub async fn select_dropdowns(&self) -> Result<DropdownSelection, PageError> {
        let loc = &self.locators;
        let within = self.step_wait();
        self.run("dropdown selection", move |s| async move {
            s.require_visible(&loc.select, within).await?;
            s.set_value(&loc.select, &loc.select_value).await?;
            let select_value = s.value(&loc.select).await?;

            s.require_visible(&loc.menu_button, within).await?;
            s.click(&loc.menu_button).await?;
            s.require_visible(&loc.menu, within).await?;
            s.click(&loc.menu_option).await?;
            let menu_value = s.inner_text(&loc.menu_option).await?;

            s.require_visible(&loc.submit_button, within).await?;
            s.click(&loc.submit_button).await?;

            Ok(DropdownSelection {
                select_value,
                menu_value,
            })
        })
        .await
    }

    /// Opens the popup, captures its body text and closes it again
    pub async fn handle_popup(&self) -> Result<String, PageError> {
        let loc = &self.locators;
        let within = self.step_wait();
        self.run("popup handling", move |s| async move {
            s.require_visible(&loc.popup_button, within).await?;
            s.click(&loc.popup_button).await?;
            s.require_visible(&loc.modal, within).await?;
            let text = s.inner_text(&loc.modal_body).await?;
            s.click(&loc.modal_close).await?;
            Ok(text)
        })
        .await
    }

    /// Inner markup of the element inside the shadow host.
    ///
    /// A missing host, root or element is logged and yields an empty string.
    pub async fn shadow_content(&self) -> Result<String, PageError> {
        let loc = &self.locators;
        let within = self.step_wait();
        self.run("shadow tree inspection", move |s| async move {
            s.require_visible(&loc.shadow_host, within).await?;
            let result = s
                .evaluate(
                    scripts::SHADOW_CONTENT,
                    vec![json!(loc.shadow_host), json!(loc.shadow_element)],
                )
                .await?;
            let probe: ShadowProbe = serde_json::from_value(result)
                .map_err(|e| DriverError::Script(e.to_string()))?;

            if let Some(missing) = probe.missing {
                ::log::warn!("{} not found under {}", missing, loc.shadow_host);
                return Ok(String::new());
            }
            Ok(probe.html.unwrap_or_default())
        })
        .await
    }

    /// Reads one cell from each table, reloads, and reads them again
    pub async fn table_snapshot(&self) -> Result<TableSnapshot, PageError> {
        let loc = &self.locators;
        let within = self.step_wait();
        self.run("table snapshot", move |s| async move {
            let cell = |table: &str| {
                let args = vec![json!(table), json!(loc.table_row), json!(loc.table_cell)];
                let session = s.clone();
                async move { driver::as_text(session.evaluate(scripts::TABLE_CELL, args).await?) }
            };

            s.require_visible(&loc.dynamic_table, within).await?;
            let dynamic_before = cell(&loc.dynamic_table).await?;
            s.require_visible(&loc.static_table, within).await?;
            let static_before = cell(&loc.static_table).await?;

            s.reload().await?;
            s.require_visible(&loc.dynamic_table, within).await?;
            s.require_visible(&loc.static_table, within).await?;
            let dynamic_after = cell(&loc.dynamic_table).await?;
            let static_after = cell(&loc.static_table).await?;

            Ok(TableSnapshot {
                dynamic_before,
                dynamic_after,
                static_before,
                static_after,
            })
        })
        .await
    }

    async fn page_source(&self, operation: &'static str) -> Result<String, PageError> {
        self.run(operation, |s| async move { Ok(s.source().await?) })
            .await
    }
}

#[async_trait]
impl<L: Launcher> PageObject for InteractiveScenario<L> {
    fn url(&self) -> &Url {
        &self.url
    }

    fn expectations(&self) -> &StructureExpectations {
        &self.expect
    }

    async fn title(&self) -> Result<String, PageError> {
        let markup = self.page_source("read title").await?;
        parsers::extract_title(&parsers::parse_document(&markup))
    }

    async fn sections(&self) -> Result<Vec<String>, PageError> {
        let markup = self.page_source("read sections").await?;
        parsers::extract_sections(&parsers::parse_document(&markup), &self.expect.section_prefix)
    }

    async fn links(&self) -> Result<BTreeSet<String>, PageError> {
        let markup = self.page_source("read links").await?;
        Ok(parsers::extract_links(&parsers::parse_document(&markup)))
    }
}
