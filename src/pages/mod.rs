//! Page objects.
//!
//! A page object exposes a site's semantic values (title, sections, links)
//! and checks them against [`StructureExpectations`]. Two variants share the
//! [`PageObject`] capability: [`StaticPage`] fetches over plain HTTP, while
//! [`InteractiveScenario`] drives a browser and also runs the widget scripts
//! that need JavaScript.
//!
//! Every accessor does its own fetch or navigation. Two calls against a live
//! site may see different content.

pub mod interactive;
pub mod static_page;

#[cfg(test)]
pub(crate) mod tests;

pub use interactive::{ChoiceProbe, DropdownSelection, InteractiveScenario, TableSnapshot};
pub use static_page::StaticPage;

use crate::config::{HarnessConfig, PageKind, SiteConfig, StructureExpectations};
use crate::driver::WebDriverLauncher;
use crate::error::PageError;
use async_trait::async_trait;
use std::collections::BTreeSet;
use url::Url;

/// Capability shared by every page variant
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Address every accessor starts from
    fn url(&self) -> &Url;

    fn expectations(&self) -> &StructureExpectations;

    /// Trimmed `<title>` text; `NotFound` when blank
    async fn title(&self) -> Result<String, PageError>;

    /// Text of each section element in document order; `NotFound` when none
    async fn sections(&self) -> Result<Vec<String>, PageError>;

    /// Distinct `href`/`src` values. An empty set is not an error.
    async fn links(&self) -> Result<BTreeSet<String>, PageError>;

    /// Checks title, then section count, then links, stopping at the first mismatch
    async fn verify_structure(&self) -> Result<bool, PageError> {
        let expect = self.expectations();

        let title = self.title().await?;
        if title != expect.title {
            return Err(PageError::TitleMismatch {
                expected: expect.title.clone(),
                found: title,
            });
        }

        let sections = self.sections().await?;
        if sections.len() != expect.section_count {
            return Err(PageError::SectionCountMismatch {
                expected: expect.section_count,
                found: sections.len(),
            });
        }

        let links = self.links().await?;
        if links.is_empty() {
            return Err(PageError::NoLinks);
        }

        ::log::info!("Structure of {} matches expectations", self.url());
        Ok(true)
    }
}

/// Builds the page variant a site is configured for
pub fn build_page(
    site: &SiteConfig,
    config: &HarnessConfig,
) -> Result<Box<dyn PageObject>, PageError> {
    let page: Box<dyn PageObject> = match site.kind {
        PageKind::Static => {
            Box::new(StaticPage::new(&site.url, &config.fetch, site.expect.clone())?)
        }
        PageKind::Interactive => {
            Box::new(InteractiveScenario::<WebDriverLauncher>::from_config(site, config)?)
        }
    };
    Ok(page)
}

pub(crate) fn parse_url(url: &str) -> Result<Url, PageError> {
    Url::parse(url).map_err(|source| PageError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}
