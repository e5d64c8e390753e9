use super::{PageObject, parse_url};
use crate::config::{FetchConfig, StructureExpectations};
use crate::error::PageError;
use crate::fetcher::Fetcher;
use crate::parsers;
use async_trait::async_trait;
use std::collections::BTreeSet;
use url::Url;

/// A page read with plain HTTP requests
#[derive(Debug, Clone)]
pub struct StaticPage {
    url: Url,
    fetcher: Fetcher,
    expect: StructureExpectations,
}

impl StaticPage {
    pub fn new(
        url: &str,
        fetch: &FetchConfig,
        expect: StructureExpectations,
    ) -> Result<Self, PageError> {
        Ok(Self {
            url: parse_url(url)?,
            fetcher: Fetcher::new(fetch)?,
            expect,
        })
    }
}

#[async_trait]
impl PageObject for StaticPage {
    fn url(&self) -> &Url {
        &self.url
    }

    fn expectations(&self) -> &StructureExpectations {
        &self.expect
    }

    async fn title(&self) -> Result<String, PageError> {
        let doc = self.fetcher.fetch(&self.url).await?;
        parsers::extract_title(&doc)
    }

    async fn sections(&self) -> Result<Vec<String>, PageError> {
        let doc = self.fetcher.fetch(&self.url).await?;
        parsers::extract_sections(&doc, &self.expect.section_prefix)
    }

    async fn links(&self) -> Result<BTreeSet<String>, PageError> {
        let doc = self.fetcher.fetch(&self.url).await?;
        Ok(parsers::extract_links(&doc))
    }
}
