use super::{Launcher, Session};
use crate::config::DriverConfig;
use crate::error::DriverError;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Delay between visibility polls
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Opens sessions against a WebDriver server (chromedriver, geckodriver, ...)
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverLauncher {
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
        }
    }

    fn capabilities(&self) -> serde_json::Map<String, Value> {
        let mut caps = serde_json::Map::new();
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--disable-gpu", "--no-sandbox"] }),
            );
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }
        caps
    }
}

#[async_trait]
impl Launcher for WebDriverLauncher {
    type Session = WebDriverSession;

    async fn launch(&self) -> Result<WebDriverSession, DriverError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());

        match builder.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                Ok(WebDriverSession { client })
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                ::log::error!(
                    "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
                );
                Err(DriverError::Connect {
                    url: self.webdriver_url.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
}

/// A session backed by a fantoccini client
#[derive(Clone, Debug)]
pub struct WebDriverSession {
    client: Client,
}

#[async_trait]
impl Session for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        ::log::debug!("Navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, within: Duration) -> Result<bool, DriverError> {
        let started = Instant::now();
        loop {
            match self.client.find(Locator::Css(selector)).await {
                Ok(element) => {
                    if element.is_displayed().await? {
                        ::log::trace!("{} visible after {:?}", selector, started.elapsed());
                        return Ok(true);
                    }
                }
                Err(e) if e.is_no_such_element() => {}
                Err(e) => return Err(e.into()),
            }

            if started.elapsed() >= within {
                ::log::debug!("{} still not visible after {:?}", selector, within);
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let element = self.client.find(Locator::Css(selector)).await?;
        element.click().await?;
        Ok(())
    }

    async fn evaluate(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError> {
        Ok(self.client.execute(script, args).await?)
    }

    async fn source(&self) -> Result<String, DriverError> {
        Ok(self.client.source().await?)
    }

    async fn reload(&self) -> Result<(), DriverError> {
        ::log::debug!("Reloading page");
        self.client.refresh().await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.client.clone().close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher(headless: bool) -> WebDriverLauncher {
        WebDriverLauncher::new(&DriverConfig {
            headless,
            ..DriverConfig::default()
        })
    }

    #[test]
    fn test_headless_capabilities() {
        let caps = launcher(true).capabilities();
        let chrome_args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(chrome_args.contains(&json!("--headless=new")));
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!(["-headless"]));
    }

    #[test]
    fn test_headed_sends_no_browser_options() {
        assert!(launcher(false).capabilities().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_webdriver_is_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let launcher = WebDriverLauncher::new(&DriverConfig {
            webdriver_url: format!("http://{addr}"),
            ..DriverConfig::default()
        });
        let err = launcher.launch().await.unwrap_err();
        assert!(matches!(err, DriverError::Connect { .. }));
    }
}
