//! Browser automation seam.
//!
//! Interactive operations talk to a [`Session`] obtained from a [`Launcher`].
//! Every operation gets a fresh session through [`with_session`], which bounds
//! the whole script by one deadline and closes the session on every exit path.

pub mod scripts;
pub mod webdriver;

use crate::error::{DriverError, PageError};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, timeout, timeout_at};

pub use webdriver::{WebDriverLauncher, WebDriverSession};

/// How long closing a session may take before it is abandoned
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A live browser session
#[async_trait]
pub trait Session: Send + Sync {
    /// Navigate to `url` and wait for the load to finish
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// Poll until `selector` matches a displayed element.
    ///
    /// Returns `false` if that did not happen within `within`.
    async fn wait_visible(&self, selector: &str, within: Duration) -> Result<bool, DriverError>;

    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    /// Run a script body and return its JSON result
    async fn evaluate(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError>;

    /// Current page markup
    async fn source(&self) -> Result<String, DriverError>;

    async fn reload(&self) -> Result<(), DriverError>;

    async fn close(&self) -> Result<(), DriverError>;

    async fn set_value(&self, selector: &str, value: &str) -> Result<String, DriverError> {
        let result = self
            .evaluate(scripts::SET_VALUE, vec![json!(selector), json!(value)])
            .await?;
        as_text(result)
    }

    async fn value(&self, selector: &str) -> Result<String, DriverError> {
        as_text(self.evaluate(scripts::READ_VALUE, vec![json!(selector)]).await?)
    }

    async fn inner_text(&self, selector: &str) -> Result<String, DriverError> {
        as_text(self.evaluate(scripts::INNER_TEXT, vec![json!(selector)]).await?)
    }

    async fn is_checked(&self, selector: &str) -> Result<bool, DriverError> {
        let result = self
            .evaluate(scripts::IS_CHECKED, vec![json!(selector)])
            .await?;
        result
            .as_bool()
            .ok_or_else(|| DriverError::Script(format!("expected a boolean, got {result}")))
    }

    /// Wait for `selector` and fail the step if it never shows up
    async fn require_visible(&self, selector: &str, within: Duration) -> Result<(), DriverError> {
        if self.wait_visible(selector, within).await? {
            Ok(())
        } else {
            Err(DriverError::NotVisible {
                selector: selector.to_string(),
                waited: within,
            })
        }
    }
}

/// Opens new browser sessions
#[async_trait]
pub trait Launcher: Send + Sync {
    type Session: Session + Clone + 'static;

    async fn launch(&self) -> Result<Self::Session, DriverError>;
}

/// Converts a script result into text; `null` reads as the empty string
pub fn as_text(value: Value) -> Result<String, DriverError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(DriverError::Script(format!("expected text, got {other}"))),
    }
}

/// Runs `steps` against a fresh session navigated to `url`.
///
/// Launch, navigation and steps share a single deadline of `limit`. The
/// session is closed whether the steps succeed, fail or time out. Driver
/// failures come back as [`PageError::Interaction`] tagged with `operation`.
pub async fn with_session<L, T, F, Fut>(
    launcher: &L,
    url: &str,
    limit: Duration,
    operation: &'static str,
    steps: F,
) -> Result<T, PageError>
where
    L: Launcher,
    F: FnOnce(L::Session) -> Fut + Send,
    Fut: Future<Output = Result<T, PageError>> + Send,
    T: Send,
{
    let deadline = Instant::now() + limit;
    let tag = |source| PageError::Interaction { operation, source };

    let session = match timeout_at(deadline, launcher.launch()).await {
        Ok(Ok(session)) => session,
        Ok(Err(e)) => return Err(tag(e)),
        Err(_) => return Err(tag(DriverError::Timeout(limit))),
    };
    ::log::debug!("Opened browser session for {}", operation);

    let outcome = timeout_at(deadline, run_steps(session.clone(), url, steps)).await;

    match timeout(CLOSE_TIMEOUT, session.close()).await {
        Ok(Ok(())) => ::log::debug!("Closed browser session for {}", operation),
        Ok(Err(e)) => ::log::warn!("Failed to close session after {}: {}", operation, e),
        Err(_) => ::log::warn!("Timed out closing session after {}", operation),
    }

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(PageError::Interaction { source, .. })) => Err(tag(source)),
        Ok(Err(other)) => Err(other),
        Err(_) => {
            ::log::error!("{} exceeded {:.1}s", operation, limit.as_secs_f64());
            Err(tag(DriverError::Timeout(limit)))
        }
    }
}

async fn run_steps<S, T, F, Fut>(session: S, url: &str, steps: F) -> Result<T, PageError>
where
    S: Session,
    F: FnOnce(S) -> Fut,
    Fut: Future<Output = Result<T, PageError>>,
{
    session.goto(url).await?;
    steps(session).await
}
