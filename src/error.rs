use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by page accessors and interactive operations
#[derive(Debug, Error)]
pub enum PageError {
    /// The HTTP client itself could not be built
    #[error("error building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be constructed or sent
    #[error("error fetching {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response status was not 200
    #[error("status code error: {status} ({url})")]
    Status { url: String, status: u16 },

    /// The body could not be turned into a document
    #[error("error parsing HTML from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// An expected element or text was absent
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unexpected title: {found:?} (expected {expected:?})")]
    TitleMismatch { expected: String, found: String },

    #[error("expected {expected} sections, found {found}")]
    SectionCountMismatch { expected: usize, found: usize },

    #[error("no links found")]
    NoLinks,

    /// A browser step failed or timed out
    #[error("{operation}: {source}")]
    Interaction {
        operation: &'static str,
        #[source]
        source: DriverError,
    },

    /// A revealed element was present but never became visible
    #[error("element {0} did not become visible")]
    Visibility(String),

    #[error("both radio buttons are checked, only one should be")]
    AmbiguousSelection,

    #[error("invalid page url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failures raised by the browser automation layer
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not open a WebDriver session at {url}: {message}")]
    Connect { url: String, message: String },

    #[error("command failed: {0}")]
    Command(String),

    /// The operation's overall deadline expired
    #[error("timed out after {:.1}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("{selector} not visible after {:.1}s", .waited.as_secs_f64())]
    NotVisible { selector: String, waited: Duration },

    #[error("unexpected script result: {0}")]
    Script(String),
}

impl From<DriverError> for PageError {
    fn from(source: DriverError) -> Self {
        PageError::Interaction {
            operation: "browser step",
            source,
        }
    }
}

impl From<fantoccini::error::CmdError> for DriverError {
    fn from(e: fantoccini::error::CmdError) -> Self {
        DriverError::Command(e.to_string())
    }
}

/// Errors produced while rendering the HTML report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report template error: {0}")]
    Template(String),

    #[error("error writing report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<handlebars::TemplateError> for ReportError {
    fn from(e: handlebars::TemplateError) -> Self {
        ReportError::Template(e.to_string())
    }
}

impl From<handlebars::RenderError> for ReportError {
    fn from(e: handlebars::RenderError) -> Self {
        ReportError::Template(e.to_string())
    }
}

/// Errors loading harness configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
