// Re-export modules
pub mod config;
pub mod driver;
pub mod error;
pub mod fetcher;
pub mod harness;
pub mod pages;
pub mod parsers;
pub mod report;
pub mod results;
pub mod suites;

// Re-export commonly used types for convenience
pub use config::{HarnessConfig, PageKind, SiteConfig, StructureExpectations};
pub use error::{ConfigError, DriverError, PageError, ReportError};
pub use pages::{InteractiveScenario, PageObject, StaticPage, build_page};
pub use report::generate_html_report;
pub use results::{TestResult, TestStatus};
