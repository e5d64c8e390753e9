//! End-to-end suites for the home page and the automation sandbox.
//!
//! Each step catches its own errors, so one broken widget shows up as a
//! failed sub-test while the remaining steps still run.

use crate::config::StructureExpectations;
use crate::driver::Launcher;
use crate::harness::Suite;
use crate::pages::{InteractiveScenario, PageObject};
use crate::results::TestResult;

const HOME_TARGET: &str = "site_probe::suite::home";
const SANDBOX_TARGET: &str = "site_probe::suite::sandbox";

/// Text typed into the sandbox text field
pub const SAMPLE_TEXT: &str = "Texto de prueba";

/// Title, section count and link count of a static page
pub async fn home(page: &dyn PageObject, expect: &StructureExpectations) -> TestResult {
    let mut suite = Suite::new(HOME_TARGET, "Home page");
    let step = title_step(&suite, page, expect).await;
    suite.record(step);
    let step = sections_step(&suite, page, expect).await;
    suite.record(step);
    let step = links_step(&suite, page, expect).await;
    suite.record(step);
    suite.finish()
}

/// Structure checks plus every widget script of the sandbox
pub async fn sandbox<L: Launcher>(
    scenario: &InteractiveScenario<L>,
    expect: &StructureExpectations,
) -> TestResult {
    let mut suite = Suite::new(SANDBOX_TARGET, "Sandbox page");
    let page: &dyn PageObject = scenario;

    let step = title_step(&suite, page, expect).await;
    suite.record(step);
    let step = links_step(&suite, page, expect).await;
    suite.record(step);

    let mut step = suite.step("should click dynamic button");
    match scenario.dynamic_reveal().await {
        Ok(text) => step.log(format!("Hidden text: {text}")),
        Err(err) => step.fail(err),
    }
    suite.record(step.finish());

    let mut step = suite.step("should insert text in textbox");
    match scenario.enter_text(SAMPLE_TEXT).await {
        Ok(value) => {
            step.log(format!("Textbox value: {value}"));
            step.check_eq("textbox value", SAMPLE_TEXT, value.as_str());
        }
        Err(err) => step.fail(err),
    }
    suite.record(step.finish());

    let mut step = suite.step("should test checkboxes and radio buttons");
    match scenario.probe_choices().await {
        Ok(probe) => {
            step.log(format!("First checkbox label: {}", probe.checkbox_label));
            step.log(format!("Radio button value: {}", probe.radio_value));
        }
        Err(err) => step.fail(err),
    }
    suite.record(step.finish());

    let mut step = suite.step("should click dropdowns");
    match scenario.select_dropdowns().await {
        Ok(selection) => {
            step.log(format!("First dropdown value: {}", selection.select_value));
            step.log(format!("Second dropdown value: {}", selection.menu_value));
        }
        Err(err) => step.fail(err),
    }
    suite.record(step.finish());

    let mut step = suite.step("should handle popup");
    match scenario.handle_popup().await {
        Ok(text) => step.log(format!("Popup text: {text}")),
        Err(err) => step.fail(err),
    }
    suite.record(step.finish());

    let mut step = suite.step("should interact with shadow DOM");
    match scenario.shadow_content().await {
        Ok(html) => step.log(format!("Shadow DOM content: {html}")),
        Err(err) => step.fail(err),
    }
    suite.record(step.finish());

    let mut step = suite.step("should interact with tables");
    match scenario.table_snapshot().await {
        Ok(tables) => {
            step.log(format!("Dynamic cell before: {}", tables.dynamic_before));
            step.log(format!("Dynamic cell after: {}", tables.dynamic_after));
            step.log(format!("Static cell before: {}", tables.static_before));
            step.log(format!("Static cell after: {}", tables.static_after));
            step.check(
                tables.dynamic_changed() && tables.static_unchanged(),
                "Cell values do not meet the expected conditions",
            );
        }
        Err(err) => step.fail(err),
    }
    suite.record(step.finish());

    suite.finish()
}

async fn title_step(
    suite: &Suite,
    page: &dyn PageObject,
    expect: &StructureExpectations,
) -> TestResult {
    let mut step = suite.step("should have correct title");
    step.log(format!("Accessing {}", page.url()));
    match page.title().await {
        Ok(title) => {
            step.log(format!("Title found: {title}"));
            step.check_eq("title", expect.title.as_str(), title.as_str());
        }
        Err(err) => step.fail(err),
    }
    step.finish()
}

async fn sections_step(
    suite: &Suite,
    page: &dyn PageObject,
    expect: &StructureExpectations,
) -> TestResult {
    let mut step = suite.step("should have correct number of sections");
    match page.sections().await {
        Ok(sections) => {
            step.log(format!("Sections found: {}", sections.len()));
            step.check_len("sections", expect.section_count, sections.len());
        }
        Err(err) => step.fail(err),
    }
    step.finish()
}

/// Without a configured count any non-empty set passes
async fn links_step(
    suite: &Suite,
    page: &dyn PageObject,
    expect: &StructureExpectations,
) -> TestResult {
    let mut step = suite.step("should have correct number of links");
    match page.links().await {
        Ok(links) => {
            step.log(format!("Links found: {}", links.len()));
            for (i, link) in links.iter().enumerate() {
                step.log(format!("  Link {}: {}", i + 1, link));
            }
            match expect.link_count {
                Some(count) => {
                    step.check_len("links", count, links.len());
                }
                None => {
                    step.check(!links.is_empty(), "no links found");
                }
            }
        }
        Err(err) => step.fail(err),
    }
    step.finish()
}
