use crate::error::ReportError;
use crate::results::TestResult;
use handlebars::{Handlebars, handlebars_helper};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const TEMPLATE_NAME: &str = "report";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>E2E Test Report - Free Range Testers</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 20px; }
        .test { margin: 20px 0; padding: 15px; border: 1px solid #ddd; border-radius: 5px; }
        .pass { background-color: #e8f5e9; }
        .fail { background-color: #ffebee; }
        .running { color: #b8860b; }
        .log { background-color: #f5f5f5; padding: 10px; margin-top: 10px; font-family: monospace; }
        .timestamp { color: #666; font-size: 0.9em; }
        .duration { color: #666; font-style: italic; }
        .subtest { margin-left: 20px; }
    </style>
</head>
<body>
    <h1>E2E Test Report - Free Range Testers</h1>
    {{#each tests}}
    <div class="test">
        <h2>{{name}} - <span class="{{lower status}}">{{status}}</span></h2>
        <p class="timestamp">Started: {{started}}</p>
        <p class="duration">Duration: {{duration}}s</p>
        <div class="log">
            {{#each logs}}
            {{this}}<br>
            {{/each}}
        </div>
        {{#if sub_tests}}
        <div class="subtest">
            {{#each sub_tests}}
            <h3>{{name}} - <span class="{{lower status}}">{{status}}</span></h3>
            <p class="duration">Duration: {{duration}}s</p>
            <div class="log">
                {{#each logs}}
                {{this}}<br>
                {{/each}}
            </div>
            {{/each}}
        </div>
        {{/if}}
    </div>
    {{/each}}
</body>
</html>
"#;

handlebars_helper!(lower: |s: str| s.to_lowercase());

#[derive(Serialize)]
struct ReportView<'a> {
    tests: Vec<EntryView<'a>>,
}

#[derive(Serialize)]
struct EntryView<'a> {
    name: &'a str,
    status: String,
    started: String,
    duration: String,
    logs: &'a [String],
    sub_tests: Vec<EntryView<'a>>,
}

impl<'a> EntryView<'a> {
    /// Only the first level of sub-tests is rendered
    fn new(result: &'a TestResult, depth: usize) -> Self {
        let sub_tests = if depth == 0 {
            result
                .sub_tests
                .iter()
                .map(|sub| EntryView::new(sub, depth + 1))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            name: &result.name,
            status: result.status.to_string(),
            started: result.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            duration: result.duration.as_secs_f64().to_string(),
            logs: &result.logs,
            sub_tests,
        }
    }
}

/// Renders the results as a self-contained HTML document
pub fn render_html_report(results: &[TestResult]) -> Result<String, ReportError> {
    let mut registry = Handlebars::new();
    registry.register_helper("lower", Box::new(lower));
    registry.register_template_string(TEMPLATE_NAME, TEMPLATE)?;

    let view = ReportView {
        tests: results.iter().map(|r| EntryView::new(r, 0)).collect(),
    };

    Ok(registry.render(TEMPLATE_NAME, &view)?)
}

/// Renders the results and writes them to `output`, replacing any existing file.
///
/// Output depends only on `results`: rendering the same slice twice gives
/// byte-identical files.
pub fn generate_html_report(
    results: &[TestResult],
    output: impl AsRef<Path>,
) -> Result<(), ReportError> {
    let output = output.as_ref();
    let html = render_html_report(results)?;

    let io_err = |source| ReportError::Io {
        path: output.display().to_string(),
        source,
    };
    let file = File::create(output).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html.as_bytes()).map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    ::log::info!(
        "Wrote report for {} tests to {}",
        results.len(),
        output.display()
    );
    Ok(())
}
