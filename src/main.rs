use clap::Parser;
use site_probe::config::HarnessConfig;
use site_probe::driver::WebDriverLauncher;
use site_probe::pages::{InteractiveScenario, PageObject, build_page};
use site_probe::results::TestResult;
use site_probe::{generate_html_report, suites};
use std::fs::{self, OpenOptions};
use std::path::Path;

mod args;
use args::{Args, Command, SiteArg, SuiteArg};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    let ok = match args.command {
        Command::Check { site, url, config } => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
            match load_config(config.as_deref()) {
                Some(config) => check(&config, site, url).await,
                None => false,
            }
        }
        Command::Suite {
            site,
            config,
            report,
            log_file,
        } => {
            if let Err(e) = init_file_logger(&log_file) {
                eprintln!("Failed to open log file {}: {}", log_file.display(), e);
                std::process::exit(1);
            }
            match load_config(config.as_deref()) {
                Some(config) => run_suites(&config, site, &report).await,
                None => false,
            }
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

/// Appends log records to `path`, creating its directory if needed
fn init_file_logger(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Option<HarnessConfig> {
    let mut config = match path {
        Some(path) => match HarnessConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load configuration: {}", e);
                return None;
            }
        },
        None => HarnessConfig::default(),
    };

    // Override the WebDriver URL with an environment variable if provided
    config.apply_webdriver_override(std::env::var("WEBDRIVER_URL").ok());
    Some(config)
}

async fn check(config: &HarnessConfig, site: SiteArg, url: Option<String>) -> bool {
    let mut site = match site {
        SiteArg::Home => config.home.clone(),
        SiteArg::Sandbox => config.sandbox.clone(),
    };
    if let Some(url) = url {
        site.url = url;
    }

    let page = match build_page(&site, config) {
        Ok(page) => page,
        Err(e) => {
            ::log::error!("{}", e);
            return false;
        }
    };

    ::log::info!("Checking structure of {}", page.url());
    match report_structure(page.as_ref()).await {
        Ok(()) => true,
        Err(e) => {
            ::log::error!("Error: {}", e);
            false
        }
    }
}

async fn report_structure(page: &dyn PageObject) -> Result<(), site_probe::PageError> {
    page.verify_structure().await?;

    let title = page.title().await?;
    ::log::info!("Title: {}", title);

    let sections = page.sections().await?;
    ::log::info!("Number of sections: {}", sections.len());

    let links = page.links().await?;
    ::log::info!("Number of links: {}", links.len());
    Ok(())
}

async fn run_suites(config: &HarnessConfig, which: SuiteArg, report: &Path) -> bool {
    let start_time = std::time::Instant::now();
    let mut results: Vec<TestResult> = Vec::new();
    let mut ok = true;

    if which.includes(SiteArg::Home) {
        match build_page(&config.home, config) {
            Ok(page) => results.push(suites::home(page.as_ref(), &config.home.expect).await),
            Err(e) => {
                ::log::error!("Cannot build home page: {}", e);
                ok = false;
            }
        }
    }

    if which.includes(SiteArg::Sandbox) {
        match InteractiveScenario::<WebDriverLauncher>::from_config(&config.sandbox, config) {
            Ok(scenario) => {
                results.push(suites::sandbox(&scenario, &config.sandbox.expect).await)
            }
            Err(e) => {
                ::log::error!("Cannot build sandbox scenario: {}", e);
                ok = false;
            }
        }
    }

    ok &= results.iter().all(TestResult::passed);

    if let Some(parent) = report.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            ::log::error!("Failed to create {}: {}", parent.display(), e);
            return false;
        }
    }
    if let Err(e) = generate_html_report(&results, report) {
        ::log::error!("Failed to write report: {}", e);
        return false;
    }

    ::log::info!(
        "Suites complete in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    for result in &results {
        println!("{}: {}", result.name, result.status);
    }
    println!("Report written to {}", report.display());
    ok
}
