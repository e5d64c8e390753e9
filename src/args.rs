use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-probe")]
#[command(about = "Structural and interactive checks for the Free Range Testers sites")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify a page's structure and log its title, sections and links
    Check {
        /// Site to check
        #[arg(short, long, value_enum, default_value_t = SiteArg::Home)]
        site: SiteArg,

        /// Override the configured URL for the site
        #[arg(short, long)]
        url: Option<String>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the end-to-end suites and write an HTML report
    Suite {
        /// Suite to run
        #[arg(short, long, value_enum, default_value_t = SuiteArg::All)]
        site: SuiteArg,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where the HTML report is written
        #[arg(long, default_value = "reports/report.html")]
        report: PathBuf,

        /// File the suite log is appended to
        #[arg(long, default_value = "reports/test.log")]
        log_file: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SiteArg {
    Home,
    Sandbox,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SuiteArg {
    Home,
    Sandbox,
    All,
}

impl SuiteArg {
    pub fn includes(self, site: SiteArg) -> bool {
        match self {
            SuiteArg::All => true,
            SuiteArg::Home => site == SiteArg::Home,
            SuiteArg::Sandbox => site == SiteArg::Sandbox,
        }
    }
}
