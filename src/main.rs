use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;
use testforge::args::CommonArgs;
use testforge::config::Config;
use testforge::theme as t;
use testforge::{providers, scrape, scripts, testcases};

#[derive(Debug, Parser)]
#[command(
    name = "testforge",
    version,
    about = "testforge — scrape a page, synthesize test cases, generate Selenium scripts"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the target page into an element listing
    Scrape {
        /// Page to scrape (default: target_url from config)
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
    /// Generate test cases from the element listing
    Testcases {
        /// Number of test cases to request
        #[arg(long, value_name = "N")]
        count: Option<usize>,
    },
    /// Generate Selenium scripts from the test-case table
    Scripts,
    /// Run all three stages in order
    Run {
        /// Page to scrape (default: target_url from config)
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        /// Number of test cases to request
        #[arg(long, value_name = "N")]
        count: Option<usize>,
    },
    /// List the supported LLM providers
    Providers,
}

fn http_client() -> Result<reqwest::Client> {
    // Client-wide timeout sized for LLM completions; page fetches tighten
    // it per request (scrape::FETCH_TIMEOUT).
    reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .user_agent(concat!("testforge/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    t::init_color(cli.common.no_color);

    let mut config = Config::load(cli.common.config_path())?;
    cli.common.apply_overrides(&mut config);

    match cli.command {
        Commands::Providers => {
            println!("{}", t::heading("Supported providers"));
            for def in providers::PROVIDERS {
                println!("{}", t::label_value(def.id, def.display));
                println!(
                    "    {}",
                    t::muted(&format!(
                        "key: {}  model: {}",
                        def.api_key_env.unwrap_or("none"),
                        def.default_model.unwrap_or("(set in config)"),
                    ))
                );
            }
            Ok(())
        }
        Commands::Scrape { url } => {
            let http = http_client()?;
            scrape::run(&http, &config, url.as_deref()).await?;
            Ok(())
        }
        Commands::Testcases { count } => {
            let http = http_client()?;
            testcases::run(&http, &config, count).await?;
            Ok(())
        }
        Commands::Scripts => {
            let http = http_client()?;
            scripts::run(&http, &config).await?;
            Ok(())
        }
        Commands::Run { url, count } => {
            let http = http_client()?;
            scrape::run(&http, &config, url.as_deref()).await?;
            testcases::run(&http, &config, count).await?;
            scripts::run(&http, &config).await?;
            println!("{}", t::icon_ok("Pipeline complete"));
            Ok(())
        }
    }
}
