// file: src/main.rs
// description: commandline entry point translating arguments into a crawl and errors into exit codes
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use repo_crawler::utils::http::http_client;
use repo_crawler::utils::logging::{format_error, format_success, format_warning};
use repo_crawler::{
    Config, CrawlError, CrawlRequest, CrawlStats, Credentials, FilterSpec, GitHubFileSystem,
    GitHubRefVerifier, OutputTarget, RefVerifier, RemoteFileSystem, SkipRefCheck, Validator,
    crawl_repository,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "crawl-repo")]
#[command(version)]
#[command(
    about = "Crawl a GitHub repository and print each file's contents with line numbers.",
    long_about = None
)]
struct Cli {
    /// Repository to crawl: 'org/repo:branch', 'org/repo' (branch 'main'),
    /// or 'github://org/repo/branch[/optional/path]'
    github_path: String,

    /// File extensions to include (e.g. py txt); only these files are printed
    #[arg(long, num_args = 0.., value_name = "EXT", conflicts_with = "exclude")]
    include: Vec<String>,

    /// File extensions to exclude (e.g. svg png)
    #[arg(long, num_args = 0.., value_name = "EXT")]
    exclude: Vec<String>,

    /// GitHub token for accessing private repositories
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, requires = "username")]
    token: Option<String>,

    /// GitHub username that owns the token (required with --token)
    #[arg(long, env = "GITHUB_USERNAME")]
    username: Option<String>,

    /// Absolute path of a file to write the transcript to, instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    /// Do not ask the API whether the branch exists before listing
    #[arg(long)]
    skip_ref_check: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    repo_crawler::utils::logging::init_logger(cli.color, cli.verbose);

    match run(cli).await {
        Ok(stats) => {
            if stats.soft_failures() > 0 {
                eprintln!(
                    "{}",
                    format_warning(&format!(
                        "{} entries could not be read; see the transcript for details",
                        stats.soft_failures()
                    ))
                );
            }
            eprintln!("{}", format_success(&stats.summary()));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", format_error(&format!("{:#}", err)));
            let code = err
                .downcast_ref::<CrawlError>()
                .map(CrawlError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<CrawlStats> {
    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        info!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    // Every usage check runs before the output file or the network is touched.
    Validator::validate_extensions(&cli.include)?;
    Validator::validate_extensions(&cli.exclude)?;
    let filters = FilterSpec::new(&cli.include, &cli.exclude)?;
    let credentials = Credentials::from_parts(cli.username, cli.token)?;
    let target = OutputTarget::from_arg(cli.output.as_deref())?;

    let request = CrawlRequest::new(&cli.github_path, filters, credentials)?
        .with_progress(config.crawl.show_progress && target.is_file());

    let client = http_client(&config.github)?;
    let verifier: Box<dyn RefVerifier> = if cli.skip_ref_check || !config.github.verify_ref {
        Box::new(SkipRefCheck)
    } else {
        Box::new(GitHubRefVerifier::new(
            client.clone(),
            config.github.api_url.clone(),
        ))
    };

    let stats = crawl_repository(
        &request,
        verifier.as_ref(),
        |req| {
            let fs: Box<dyn RemoteFileSystem> = Box::new(GitHubFileSystem::new(
                client.clone(),
                &config.github,
                req.locator.clone(),
                req.credentials.clone(),
            ));
            Ok(fs)
        },
        || target.open(),
    )
    .await?;

    Ok(stats)
}
