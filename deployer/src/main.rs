//! Deployer - Entry Point
//!
//! Deploys a service described in a JSON spec file to one or more hosting
//! providers and prints a per-provider summary.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;
use tracing::{error, info, warn};

use deployer::deploy::history::DeploymentHistory;
use deployer::deploy::orchestrator::Orchestrator;
use deployer::deploy::watcher::WaitOutcome;
use deployer::filesys::file::File;
use deployer::logs::{init_logging, LogOptions};
use deployer::models::deployment::{DeploymentResult, DeploymentSpec, DeploymentStatus};
use deployer::storage::settings::{Settings, DEFAULT_SETTINGS_FILE};
use deployer::utils::{split_list, version_info};

const USAGE: &str = "\
Usage:
  deployer --spec=PATH --repo=URL [--providers=a,b] [--wait] [--settings=PATH]
  deployer --status --provider=NAME --service=ID --deployment=ID [--settings=PATH]
  deployer --supported
  deployer --version";

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{version}"),
            Err(e) => eprintln!("Failed to render version info: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    if cli_args.contains_key("supported") {
        for name in Orchestrator::new().get_supported_providers() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    if cli_args.contains_key("help") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    tokio::select! {
        result = run(&cli_args) => match result {
            Ok(code) => code,
            Err(e) => {
                error!("{:#}", e);
                eprintln!("{} {:#}", "error:".red().bold(), e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            // remote deployments keep running; only the local wait stops
            info!("Ctrl+C received, shutting down...");
            ExitCode::from(130)
        }
    }
}

async fn run(cli_args: &HashMap<String, String>) -> anyhow::Result<ExitCode> {
    let settings_path = cli_args
        .get("settings")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = Settings::load(&File::new(settings_path))
        .await?
        .with_env_keys(|name| env::var(name).ok());

    let log_options = LogOptions {
        log_level: settings.log_level,
        log_dir: settings.log_dir.as_ref().map(PathBuf::from),
        json_format: settings.log_json,
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let mut orchestrator = Orchestrator::new();
    for config in settings.provider_configs() {
        if let Err(e) = orchestrator.add_provider(&config.name, config.api_key, &config.options) {
            warn!("Skipping provider {}: {}", config.name, e);
        }
    }
    info!(
        "Configured providers: {:?}",
        orchestrator.get_configured_providers()
    );

    if cli_args.contains_key("status") {
        return show_status(&orchestrator, cli_args).await;
    }

    let spec_path = cli_args.get("spec").context("missing --spec=PATH")?;
    let repo_url = cli_args.get("repo").context("missing --repo=URL")?;
    let spec: DeploymentSpec = File::new(spec_path)
        .read_json()
        .await
        .with_context(|| format!("unable to read deployment spec {spec_path}"))?;

    let targets = cli_args
        .get("providers")
        .map(|list| split_list(list))
        .unwrap_or_default();
    if targets.is_empty() && orchestrator.get_configured_providers().is_empty() {
        bail!("no providers configured; add API keys to the settings file or DEPLOYER_<PROVIDER>_API_KEY");
    }

    let results = orchestrator
        .deploy_to_providers(&targets, &spec, repo_url)
        .await?;

    let history = DeploymentHistory::default();
    let record = history.record(&spec.name, repo_url, results);
    info!("Recorded deployment {}", record.id);

    let mut failed = 0;
    for name in &record.providers {
        let result = &record.results[name];
        print_result(result);
        if !result.is_success() {
            failed += 1;
        }
    }

    if cli_args.contains_key("wait") {
        let options = settings.watch.wait_options();
        for name in &record.providers {
            let result = &record.results[name];
            if !result.is_success() || result.deployment_id.is_empty() {
                continue;
            }
            let outcome = orchestrator
                .wait_for_deployment(name, &result.service_id, &result.deployment_id, &options)
                .await?;
            print_outcome(name, outcome);
            if outcome.status() == DeploymentStatus::Failed {
                failed += 1;
            }
        }

        if let Some(refreshed) = history.refresh_statuses(&orchestrator, &record.id).await {
            println!("{}", "Final status".bold());
            for name in &refreshed.providers {
                print_result(&refreshed.results[name]);
            }
        }
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn show_status(
    orchestrator: &Orchestrator,
    cli_args: &HashMap<String, String>,
) -> anyhow::Result<ExitCode> {
    let provider = cli_args.get("provider").context("missing --provider=NAME")?;
    let service = cli_args.get("service").context("missing --service=ID")?;
    let deployment = cli_args.get("deployment").context("missing --deployment=ID")?;

    let status = orchestrator
        .get_deployment_status(provider, service, deployment)
        .await?;
    println!("{} {}", provider.bold(), paint_status(status));
    Ok(ExitCode::SUCCESS)
}

fn print_result(result: &DeploymentResult) {
    let line = if result.is_success() {
        format!("{} {}", paint_status(result.status), result.url)
    } else {
        format!(
            "{} {}",
            paint_status(result.status),
            result.error.as_deref().unwrap_or_default()
        )
    };
    println!("{:<8} {}", result.provider.bold(), line);
}

fn print_outcome(name: &str, outcome: WaitOutcome) {
    match outcome {
        WaitOutcome::Finished(status) => {
            println!("{:<8} finished: {}", name.bold(), paint_status(status))
        }
        WaitOutcome::TimedOut(status) => println!(
            "{:<8} still {} when polling stopped",
            name.bold(),
            paint_status(status)
        ),
    }
}

fn paint_status(status: DeploymentStatus) -> colored::ColoredString {
    match status {
        DeploymentStatus::Success => status.as_str().green(),
        DeploymentStatus::Failed => status.as_str().red(),
        DeploymentStatus::Cancelled => status.as_str().dimmed(),
        _ => status.as_str().yellow(),
    }
}
