/*
[INPUT]:  CLI arguments, optional YAML configuration file, KC_KEYMASTER_URL
[OUTPUT]: Command result printed to stdout as pretty JSON
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use keymaster_cli::{Cli, CliConfig, execute};
use keymaster_sdk::KeymasterClient;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = load_config(args.config_path.as_deref())?.with_overrides(
        args.url.clone(),
        args.timeout_secs,
        args.wait,
        args.max_retries,
    );
    debug!(?config, "configuration loaded");

    let client =
        KeymasterClient::with_config(config.client_config()).context("build keymaster client")?;

    if config.wait_until_ready {
        ensure!(
            client.wait_until_ready(&config.wait_options()).await,
            "keymaster at {} is not ready",
            client.url()
        );
        info!(url = %client.url(), "keymaster ready");
    }

    let output = execute(&client, args.command).await?;
    let rendered = serde_json::to_string_pretty(&output).context("render output")?;
    println!("{rendered}");

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

/// An explicit `--config` must exist; the default location is optional
fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    if let Some(path) = path {
        return CliConfig::from_file(path)
            .with_context(|| format!("load config {}", path.display()));
    }

    match CliConfig::default_path().filter(|path| path.is_file()) {
        Some(path) => {
            CliConfig::from_file(&path).with_context(|| format!("load config {}", path.display()))
        }
        None => Ok(CliConfig::default()),
    }
}
