//! Lookup Broker - entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use lookup_broker::{build_dispatcher, COMMIT, VERSION};
use lookup_broker_config::{BrokerConfig, ConfigLoader};
use lookup_broker_server::{Server, ServerConfig};

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "LOOKUP_BROKER";

/// Platform port variable.
const PORT_ENV: &str = "PORT";

/// Command-line arguments.
struct Args {
    config: Option<PathBuf>,
}

enum Command {
    Run(Args),
    Help,
    Version,
}

fn parse_args() -> anyhow::Result<Command> {
    let mut args = std::env::args().skip(1);
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config requires a path")?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-v" => return Ok(Command::Version),
            other => anyhow::bail!("unknown argument: {other}, use --help for usage"),
        }
    }

    Ok(Command::Run(Args { config }))
}

fn print_help() {
    println!(
        r"Lookup Broker - Open Service Broker for Cloud Foundry landscapes

USAGE:
    lookup-broker [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    PORT                                    Listen port (default: 5000)
    LANDSCAPES                              Landscape directory as a JSON object
    LOOKUP_BROKER__SERVER__HTTP_ADDR        Listen address (default: 0.0.0.0:5000)
    LOOKUP_BROKER__BROKER__LANDSCAPES_ENV   Variable holding the directory
    LOOKUP_BROKER__TELEMETRY__LOGGING__LEVEL  Log filter (default: info)
"
    );
}

fn load_config(args: &Args) -> anyhow::Result<BrokerConfig> {
    let mut loader = ConfigLoader::new().with_defaults();
    if let Some(path) = &args.config {
        loader = loader
            .with_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }

    loader
        .with_dotenv()?
        .with_port_env(PORT_ENV)
        .with_env_prefix(ENV_PREFIX)
        .load()
        .context("invalid configuration")
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    lookup_broker_telemetry::init_telemetry(&config.telemetry_config(VERSION))
        .context("failed to initialise telemetry")?;

    tracing::info!(
        addr = %config.server.http_addr,
        version = VERSION,
        commit = COMMIT,
        api_version = %config.broker.supported_api_version,
        "starting lookup broker"
    );

    let dispatcher = build_dispatcher(
        &config.broker.supported_api_version,
        config.broker.landscape_source(),
    );
    let server_config = ServerConfig::builder()
        .http_addr(&config.server.http_addr)
        .shutdown_timeout(config.shutdown_timeout())
        .request_timeout(config.request_timeout())
        .max_body_bytes(config.server.max_body_bytes)
        .build();

    Server::new(server_config, dispatcher)
        .run()
        .await
        .context("server error")
}

#[tokio::main]
async fn main() -> ExitCode {
    let command = match parse_args() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let args = match command {
        Command::Run(args) => args,
        Command::Help => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("lookup-broker {VERSION} (commit {COMMIT})");
            return ExitCode::SUCCESS;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "lookup broker stopped");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
