use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::{Map, Value};
use tracing::{error, info, warn};
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

use mafrepo::{
    analyzer::mafrepo::SAMPLE_ID_KEY,
    config::{
        context::{build_context, MafRepoContext},
        schema::{load_config, MafRepoConfig},
    },
};

#[cfg(feature = "frontend-http")]
use mafrepo::frontend::http::run_server;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    #[clap(short, long, default_value = "mafrepo.toml")]
    config: PathBuf,

    /// Request the simple variants of this sample, print them and exit
    #[clap(long)]
    sample_id: Option<String>,

    #[clap(long)]
    json_logs: bool,
}

fn prepare_tracing(json_logs: bool) {
    // Forward `log` records from sqlx, reqwest and warp
    LogTracer::init().expect("Error installing the log forwarder");

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Logs go to stderr, stdout is reserved for one-off request output
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let result = if json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.expect("Error setting the global tracing subscriber");
}

async fn request_once(context: &MafRepoContext, sample_id: String) -> ExitCode {
    let input = Map::from_iter([(SAMPLE_ID_KEY.to_string(), Value::String(sample_id))]);

    match context.analyzer.request_simple_variants(&input).await {
        Ok(records) => match serde_json::to_string_pretty(&records) {
            Ok(output) => {
                println!("{output}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("Error serializing the output records: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            error!("Error requesting simple variants: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "frontend-http")]
async fn serve(context: MafRepoContext, config: &MafRepoConfig) -> ExitCode {
    let Some(http) = config.frontend.http.clone() else {
        warn!("No frontends configured. You will not be able to request any variants.");
        return ExitCode::SUCCESS;
    };

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Error listening for the shutdown signal: {err}");
        }
        info!("Shutting down...");
    };

    match run_server(context.analyzer, http, shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "frontend-http"))]
async fn serve(_context: MafRepoContext, _config: &MafRepoConfig) -> ExitCode {
    warn!("Built without the HTTP frontend; pass --sample-id to run a single request");
    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    prepare_tracing(args.json_logs);

    info!("Starting mafrepo {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config, None).expect("Error loading config");
    let context = build_context(&config)
        .await
        .expect("Error building the catalog store");

    match args.sample_id {
        Some(sample_id) => request_once(&context, sample_id).await,
        None => serve(context, &config).await,
    }
}
