//! Customer script runner entry point.

use std::fs::File;
use std::io::{self, BufReader};

use cli::{CliError, Config, LogFormat};
use domain::CustomerService;
use event_store::InMemoryEventStore;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the outcomes.
    let pretty = (config.log_format == LogFormat::Pretty)
        .then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr));
    let json = (config.log_format == LogFormat::Json)
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(io::stderr));
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(pretty)
        .with(json)
        .init();

    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let service = CustomerService::new(InMemoryEventStore::new());
    let stdout = io::stdout().lock();

    let summary = match &config.script {
        Some(path) => {
            tracing::info!(path = %path.display(), "running script");
            let reader = BufReader::new(File::open(path)?);
            cli::run_script(&service, reader, stdout).await?
        }
        None => {
            tracing::info!("running script from stdin");
            cli::run_script(&service, io::stdin().lock(), stdout).await?
        }
    };

    tracing::info!(
        commands = summary.commands,
        events = summary.events,
        rejected = summary.rejected,
        "script finished"
    );

    // Counters go to stderr so stdout stays one outcome per line.
    eprint!("{}", metrics_handle.render());

    Ok(())
}
