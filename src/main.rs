use std::sync::Arc;

use anyhow::Context as _;
use statsd_gateway::gateway::{self, cli::Cli, logging};
use statsd_gateway::{MetricClientTrait, StatsdClient};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.verbose).context("failed to install the log subscriber")?;

    let (config, options) = cli.into_configs();
    info!(
        "Forwarding metrics to {}:{} (autoflush: {})",
        options.host, options.port, options.autoflush
    );

    let client = Arc::new(StatsdClient::new(options));
    client.open();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build the tokio runtime")?;

    let served = runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(config.listen_addr())
            .await
            .with_context(|| format!("failed to bind {}", config.listen_addr()))?;
        info!("Listening on {}", config.listen_addr());

        let shutdown = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for ctrl-c: {err}");
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        };

        gateway::serve(listener, client.clone(), &config, shutdown)
            .await
            .context("HTTP server failed")
    });

    // The runtime owns the last handler-held clones of the client.
    drop(runtime);

    match Arc::try_unwrap(client) {
        Ok(client) => client.shutdown(),
        Err(client) => {
            warn!("Client still shared at exit, flushing without joining workers");
            client.flush();
        }
    }

    served
}
