use std::sync::Arc;

use tracing::{error, info};

use tokio_httpbin::config::Config;
use tokio_httpbin::handlers::{routes, HandlerContext};
use tokio_httpbin::server::{ResolverChain, RouteResolver, Server, ServerConfig, StaticResolver};
use tokio_httpbin::{logging, VERSION};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let config = Config::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    logging::init(&config.logging);
    info!("Starting tokio_httpbin {}", VERSION);
    config.log_summary();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.worker_count())
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), BoxError> {
    let ctx = Arc::new(HandlerContext::new(
        config.server.static_dir.clone(),
        config.server.template_dir.clone(),
    ));
    let table = routes(ctx, config.middleware.session_tokens.clone())?;
    info!("Registered {} routes", table.len());

    let resolver = ResolverChain::new()
        .with(RouteResolver::new(Arc::new(table)))
        .with(StaticResolver::new("/static/", config.server.static_dir.clone()))
        .with(StaticResolver::new("/", config.server.api_docs_dir.clone()));

    let server = Arc::new(Server::bind(ServerConfig::from_app_config(&config), Arc::new(resolver)).await?);

    let runner = {
        let server = Arc::clone(&server);
        tokio::spawn(async move {
            if let Err(e) = server.run().await {
                error!("Server error: {}", e);
            }
        })
    };

    shutdown_signal().await;
    info!("Shutting down...");

    server.trigger_shutdown();
    let _ = runner.await;

    if server.wait_for_drain(server.drain_timeout()).await {
        info!("All connections drained");
    }

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
