//! rusty-relay: drive a paired wallet through chain-specific JSON-RPC methods.

use clap::Parser;

mod app;
mod cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    tracing::info!("Starting rusty-relay");

    let app = app::App::new(&cli)?;
    app.run(&cli.command).await
}
