use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use repo_finder::Config;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    color_eyre::install()?;

    let config = Config::parse();
    config.report_environment();

    let app = repo_finder::router(&config).wrap_err("failed to build the GitHub client")?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("failed to bind to {addr}"))?;
    log::info!("listening on http://{addr}");
    log::info!("GitHub API: {}", config.api_base);

    axum::serve(listener, app).await.wrap_err("server error")?;
    Ok(())
}
