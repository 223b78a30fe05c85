#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = household_server::config::Config::from_env()?;
    household_server::web::start_web_server(config).await
}
