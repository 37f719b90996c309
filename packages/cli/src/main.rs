use todo_cli::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    todo_cli::init_tracing();

    let config = Config::from_env()?;
    todo_cli::run_server(config).await
}
