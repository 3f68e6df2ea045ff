use anyhow::Result;
use svg_data_validator::config::Config;
use svg_data_validator::lsp::server::serve;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    serve(config).await
}
