use anyhow::Result;
use std::thread;
use std::time::Duration;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::lsp::backend::Backend;
use crate::Config;

/// Environment variable that makes the server exit shortly after start (integration tests)
pub const TEST_EXIT_ENV: &str = "SVG_DATA_LS_TEST_EXIT";

/// Start the LSP server on stdio
pub async fn serve(config: Config) -> Result<()> {
    if let Some(path) = &config.settings_path {
        log::info!("Using settings from {}", path.display());
    }

    // Lets the integration tests read stdout to EOF
    if std::env::var(TEST_EXIT_ENV).as_deref() == Ok("1") {
        thread::spawn(|| {
            thread::sleep(Duration::from_secs(1));
            std::process::exit(0);
        });
    }

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, config)).finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
