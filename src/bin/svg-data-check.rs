use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

use svg_data_validator::config::{CheckArgs, Config};
use svg_data_validator::export;
use svg_data_validator::report;
use svg_data_validator::validation::validate_document_with;
use svg_data_validator::watch::watch_file;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = CheckArgs::parse();
    let config = Config::from_args(&args.common)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let mut clean = run_once(&args, &config, &content)?;

    if args.watch {
        // The exit code follows the last run
        watch_file(&args.file, |content| {
            clean = run_once(&args, &config, content)?;
            Ok(())
        })
        .await?;
    }

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Validate, print the report and save if asked. Returns whether the document is clean.
fn run_once(args: &CheckArgs, config: &Config, content: &str) -> Result<bool> {
    let result = validate_document_with(content, &config.validation_options());
    let file = args.file.display().to_string();
    print!("{}", report::render(&file, &result, args.format)?);

    if let Some(target) = &args.save {
        let target = match target {
            Some(path) => path.as_path(),
            None => args
                .file
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new(".")),
        };
        let saved = export::save_document_as(content, target, &config.output_file)?;
        eprintln!("Saved {}", saved.display());
    }

    Ok(result.is_clean())
}
