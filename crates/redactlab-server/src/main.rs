//! RedactLab: PII redaction server and command-line runner.

use std::path::PathBuf;
use std::sync::Arc;

use redactlab_core::{RedactLabConfig, RedactionMode};
use redactlab_runtime::PipelineRequest;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("REDACTLAB_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

fn print_help() {
    println!("RedactLab: PII detection, redaction and scoring");
    println!();
    println!("Usage: redactlab [command]");
    println!();
    println!("Commands:");
    println!("  (none)                               Start the server");
    println!("  process <input> [reference] [flags]  Redact a file and print the report as JSON");
    println!("      --remove                         Delete entities instead of masking them");
    println!("      --accurate                       Use the extractor's high-accuracy model");
    println!("  help                                 Show this help message");
}

/// `redactlab process <input> [reference] [--remove] [--accurate]`
async fn run_process(args: &[String]) -> anyhow::Result<()> {
    let mut files = Vec::new();
    let mut mode = None;
    let mut high_accuracy = None;
    for arg in args {
        match arg.as_str() {
            "--remove" => mode = Some(RedactionMode::Remove),
            "--accurate" => high_accuracy = Some(true),
            flag if flag.starts_with("--") => anyhow::bail!("Unknown flag: {}", flag),
            path => files.push(PathBuf::from(path)),
        }
    }

    let (input, reference) = match files.as_slice() {
        [input] => (input, None),
        [input, reference] => (input, Some(reference)),
        _ => anyhow::bail!("Usage: redactlab process <input-file> [reference-file] [--remove] [--accurate]"),
    };

    let text = std::fs::read_to_string(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input.display(), e))?;
    let mut request = PipelineRequest::new(text);
    if let Some(reference) = reference {
        let reference_text = std::fs::read_to_string(reference)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", reference.display(), e))?;
        request = request.with_reference(reference_text);
    }
    request.mode = mode;
    request.high_accuracy = high_accuracy;

    let config = RedactLabConfig::from_env(resolve_data_dir())?;
    let state = AppState::new(config);
    let report = state
        .orchestrator
        .run(state.extractor.as_ref(), request)
        .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `process` output stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "process" => return run_process(&args[2..]).await,
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'redactlab help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal server startup
    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = RedactLabConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = Arc::new(AppState::new(config));
    info!(
        "Extractor: {} (available: {})",
        state.extractor.name(),
        state.extractor.is_available()
    );

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("RedactLab server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
