use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use route_compiler::config::{CompilerConfig, ConfigOverrides, EnvVars};
use route_compiler::logging;
use route_compiler::pipeline::{compile_routes, generate};
use route_compiler::watch::RouteWatcher;

/// Generate the app's route table from the pages directory and keep it up
/// to date while files change.
#[derive(Parser, Debug)]
#[command(name = "route-compiler", version, about)]
struct Cli {
    /// Project root; relative paths are resolved against it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Pages directory (default: <root>/<ROUTER_CONFIG>/pages)
    #[arg(long)]
    pages: Option<PathBuf>,

    /// Output directory for the generated files (default: .router next to pages)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Regex matched against page-relative paths; files that match are skipped
    #[arg(long = "exclude", value_name = "REGEX")]
    exclude: Vec<String>,

    /// Import prefix for route files
    #[arg(long)]
    prefix: Option<String>,

    /// Module the generated table imports the layout from
    #[arg(long)]
    layout: Option<String>,

    /// Debounce delay for the watcher in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Generate once and exit
    #[arg(long)]
    once: bool,

    /// Dotenv file merged into the environment (default: <root>/.env)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Print the route table as JSON and exit without writing files
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            pages_dir: self.pages.as_ref().map(|p| self.root.join(p)),
            output_dir: self.out.as_ref().map(|p| self.root.join(p)),
            exclude: self.exclude.clone(),
            prefix: self.prefix.clone(),
            layout_module: self.layout.clone(),
            debounce_ms: self.debounce_ms,
            watch: Some(!self.once),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_file = cli
        .env_file
        .clone()
        .unwrap_or_else(|| cli.root.join(".env"));
    let env = EnvVars::from_process().merge_dotenv(&env_file);
    logging::init(env.get("RUST_LOG"));

    let config = CompilerConfig::resolve(cli.root.clone(), &env, cli.overrides());
    tracing::debug!("{config:?}");

    if cli.json {
        let table = compile_routes(&config.compile_options())?;
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    match generate(&config) {
        Ok(_) => tracing::info!("routes generated"),
        Err(e) if !config.watch => return Err(e.into()),
        Err(e) => tracing::error!("route generation failed: {e}"),
    }

    if !config.watch {
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        let watcher = RouteWatcher::new(&config.pages_dir, config.debounce)?;
        watcher
            .run(
                || {
                    if let Err(e) = generate(&config) {
                        tracing::error!("route generation failed: {e}");
                    }
                },
                shutdown_signal(),
            )
            .await;
        Ok::<(), anyhow::Error>(())
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("cannot listen for SIGTERM: {e}");
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
    tracing::info!("shutting down");
}
