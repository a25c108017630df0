//! scss-watch - Recompile SCSS with source maps whenever sources change.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scss_watch::compiler::SassCompiler;
use scss_watch::config::{ConfigLoader, WatchConfig};
use scss_watch::display;
use scss_watch::session::WatchSession;

#[derive(Parser)]
#[command(
    name = "scss-watch",
    about = "Watch SCSS sources and recompile them with source maps on change",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file to use instead of the default search paths.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Primary SCSS file to compile.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Where to write the compiled CSS.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory of section files that trigger recompilation.
    #[arg(long)]
    sections: Option<PathBuf>,

    /// Sass executable to run.
    #[arg(long = "sass")]
    sass_binary: Option<String>,
}

impl Cli {
    fn apply(self, mut config: WatchConfig) -> WatchConfig {
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(sections) = self.sections {
            config.sections_dir = sections;
        }
        if let Some(binary) = self.sass_binary {
            config.compiler.binary = binary;
        }
        config
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = cli
        .config
        .clone()
        .map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let config = match loader.load() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            display::print_watch_error("Invalid configuration", &e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let compiler = SassCompiler::from_config(&config.compiler);
    let session = WatchSession::new(config, compiler);

    let cancel = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, shutting down");
        }
        cancel.cancel();
    });

    let stats = session.run().await;
    display::print_session_summary(&stats);
    ExitCode::SUCCESS
}
