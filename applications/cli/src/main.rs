/// Nghe - command-line music streaming client
use clap::Parser;
use nghe_cli::{AppConfig, Command};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nghe")]
#[command(about = "Nghe music streaming client", long_about = None, version)]
struct Cli {
    /// Configuration file path (defaults to ./nghe.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "nghe=info,nghe_cli=info,nghe_client=info,nghe_playback=info,nghe_screens=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let output = nghe_cli::run(cli.command, &config).await?;
    println!("{}", output);

    Ok(())
}
