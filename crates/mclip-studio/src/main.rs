//! mclip command-line studio.

mod cli;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, LogFormat};

const CRATES: &[&str] = &[
    "mclip",
    "mclip_studio",
    "mclip_veo",
    "mclip_firestore",
    "mclip_storage",
    "mclip_media",
];

fn init_tracing(level: &str, format: LogFormat) {
    // RUST_LOG wins over --log-level
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES
            .iter()
            .map(|krate| format!("{}={}", krate, level))
            .collect();
        EnvFilter::new(format!("warn,{}", directives.join(",")))
    });

    // Logs go to stderr so --json output stays parseable.
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init(),
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install rustls crypto provider");
        std::process::exit(1);
    }

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    if let Err(e) = cli::run(cli).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
