use anyhow::Result;
use clap::Parser;
use levelup_analyzer::analyzer::Analyzer;
use levelup_analyzer::models::Config;
use levelup_analyzer::server;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "levelup-analyzer")]
#[command(about = "Serve document + query analysis backed by Gemini")]
struct CliArgs {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "levelup_analyzer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    info!("Starting levelup-analyzer");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let analyzer = Arc::new(Analyzer::from_config(&config));
    let router = server::build_router(analyzer, config.max_upload_bytes);
    let addr = SocketAddr::new(args.host, args.port);

    if let Err(e) = server::serve(addr, router).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::parse_from(["levelup-analyzer"]);
        assert_eq!(args.host.to_string(), "0.0.0.0");
        assert_eq!(args.port, 8000);
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::parse_from([
            "levelup-analyzer",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
        ]);
        assert_eq!(args.host.to_string(), "127.0.0.1");
        assert_eq!(args.port, 9000);
    }

    #[test]
    fn test_cli_rejects_bad_host() {
        assert!(CliArgs::try_parse_from(["levelup-analyzer", "--host", "nowhere"]).is_err());
    }
}
