//! Command-line interface for signal-scout
//!
//! # Usage
//!
//! ```bash
//! # Optional credentials
//! export TWITTER_BEARER_TOKEN="..."
//! export ALPHA_VANTAGE_API_KEY="..."
//!
//! scout discover --mode news
//! scout discover --mode social --profile micro_cap --json
//! scout discover --profile sector_growth --sector Healthcare
//! scout quote TLRY
//! scout volume --watch GME,AMC --threshold 3
//! scout score "XYZ surges after earnings beat"
//! scout profiles
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use scout_discovery::pipeline::volume_detector;
use scout_discovery::{
    DiscoveryMode, DiscoveryPipeline, ScoutConfig, Symbol, VolumeSpikeReport, register_all,
};
use scout_tools::ToolRegistry;
use scout_utils::LogFormat;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(about = "Discover low-priced stocks from news and social chatter", long_about = None)]
struct Args {
    /// JSON configuration file (`${VAR}` references are resolved)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fallback log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn,scout_discovery=info")]
    log_level: String,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan news and social sources for candidate tickers
    Discover {
        /// news, social or combined
        #[arg(short, long, default_value = "combined")]
        mode: DiscoveryMode,

        /// Scan profile (see `scout profiles`)
        #[arg(short, long)]
        profile: Option<String>,

        /// Gate one ingestion against every configured profile
        #[arg(long, conflicts_with = "profile")]
        all_profiles: bool,

        /// Only accept candidates in this sector
        #[arg(long, conflicts_with = "all_profiles")]
        sector: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan a watchlist for unusual trading volume
    Volume {
        /// Comma-separated symbols (defaults to the configured watchlist)
        #[arg(short, long, value_delimiter = ',')]
        watch: Vec<Symbol>,

        /// Flag when volume exceeds this multiple of the prior average
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Maximum number of spikes to show
        #[arg(long)]
        top: Option<usize>,

        /// Print the scan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show price, sector and growth fields for one ticker
    Quote {
        symbol: String,

        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score one headline or post
    Score {
        text: String,
    },

    /// List the available scan profiles
    Profiles,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ScoutConfig> {
    let config = match path {
        Some(path) => ScoutConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ScoutConfig::default(),
    };
    Ok(config.with_env_keys())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    scout_utils::init_tracing_with(&args.log_level, format);

    let mut config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Discover {
            mode,
            profile,
            all_profiles,
            sector,
            json,
        } => {
            info!(%mode, "Starting discovery");
            let mut pipeline = DiscoveryPipeline::from_config(&config, mode, profile.as_deref())?;
            if let Some(sector) = sector {
                pipeline = pipeline.with_sector(sector);
            }

            let reports = if all_profiles {
                pipeline.run_profiles(&config.profiles).await
            } else {
                vec![pipeline.run().await]
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", report.render());
                }
            }
        }

        Command::Volume {
            watch,
            threshold,
            top,
            json,
        } => {
            if !watch.is_empty() {
                config.volume.watchlist = watch;
            }
            if let Some(threshold) = threshold {
                config.volume.ratio_threshold = threshold;
            }
            if let Some(top) = top {
                config.volume.top_n = top;
            }

            let detector = volume_detector(&config)?;
            let report = VolumeSpikeReport::new(detector.scan().await, config.volume.ratio_threshold);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.render());
            }
        }

        Command::Quote { symbol, json } => {
            let registry = ToolRegistry::new();
            register_all(&registry, Arc::new(config))?;

            let output = registry
                .invoke("quote_ticker", json!({ "symbol": symbol }))
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", output["report"].as_str().unwrap_or_default());
            }
        }

        Command::Score { text } => {
            let registry = ToolRegistry::new();
            register_all(&registry, Arc::new(config))?;

            let output = registry
                .invoke("headline_sentiment", json!({ "text": text }))
                .await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Profiles => {
            for profile in &config.profiles {
                let mut line = format!(
                    "{:<18} price <= ${:<6} market cap >= ${:<12} mentions >= {} ({} social-only) sentiment > {:.2} top {}",
                    profile.name,
                    profile.price_ceiling,
                    profile.market_cap_floor,
                    profile.min_mentions,
                    profile.min_mentions.max(profile.min_social_mentions),
                    profile.sentiment_floor,
                    profile.top_n
                );
                if let Some(score) = profile.min_growth_score {
                    line.push_str(&format!(" growth >= {score}"));
                }
                if let Some(sector) = &profile.sector {
                    line.push_str(&format!(" sector {sector}"));
                }
                println!("{line}");
            }
        }
    }

    Ok(())
}
