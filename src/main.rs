use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gltp_leaderboard::api::state::AppState;
use gltp_leaderboard::calculate::{compute_leaderboards, map_podium, summarize, SummaryError};
use gltp_leaderboard::config::AppConfig;
use gltp_leaderboard::enrich::{enrich_summary, HttpProfileLookup};
use gltp_leaderboard::fetch::Fetcher;
use gltp_leaderboard::identity::resolve_display_name;
use gltp_leaderboard::ingest;
use gltp_leaderboard::models::{BoardId, Leaderboard, PlayerSummary, RecordSnapshot, StatKind};
use gltp_leaderboard::{format_record_time, storage};

#[derive(Parser)]
#[command(name = "gltp-leaderboard")]
#[command(about = "Leaderboards and player profiles for gravity-map world records")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Record file, overriding the configured source
    #[arg(long)]
    records: Option<PathBuf>,

    /// Map metadata file, overriding the configured source
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to the
    /// configured level
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print leaderboards
    Leaderboard {
        /// Single board to print (e.g. "speed-solo", "games-completed")
        #[arg(long)]
        board: Option<String>,

        /// Rows per board
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Print a player profile
    Player {
        /// Name, user id, or merge-group member
        query: String,

        /// Look up canonical names on the profile site
        #[arg(long)]
        enrich: bool,
    },

    /// Print the top records of one map
    Podium {
        map_id: String,

        /// "speed" or "jump"
        #[arg(long, default_value = "speed")]
        stat: String,

        #[arg(long, default_value = "3")]
        top: usize,
    },

    /// Fetch the remote feeds and write them to a directory
    Snapshot {
        #[arg(long)]
        out: PathBuf,
    },

    /// Start the API server
    Serve {
        /// Bind address (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to the configured port)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = Path::new(&cli.config);
    let mut config = if path.exists() {
        AppConfig::parse_file(path).with_context(|| format!("loading {}", cli.config))?
    } else {
        AppConfig::default()
    };

    if let Some(records) = &cli.records {
        config.sources.records_path = Some(records.clone());
    }
    if let Some(metadata) = &cli.metadata {
        config.sources.metadata_path = Some(metadata.clone());
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize tracing
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting gltp-leaderboard v{}", env!("CARGO_PKG_VERSION"));

    let fetcher = Fetcher::with_defaults()?;

    match cli.command {
        Commands::Leaderboard { board, limit } => {
            let snapshot = ingest::load_snapshot(&config.sources, &fetcher).await?;
            let set = compute_leaderboards(&snapshot.records, &snapshot.metadata);

            let boards: Vec<BoardId> = match board {
                Some(id) => vec![id.parse().map_err(anyhow::Error::msg)?],
                None => BoardId::ALL.to_vec(),
            };
            for id in boards {
                print_board(id, set.board(id), limit);
            }
        }
        Commands::Player { query, enrich } => {
            let snapshot = ingest::load_snapshot(&config.sources, &fetcher).await?;
            let mut summary = match summarize(
                &query,
                &snapshot.records,
                &snapshot.metadata,
                &config.merge_groups,
            ) {
                Ok(summary) => summary,
                Err(SummaryError::NoMatch(query)) => {
                    println!("No summary found for {:?}", query);
                    return Ok(());
                }
            };

            if enrich {
                let lookup = HttpProfileLookup::new(&config.profile)?;
                enrich_summary(&mut summary, &lookup).await;
            }
            print_summary(&summary, &config);
        }
        Commands::Podium { map_id, stat, top } => {
            let stat: StatKind = stat.parse().map_err(anyhow::Error::msg)?;
            let snapshot = ingest::load_snapshot(&config.sources, &fetcher).await?;
            print_podium(&snapshot, &map_id, stat, top);
        }
        Commands::Snapshot { out } => {
            let Some(records_url) = &config.sources.records_url else {
                bail!("snapshot needs sources.records_url");
            };
            let records = fetcher.fetch_records(records_url).await?;
            let metadata = match &config.sources.metadata_url {
                Some(url) => fetcher.fetch_metadata(url).await?,
                None => Default::default(),
            };

            let (records_path, metadata_path) = storage::write_snapshot(&out, &records, &metadata)?;
            println!("Records:  {} -> {}", records.len(), records_path.display());
            println!("Metadata: {} -> {}", metadata.len(), metadata_path.display());
        }
        Commands::Serve { host, port } => {
            let snapshot = ingest::load_snapshot(&config.sources, &fetcher).await?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let lookup = if config.profile.enabled {
                Some(HttpProfileLookup::new(&config.profile)?)
            } else {
                None
            };

            let mut state = AppState::new(config, snapshot, fetcher);
            if let Some(lookup) = lookup {
                state = state.with_profile_lookup(Arc::new(lookup));
            }

            let app = gltp_leaderboard::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn print_board(id: BoardId, board: &Leaderboard, limit: usize) {
    println!("\n=== {} ({}) ===", id.title(), id);
    if board.is_empty() {
        println!("  (no entries)");
        return;
    }
    for (i, entry) in board.ranked().into_iter().take(limit).enumerate() {
        println!("{:>4}. {:<32} {:>5}", i + 1, entry.name, entry.score);
    }
}

fn print_summary(summary: &PlayerSummary, config: &AppConfig) {
    println!("\n=== {} ===", summary.display_name);
    if let Some(group) = &summary.merge_group {
        println!("Merge group:   {}", group);
    }
    if let Some(id) = &summary.user_id {
        println!(
            "Profile:       {}/profile/{}",
            config.profile.base_url.trim_end_matches('/'),
            id
        );
    }
    if !summary.aliases.is_empty() {
        println!("Aliases:       {}", summary.aliases.join(", "));
    }
    println!("First seen:    {}", summary.first_seen.format("%Y-%m-%d"));
    println!("Last seen:     {}", summary.last_seen.format("%Y-%m-%d"));
    println!("Runs:          {}", summary.total_runs);
    println!("Maps played:   {}", summary.distinct_maps);
    println!(
        "Speed badges:  {} gold, {} bronze ({} top 3)",
        summary.speed_badges.gold,
        summary.speed_badges.bronze,
        summary.speed_badges.top_3()
    );
    println!(
        "Jump badges:   {} gold, {} bronze ({} top 3)",
        summary.jump_badges.gold,
        summary.jump_badges.bronze,
        summary.jump_badges.top_3()
    );

    let completed: Vec<_> = summary.completion.iter().filter(|c| c.is_completed()).collect();
    println!(
        "\nCompleted {} of {} maps:",
        completed.len(),
        summary.completion.len()
    );
    for row in completed {
        println!(
            "  {:<32} {:>3} attempts  best {:>10}  jumps {}",
            row.map_name,
            row.attempts,
            row.best_time.map(format_record_time).unwrap_or_default(),
            row.min_jumps.map(|j| j.to_string()).unwrap_or_else(|| "-".to_string())
        );
    }
}

fn print_podium(snapshot: &RecordSnapshot, map_id: &str, stat: StatKind, top: usize) {
    let name = snapshot
        .metadata
        .get(map_id)
        .map(|m| m.map_name.as_str())
        .unwrap_or(map_id);
    println!("\n=== {} ({}) ===", name, stat);

    let podium = map_podium(snapshot, map_id, stat, top);
    if podium.is_empty() {
        println!("  (no qualifying records)");
    }
    for (i, record) in podium.into_iter().enumerate() {
        let players: Vec<&str> = record.players.iter().map(resolve_display_name).collect();
        println!(
            "{:>4}. {:>10}  jumps {:>4}  {}",
            i + 1,
            record.record_time.map(format_record_time).unwrap_or_default(),
            record
                .total_jumps
                .map(|j| j.to_string())
                .unwrap_or_else(|| "-".to_string()),
            players.join(", ")
        );
    }
}
