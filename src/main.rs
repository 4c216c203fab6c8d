use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cricket_insights::api::{build_router, state::AppState};
use cricket_insights::config::AppConfig;
use cricket_insights::insights::{
    analyze_match, compute_fall_of_wickets, compute_head_to_head_with_recent,
    compute_momentum_data, find_related_matches, parse_match_date, sort_matches,
    summarize_for_thirty_seconds, MatchFilter, SortMode,
};
use cricket_insights::models::{AnalyzedMatch, Match, Tag, TeamId};
use cricket_insights::storage::{
    find_match, load_analyzed_matches, read_standings, write_insights, StorageConfig,
};

#[derive(Parser)]
#[command(name = "cricket-insights")]
#[command(about = "Narrative and analytical insights for T20 cricket matches")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
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
    /// Print a match's insights as JSON
    Insights { id: String },

    /// Print the thirty-second summary of a match
    Summary { id: String },

    /// Print fall of wickets and per-over momentum
    Timeline { id: String },

    /// List matches related to a match
    Related {
        id: String,

        /// Maximum number of matches (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Head-to-head record between two teams
    HeadToHead { team_a: String, team_b: String },

    /// List matches, filtered and sorted
    List {
        /// newest, closest, biggestWin, mostWickets, highestChase
        #[arg(long, default_value = "newest")]
        sort: String,

        /// Required tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Only matches involving this team id
        #[arg(long)]
        team: Option<String>,

        /// Earliest match date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: Option<String>,

        /// Latest match date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        to: Option<String>,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Analyze every match and write the insight snapshot
    Derive {
        /// Analyze without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (default from config)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn load_match(storage: &StorageConfig, id: &str) -> Result<AnalyzedMatch> {
    let m: Match = find_match(storage, id)
        .context("Failed to read matches")?
        .with_context(|| format!("Match not found: {}", id))?;
    let standings = read_standings(storage).context("Failed to read standings")?;
    Ok(analyze_match(m, &standings))
}

fn parse_date_arg(name: &str, raw: Option<String>) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    raw.map(|s| {
        parse_match_date(&s).with_context(|| format!("Invalid --{} date: {}", name, s))
    })
    .transpose()
}

fn print_row(m: &AnalyzedMatch) {
    let r = &m.record;
    let chips = m
        .insights
        .as_ref()
        .map(|i| {
            i.highlights
                .iter()
                .map(|h| h.label())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    println!(
        "{:<10} {:<12} {} {}/{} v {} {}/{}  {}  [{}]",
        r.id,
        r.date.get(..10).unwrap_or(&r.date),
        r.teams.home.label("Team A"),
        r.score.home.runs,
        r.score.home.wickets,
        r.teams.away.label("Team B"),
        r.score.away.runs,
        r.score.away.wickets,
        r.result.margin,
        chips
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = AppConfig::load_optional(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    let config_found = file_config.is_some();
    let mut config = file_config.unwrap_or_default();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);

    tracing::info!("Starting cricket-insights v{}", env!("CARGO_PKG_VERSION"));
    if !config_found {
        tracing::info!("Config file {} not found, using defaults", cli.config.display());
    }

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Insights { id } => {
            let analyzed = load_match(&storage, &id)?;
            match analyzed.insights {
                Some(insights) => println!("{}", serde_json::to_string_pretty(&insights)?),
                None => println!("Match {} is {}; no insights yet", id, analyzed.record.status),
            }
        }
        Commands::Summary { id } => {
            let analyzed = load_match(&storage, &id)?;
            match summarize_for_thirty_seconds(&analyzed) {
                Some(lines) => {
                    for line in lines {
                        println!("{}", line);
                    }
                }
                None => println!("Match {} is {}; no summary yet", id, analyzed.record.status),
            }
        }
        Commands::Timeline { id } => {
            let m = find_match(&storage, &id)
                .context("Failed to read matches")?
                .with_context(|| format!("Match not found: {}", id))?;

            println!("=== Fall of Wickets ===");
            for fow in compute_fall_of_wickets(&m.balls) {
                println!(
                    "{:>2}-{:<4} over {}.{}  {}",
                    fow.wicket_num, fow.runs, fow.over, fow.ball, fow.batsman_name
                );
            }

            println!("\n=== Momentum ===");
            for over in compute_momentum_data(&m.balls) {
                println!(
                    "Over {:>2}  {:>3} runs  {} wkts  {:?}",
                    over.over, over.runs, over.wickets, over.phase
                );
            }
        }
        Commands::Related { id, limit } => {
            let all = load_analyzed_matches(&storage).context("Failed to load matches")?;
            let Some(target) = all.iter().find(|m| m.record.id == id.as_str()) else {
                bail!("Match not found: {}", id);
            };
            let limit = limit.unwrap_or(config.insights.related_limit);
            for m in find_related_matches(&target.record, &all, limit) {
                print_row(m);
            }
        }
        Commands::HeadToHead { team_a, team_b } => {
            let all = load_analyzed_matches(&storage).context("Failed to load matches")?;
            let (a, b) = (TeamId::from(team_a), TeamId::from(team_b));
            let h2h =
                compute_head_to_head_with_recent(&a, &b, &all, config.insights.recent_meetings);

            println!("=== {} v {} ===", a, b);
            println!("Meetings:  {}", h2h.total);
            println!("{} wins:  {}", a, h2h.a_wins);
            println!("{} wins:  {}", b, h2h.b_wins);
            println!("No result: {}", h2h.draws);
            println!("Avg score: {} - {}", h2h.avg_score_a, h2h.avg_score_b);
            if !h2h.recent.is_empty() {
                println!("\nRecent:");
                for m in h2h.recent {
                    print_row(m);
                }
            }
        }
        Commands::List {
            sort,
            tags,
            team,
            from,
            to,
            limit,
        } => {
            let tags = tags
                .iter()
                .map(|t| t.parse::<Tag>().map_err(|e| anyhow::anyhow!(e)))
                .collect::<Result<Vec<_>>>()?;
            let filter = MatchFilter {
                team: team.map(TeamId::from),
                from: parse_date_arg("from", from)?,
                to: parse_date_arg("to", to)?,
                tags,
            };
            let mode = SortMode::from_name(&sort);

            let all = load_analyzed_matches(&storage).context("Failed to load matches")?;
            let mut matches = filter.apply(&all);
            sort_matches(&mut matches, mode);

            println!("{} of {} matches, sorted by {}", matches.len(), all.len(), mode);
            for m in matches.iter().take(limit) {
                print_row(m);
            }
        }
        Commands::Derive { dry_run } => {
            tracing::info!("Computing match insights...");
            let analyzed = load_analyzed_matches(&storage).context("Failed to load matches")?;
            let with_insights = analyzed.iter().filter(|m| m.insights.is_some()).count();

            println!("\n=== Derive Results ===");
            println!("Matches:        {}", analyzed.len());
            println!("With insights:  {}", with_insights);

            if dry_run {
                println!("\n(dry run - no data written to disk)");
            } else {
                let written =
                    write_insights(&storage, &analyzed).context("Failed to write insights")?;
                println!("Written:        {} -> {}", written, storage.insights_path().display());
            }
        }
        Commands::Serve { host, port } => {
            if let Err(e) = storage.validate() {
                tracing::warn!("Data directory problem: {}", e);
            }

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let state = AppState::new(storage, config);
            let app = build_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
