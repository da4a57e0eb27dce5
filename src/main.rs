use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_arcade::game::GameConfig;
use snake_arcade::modes::{HumanMode, ScoresMode};
use snake_arcade::scores::{HttpScoreService, InMemoryScoreService, ScoreService};
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Terminal snake with an online scoreboard")]
struct Cli {
    /// What to run
    #[arg(long, value_enum, default_value = "human")]
    mode: Mode,

    /// TOML file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Base speed in milliseconds; the tick interval is this divided by the snake length
    #[arg(long)]
    speed_ms: Option<u64>,

    /// Seed for spawn and food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Scoreboard endpoint; scores stay in memory when omitted
    #[arg(long)]
    score_url: Option<String>,

    /// Name prefilled in the game over prompt
    #[arg(long)]
    player: Option<String>,

    /// Write logs here (the TUI owns the terminal, so logs are dropped otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Print the top scores and exit
    Scores,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.mode, cli.log_file.as_deref())?;

    let config = build_config(&cli)?;
    let scores = score_service(cli.score_url.as_deref())?;

    match cli.mode {
        Mode::Human => {
            info!(
                width = config.grid_width,
                height = config.grid_height,
                "starting interactive game"
            );
            let mut human_mode = HumanMode::new(config, scores, cli.player);
            human_mode.run().await?;
        }
        Mode::Scores => {
            let scores_mode = ScoresMode::new(scores, config.top_scores);
            scores_mode.run(&mut std::io::stdout()).await?;
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_toml_file(path)?,
        None => GameConfig::default(),
    };

    if cli.width.is_some() || cli.height.is_some() {
        let resized = GameConfig::new(
            cli.width.unwrap_or(config.grid_width),
            cli.height.unwrap_or(config.grid_height),
        );
        config.grid_width = resized.grid_width;
        config.grid_height = resized.grid_height;
        config.spawn_margin_x = resized.spawn_margin_x;
        config.spawn_margin_y = resized.spawn_margin_y;
    }
    if let Some(speed_ms) = cli.speed_ms {
        config.base_speed_ms = speed_ms;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}

fn score_service(url: Option<&str>) -> Result<Arc<dyn ScoreService>> {
    Ok(match url {
        Some(url) => Arc::new(
            HttpScoreService::new(url).context("Failed to create scoreboard client")?,
        ),
        None => Arc::new(InMemoryScoreService::new()),
    })
}

fn init_tracing(mode: Mode, log_file: Option<&std::path::Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (mode, log_file) {
        (_, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (Mode::Human, None) => builder.with_writer(std::io::sink).init(),
        (Mode::Scores, None) => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}
