use std::path::{Path, PathBuf};

use canvas::engine::{EngineConfig, EngineCore};
use canvas::relations::RelationPayload;
use canvas::scene::{Scene, SceneError};
use clap::{Parser, Subcommand};


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sink returned HTTP {status} for {path}")]
    Status { status: u16, path: String },
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("threshold must be a finite, non-negative number, got {0}")]
    InvalidThreshold(f64),
}

#[derive(Parser, Debug)]
#[command(name = "arrowboard-cli", about = "Rebuild and submit arrow relations for a diagram scene")]
struct Cli {
    #[arg(long, env = "ARROWBOARD_BASE_URL", default_value = "http://127.0.0.1:5000")]
    base_url: String,

    /// Proximity threshold; a scene file's own threshold takes precedence.
    #[arg(long, env = "ARROWBOARD_THRESHOLD", default_value_t = 0.0)]
    threshold: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the relation set of a scene, one `source, target` per line.
    Relations { scene: PathBuf },
    /// Submit the relation set of a scene to the sink.
    Submit { scene: PathBuf },
    /// Check that the sink is up.
    Ping,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    threshold: f64,
}

impl CliContext {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, threshold: cli.threshold };

    match cli.command {
        Command::Relations { scene } => run_relations(&ctx, &scene),
        Command::Submit { scene } => run_submit(&ctx, &scene).await,
        Command::Ping => run_ping(&ctx).await,
    }
}

fn run_relations(ctx: &CliContext, scene: &Path) -> Result<(), CliError> {
    let core = load_scene(ctx, scene)?;
    for item in core.relations().items() {
        println!("{item}");
    }
    Ok(())
}

async fn run_submit(ctx: &CliContext, scene: &Path) -> Result<(), CliError> {
    let core = load_scene(ctx, scene)?;
    let payload = core.payload();
    let echoed = match submit(ctx, &payload).await {
        Ok(echoed) => echoed,
        Err(e) => {
            tracing::error!(error = %e, items = payload.items.len(), "submission failed");
            return Err(e);
        }
    };
    for item in echoed {
        println!("{item}");
    }
    Ok(())
}

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let path = "/healthz";
    let response = reqwest::Client::new().get(ctx.url(path)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Status { status: status.as_u16(), path: path.to_owned() });
    }
    println!("ok");
    Ok(())
}

/// POST a payload to the sink and return the items it echoed back.
async fn submit(ctx: &CliContext, payload: &RelationPayload) -> Result<Vec<String>, CliError> {
    let path = "/api/post_data";
    let response = reqwest::Client::new().post(ctx.url(path)).json(payload).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Status { status: status.as_u16(), path: path.to_owned() });
    }
    tracing::info!(items = payload.items.len(), "relation set submitted");
    Ok(response.json().await?)
}

fn load_scene(ctx: &CliContext, path: &Path) -> Result<EngineCore, CliError> {
    if !ctx.threshold.is_finite() || ctx.threshold < 0.0 {
        return Err(CliError::InvalidThreshold(ctx.threshold));
    }
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_owned(), source })?;
    let scene = Scene::from_json(&text)?;
    let config = EngineConfig { threshold: ctx.threshold, ..EngineConfig::default() };
    let core = scene.into_engine(config)?;
    tracing::debug!(shapes = core.doc.len(), relations = core.relations().len(), "scene loaded");
    Ok(core)
}
