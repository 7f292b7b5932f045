use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use kb_core::{Analysis, Article, Result, Source};
use kb_inference::checkpoint::{DEFAULT_FILENAME, DEFAULT_HUB_URL, DEFAULT_REPO_ID};
use kb_inference::{CheckpointConfig, Pipeline, PipelineConfig, DEFAULT_INFERENCE_URL};
use kb_scrapers::cli::{handle_command, ScraperArgs};
use kb_scrapers::{ScraperConfig, ScraperManager};
use kb_storage::{MemoryConfig, MemoryStorage};
use kb_web::{AppState, WebConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Durations such as `30s`, `15m`, `1h30m` or `2d`. A bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Duration must include a number".to_string());
        }

        let mut total_seconds = 0u64;
        let mut number = String::new();
        for c in s.chars() {
            if c.is_ascii_digit() {
                number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let value: u64 = number
                .parse()
                .map_err(|_| format!("Missing number before unit: {}", c))?;
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_seconds = value
                .checked_mul(unit)
                .and_then(|seconds| total_seconds.checked_add(seconds))
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            number.clear();
        }
        if !number.is_empty() {
            let seconds = number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(seconds)
                .ok_or_else(|| format!("Duration too large: {}", s))?;
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Klasifikasi relevansi judul dan isi berita online", long_about = None)]
struct Cli {
    /// Model backend: remote (inference service) or dummy (offline heuristics)
    #[arg(long, env = "KB_MODEL", default_value = "remote", value_parser = ["remote", "dummy"])]
    model: String,
    #[arg(long, env = "KB_INFERENCE_URL", default_value = DEFAULT_INFERENCE_URL)]
    inference_url: String,
    /// Timeout for inference service calls
    #[arg(long, default_value = "2m")]
    inference_timeout: HumanDuration,
    /// Access token for the checkpoint download
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,
    #[arg(long, env = "KB_HUB_URL", default_value = DEFAULT_HUB_URL)]
    hub_url: String,
    #[arg(long, default_value = DEFAULT_REPO_ID)]
    checkpoint_repo: String,
    #[arg(long, default_value = DEFAULT_FILENAME)]
    checkpoint_file: String,
    #[arg(long, default_value = "main")]
    checkpoint_revision: String,
    /// Expected SHA-256 of the checkpoint file
    #[arg(long)]
    checkpoint_sha256: Option<String>,
    /// Longest pause allowed between chunks of the checkpoint download
    #[arg(long, default_value = "1m")]
    checkpoint_read_timeout: HumanDuration,
    /// Use whatever weights the inference service already has
    #[arg(long)]
    skip_checkpoint: bool,
    #[arg(long, env = "KB_CACHE_DIR", default_value = ".cache/kb")]
    cache_dir: PathBuf,
    /// Timeout for fetching news pages
    #[arg(long, default_value = "30s")]
    http_timeout: HumanDuration,
    /// Default log filter when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web interface
    Serve {
        #[arg(long, env = "KB_BIND", default_value = kb_web::DEFAULT_BIND)]
        bind: SocketAddr,
        /// Directory holding the bundled label datasets
        #[arg(long, env = "KB_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
        #[arg(long, default_value = "1h")]
        session_ttl: HumanDuration,
    },
    /// Scrape news portals
    Scrape(ScraperArgs),
    /// Classify one article, scraped from a URL or given directly
    Classify {
        #[arg(long, conflicts_with_all = ["title", "content"], required_unless_present_all = ["title", "content"])]
        url: Option<String>,
        #[arg(long, requires = "content")]
        title: Option<String>,
        #[arg(long, requires = "title")]
        content: Option<String>,
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the normalized form of a text
    Normalize {
        #[arg(long, default_value = "manual")]
        source: Source,
        text: String,
    },
    /// Show the label distribution of the bundled datasets
    Datasets {
        #[arg(long, env = "KB_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
}

impl Cli {
    fn inference_config(&self) -> kb_inference::Config {
        let checkpoint = (!self.skip_checkpoint).then(|| CheckpointConfig {
            hub_url: self.hub_url.clone(),
            repo_id: self.checkpoint_repo.clone(),
            filename: self.checkpoint_file.clone(),
            revision: self.checkpoint_revision.clone(),
            cache_dir: self.cache_dir.clone(),
            sha256: self.checkpoint_sha256.clone(),
            read_timeout: self.checkpoint_read_timeout.0,
        });
        kb_inference::Config {
            model_name: self.model.clone(),
            inference_url: self.inference_url.clone(),
            api_key: self.hf_token.clone(),
            checkpoint,
            timeout: self.inference_timeout.0,
        }
    }

    fn scrapers(&self) -> Result<ScraperManager> {
        let manager = ScraperManager::new(&ScraperConfig {
            timeout: self.http_timeout.0,
            ..ScraperConfig::default()
        })?;
        let names: Vec<_> = manager
            .list_scrapers()
            .into_iter()
            .map(|meta| meta.name)
            .collect();
        info!("🦗 Scrapers initialized: {}", names.join(", "));
        Ok(manager)
    }

    async fn pipeline(&self) -> Result<Pipeline> {
        let model = kb_inference::create_model(self.inference_config()).await?;
        info!("🧠 Inference model initialized (using {})", model.name());
        Ok(Pipeline::new(model, PipelineConfig::default()))
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_analysis(analysis: &Analysis) {
    println!("Hasil Klasifikasi  : {}", analysis.classification.label);
    println!("Tingkat Confidence : {:.3}", analysis.classification.confidence);
    println!("Kemiripan          : {:.3}", analysis.similarity.value());
    println!("Judul Berita       : {}", analysis.summary.title);
    println!("Isi Ringkasan      : {}", analysis.summary.content);
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env: {}", e);
        }
    }

    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match &cli.command {
        Commands::Serve {
            bind,
            data_dir,
            session_ttl,
        } => {
            let config = WebConfig {
                bind: *bind,
                data_dir: data_dir.clone(),
                session_ttl: session_ttl.0,
                ..WebConfig::default()
            };
            let storage = MemoryStorage::new(MemoryConfig {
                ttl: config.session_ttl,
            })?;
            let state = AppState {
                pipeline: cli.pipeline().await?,
                scrapers: cli.scrapers()?,
                sessions: Arc::new(storage),
                datasets: kb_web::load_datasets(&config.data_dir)?,
            };
            kb_web::serve(&config, state).await?;
        }
        Commands::Scrape(args) => {
            handle_command(args.clone(), &cli.scrapers()?).await?;
        }
        Commands::Classify {
            url,
            title,
            content,
            json,
        } => {
            let article = match (url, title, content) {
                (Some(url), _, _) => cli.scrapers()?.scrape_url(url).await?,
                (None, Some(title), Some(content)) => Article::manual(title.as_str(), content.as_str()),
                _ => {
                    return Err(kb_core::Error::InvalidInput(
                        "either --url or both --title and --content are required".to_string(),
                    ))
                }
            };
            let analysis = cli.pipeline().await?.analyze(&article).await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
        }
        Commands::Normalize { source, text } => {
            println!("{}", kb_inference::preprocess::normalize(text, *source));
        }
        Commands::Datasets { data_dir } => {
            for distribution in kb_web::load_datasets(data_dir)? {
                let counts: Vec<_> = distribution
                    .counts
                    .iter()
                    .map(|(label, count)| format!("{} {}", label, count))
                    .collect();
                println!(
                    "{:<10} {:>6} rows  {}",
                    distribution.portal,
                    distribution.total(),
                    counts.join(", ")
                );
            }
        }
    }

    Ok(())
}
