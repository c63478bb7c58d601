use clap::{Parser, Subcommand};
use nodemap::analysis::{analyze, to_graph_data};
use nodemap::{GeneratorConfig, JsonFileStore, MapGenerator};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Генератор карты биомов для Chronicles of Realms
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON-файл хранилища узлов
    #[arg(short, long, default_value = "nodes.json")]
    store: PathBuf,

    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Очистить хранилище и построить новую карту
    Generate {
        /// Сид (по умолчанию из конфигурации)
        #[arg(long)]
        seed: Option<u32>,
    },
    /// Вывести узлы из хранилища
    Load,
    /// Очистить хранилище
    Clear,
    /// Сводка и проверка инвариантов карты в хранилище
    Stats,
    /// Узлы и рёбра для внешнего раскладчика графа
    Export,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            GeneratorConfig::from_toml_file(path)?
        }
        None => GeneratorConfig::default(),
    };
    let mut generator = MapGenerator::new(JsonFileStore::new(&cli.store), config);

    match cli.command {
        Command::Generate { seed } => {
            if let Some(seed) = seed {
                generator.set_seed(seed);
            }
            info!(seed = generator.seed(), "generating map");
            let map = generator.generate().await?;
            info!(store = %generator.store().path().display(), nodes = map.nodes.len(), "map saved");
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Command::Load => {
            let nodes = generator.load_map().await?;
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
        Command::Clear => {
            generator.reset().await?;
            info!(store = %generator.store().path().display(), "store cleared");
        }
        Command::Stats => {
            let nodes = generator.load_map().await?;
            println!("{}", serde_json::to_string_pretty(&analyze(&nodes))?);
        }
        Command::Export => {
            let nodes = generator.load_map().await?;
            println!("{}", serde_json::to_string_pretty(&to_graph_data(&nodes))?);
        }
    }

    Ok(())
}
