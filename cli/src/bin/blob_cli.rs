use clap::{Parser, Subcommand, ValueEnum};
use cli::{load_config, load_frame, BlobCliError, DetectOutput};
use color_eyre::eyre::Result;
use hue_blob::{load_font, DetectorConfig, Pipeline};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect blue and yellow blobs in a single image
    Detect {
        /// Path to the input image
        #[arg(short, long)]
        input: PathBuf,
        /// Where to save the annotated frame
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Detector configuration (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// TrueType font for text overlays (overrides the config)
        #[arg(long)]
        font: Option<PathBuf>,
        /// Export the detected contours as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Print the default detector configuration
    DefaultConfig {
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Print the JSON schema of the detector configuration
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum ConfigFormat {
    Toml,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Detect {
            input,
            output,
            config,
            font,
            geojson,
        } => {
            detect(
                input,
                output.as_deref(),
                config.as_deref(),
                font.as_deref(),
                geojson.as_deref(),
            )?;
        }
        Commands::DefaultConfig { format } => {
            let config = DetectorConfig::default();
            let text = match format {
                ConfigFormat::Toml => config.to_toml_string()?,
                ConfigFormat::Json => config.to_json_string()?,
            };
            println!("{text}");
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&DetectorConfig::schema())?);
        }
    }

    Ok(())
}

fn detect(
    input: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    font_path: Option<&Path>,
    geojson_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;

    let mut builder = Pipeline::builder().with_config(config);
    if let Some(path) = font_path {
        builder = builder.with_font(load_font(path)?);
    }
    let pipeline = builder.build()?;
    info!("{}", pipeline.info());

    let mut frame = load_frame(input)?;
    info!("Processing {:?} ({}x{})", input, frame.width(), frame.height());

    let report = pipeline.process(&mut frame)?;
    if report.blue.is_none() && report.yellow.is_none() {
        warn!("No blue or yellow blob found in {:?}", input);
    }

    if let Some(path) = output {
        frame.save(path).map_err(|source| BlobCliError::ImageEncode {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Annotated frame written to {:?}", path);
    }

    if let Some(path) = geojson_path {
        report.save_geojson(path)?;
        info!("GeoJSON written to {:?}", path);
    }

    println!("{}", DetectOutput::from_report(input, &report).to_json()?);
    Ok(())
}
