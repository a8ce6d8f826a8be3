//! routinegrid CLI entry point

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use routinegrid::cache::{self, FileMarkupStore, InputCache};
use routinegrid::shortcode::{decode_routine, encode_routine};
use routinegrid::{Aggregation, Generator, RoutineConfig, SourceInput, ThemeConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "routinegrid")]
#[command(about = "Merge weekly class routines into one grid image", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and render a combined routine
    Generate {
        /// Source as NAME=DESCRIPTOR; DESCRIPTOR is a JSON file, inline JSON or a # short code.
        /// Without any, the last cached sources are used.
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Theme name (dark, light, pink)
        #[arg(short, long, default_value = "dark")]
        theme: String,

        /// Output file; defaults to <product>_Routine_<date>.png
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the image as a data URL instead of writing a file
        #[arg(long)]
        data_url: bool,

        /// Neither read nor write the cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Redraw the last generated grid from the cache without resolving anything.
    /// Entry colors stay as they were cached; the theme sets the frame and bands.
    Restore {
        /// Theme name (dark, light, pink)
        #[arg(short, long, default_value = "dark")]
        theme: String,

        /// Output file; defaults to <product>_Routine_<date>.png
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Encode section ids into a short code
    Encode {
        #[arg(required = true)]
        section_ids: Vec<String>,
    },
    /// Decode a short code into section ids
    Decode { code: String },
}

fn parse_source(arg: &str) -> anyhow::Result<SourceInput> {
    let Some((name, descriptor)) = arg.split_once('=') else {
        bail!("source must look like NAME=DESCRIPTOR, got {:?}", arg);
    };
    let path = Path::new(descriptor);
    let descriptor = if path.is_file() {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    } else {
        descriptor.to_string()
    };
    Ok(SourceInput::new(name.trim(), descriptor))
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<RoutineConfig> {
    Ok(match path {
        Some(path) => RoutineConfig::load(&path)?,
        None => RoutineConfig::default(),
    })
}

fn write_image(generator: &Generator, out: Option<PathBuf>, png: &[u8]) -> anyhow::Result<()> {
    let out = out.unwrap_or_else(|| PathBuf::from(generator.config().artifact_filename_today()));
    std::fs::write(&out, png).with_context(|| format!("writing {}", out.display()))?;
    log::info!("wrote {}", out.display());
    println!("{}", out.display());
    Ok(())
}

async fn generate(
    sources: Vec<String>,
    theme: String,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    data_url: bool,
    no_cache: bool,
) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let mut input_cache = if no_cache {
        None
    } else {
        Some(InputCache::new(FileMarkupStore::inputs_location()?, config.cache_debounce()))
    };

    let mut inputs = sources.iter().map(|s| parse_source(s)).collect::<anyhow::Result<Vec<_>>>()?;
    if inputs.is_empty() {
        inputs = match input_cache.as_ref().and_then(|c| c.restore()) {
            Some(cached) if !cached.is_empty() => {
                log::info!("using {} cached source(s)", cached.len());
                cached
            }
            _ => bail!("no --source given and nothing cached"),
        };
    }
    if let Some(c) = input_cache.as_mut() {
        c.record(&inputs, Instant::now())?;
    }
    let theme = ThemeConfig::named(&theme);

    let generator = Generator::new(config)?;
    let generated = generator.generate(&inputs, &theme).await?;

    if let Some(mut c) = input_cache {
        c.flush();
        cache::remember_grid(&FileMarkupStore::default_location()?, &generated.aggregation.grid);
    }

    for position in &generated.aggregation.excluded {
        eprintln!("skipped source {} ({})", position + 1, inputs[*position].display_name);
    }
    for w in &generated.aggregation.warnings {
        eprintln!("{}: {}", w.source_name, w.message);
    }

    if data_url {
        println!("{}", generated.image.to_data_url());
        return Ok(());
    }
    write_image(&generator, out, &generated.image.png_data)
}

fn restore(theme: String, out: Option<PathBuf>, config: Option<PathBuf>) -> anyhow::Result<()> {
    let generator = Generator::new(load_config(config)?)?;
    let store = FileMarkupStore::default_location()?;
    let Some(grid) = cache::restore_grid(&store) else {
        bail!("nothing cached at {}", store.path().display());
    };
    let aggregation = Aggregation { grid, warnings: Vec::new(), excluded: Vec::new() };
    let image = generator.render(&aggregation, &ThemeConfig::named(&theme))?;
    write_image(&generator, out, &image.png_data)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("routinegrid={}", log_level)));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Commands::Generate { sources, theme, out, config, data_url, no_cache } => {
            generate(sources, theme, out, config, data_url, no_cache).await
        }
        Commands::Restore { theme, out, config } => restore(theme, out, config),
        Commands::Encode { section_ids } => {
            println!("{}", encode_routine(&section_ids));
            Ok(())
        }
        Commands::Decode { code } => {
            for id in decode_routine(&code)? {
                println!("{}", id);
            }
            Ok(())
        }
    }
}
