use brushforge::config::BuildConfig;
use brushforge::imaging::RustBackend;
use brushforge::settings::{PlutilConverter, SettingsTemplate};
use brushforge::{collection, coordinator, discover, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brushforge")]
#[command(about = "Build Procreate brush packages and brush sets from texture images")]
#[command(long_about = "\
Build Procreate brush packages and brush sets from texture images

Your filesystem is the data source. Any image whose filename starts with
digits becomes a brush; the digit run is the brush id and the sort key.

Project structure:

  project/
  ├── textures/              # Source images
  │   ├── 7.png              # → brush id 7
  │   ├── 09-slate.jpg       # → brush id 09 (sorts as 9)
  │   └── notes.txt          # No digit prefix → skipped
  ├── template/
  │   ├── Brush.archive      # XML settings template (PLACEHOLDER_NAME)
  │   └── Signature/         # Static subtree copied into every brush
  ├── brushes/               # Built <id>.brush packages
  └── brushsets/             # Built <name>.brushset collections

Binary plist conversion uses Apple's plutil; pass --plutil to point at a
different executable (e.g. bin/plutil.exe on Windows).")]
#[command(version)]
struct Cli {
    /// Project root containing textures/ and template/
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Override the source image directory
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Concurrent brush builds
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Settings converter executable (default: plutil / plutil.exe)
    #[arg(long, global = true)]
    plutil: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the brushes that would be built
    Scan {
        /// Emit the discovered-asset manifest as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build all brush packages
    Brushes,
    /// Build all brush packages, then bundle them into a brush set
    Build {
        /// Brush set name (default: source directory name)
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = BuildConfig::for_project(&cli.project);
    if let Some(source) = &cli.source {
        config.source_dir = source.clone();
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    let converter = match &cli.plutil {
        Some(program) => PlutilConverter::with_program(program),
        None => PlutilConverter::resolve(),
    };

    match cli.command {
        Command::Scan { json } => {
            let requests = discover::discover(&config.source_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&requests)?);
            } else {
                for line in output::format_scan(&requests) {
                    println!("{line}");
                }
            }
        }
        Command::Brushes => {
            build_brushes(&config, &converter)?;
        }
        Command::Build { name } => {
            let report = build_brushes(&config, &converter)?;
            let name = name.unwrap_or_else(|| set_name_from_source(&config));

            println!("==> Bundling {}", name);
            let collection = collection::assemble_collection(
                &report.succeeded,
                &name,
                &config.collection_dir,
                config.retry,
            )?;
            for line in output::format_collection(&collection) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// Discover and build every brush, printing the report.
fn build_brushes(
    config: &BuildConfig,
    converter: &PlutilConverter,
) -> Result<coordinator::BuildReport, Box<dyn std::error::Error>> {
    println!("==> Scanning {}", config.source_dir.display());
    let requests = discover::discover(&config.source_dir)?;
    for line in output::format_scan(&requests) {
        println!("{line}");
    }

    println!("==> Building brushes");
    let template = SettingsTemplate::load(&config.template_path)?;
    let backend = RustBackend::new();
    let report = coordinator::build_all(&requests, &template, converter, &backend, config)?;
    for line in output::format_build_report(&report) {
        println!("{line}");
    }
    Ok(report)
}

/// Default set name: the source directory's own name.
fn set_name_from_source(config: &BuildConfig) -> String {
    config
        .source_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "Brushes".to_string())
}
