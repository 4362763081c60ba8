use clap::{Parser, Subcommand};
use imageserver::geometry::{ExactRatio, Rect, Size};
use imageserver::imaging::{self, ImageResizer, Quality, RustResizer};
use imageserver::registry::{self, ModificationRegistry};
use imageserver::resolver::{ModificationResolver, ResolvedModification};
use imageserver::types::{ContextId, Image, Modification, RequestedResolution, ResolutionId};
use imageserver::{config, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("IMAGESERVER_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("IMAGESERVER_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "imageserver")]
#[command(about = "Reuse-first crop selection and rendering for image variants")]
#[command(long_about = "\
Reuse-first crop selection and rendering for image variants

Every source image keeps a registry of the modifications (output resolution
plus crop) already produced for it. A request for a new resolution first
tries to reuse one of those:

  registered    the requested resolution id, else exact width and height
  aspect-ratio  same ratio: smallest covering size, else a smaller one whose
                crop still has enough pixels
  adapting      one side matches: the crop grows or shrinks on the other;
                otherwise a crop is extended or cut to the requested ratio

Only when nothing fits is a new centered crop made, and it is refused if it
would have to be upscaled.

Run 'imageserver gen-config' to generate a documented imageserver.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing imageserver.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Modification registry file
    #[arg(long, default_value = registry::REGISTRY_FILENAME, global = true)]
    registry: PathBuf,

    /// Log selection decisions (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the centered crop of a WxH source for a ratio
    Crop {
        #[arg(long)]
        width: i32,
        #[arg(long)]
        height: i32,
        /// Target ratio as p/q, e.g. 16/9
        #[arg(long)]
        ratio: ExactRatio,
    },
    /// Record a modification for an image
    Register {
        image: PathBuf,
        #[arg(long)]
        resolution_id: u64,
        #[arg(long)]
        width: i32,
        #[arg(long)]
        height: i32,
        /// Crop of the source as x,y,width,height
        #[arg(long, value_parser = parse_crop)]
        crop: Option<Rect>,
        #[arg(long)]
        context: Option<u64>,
    },
    /// Decide which crop would serve a resolution
    Resolve {
        image: PathBuf,
        #[arg(long, default_value_t = 0)]
        width: i32,
        #[arg(long, default_value_t = 0)]
        height: i32,
        #[arg(long)]
        resolution_id: Option<u64>,
        #[arg(long)]
        context: Option<u64>,
    },
    /// Resolve and render one or more sizes
    Render {
        image: PathBuf,
        #[arg(long)]
        output_dir: PathBuf,
        /// Output size as WxH; a 0 side follows the image ratio
        #[arg(long = "size", value_parser = parse_size, required = true)]
        sizes: Vec<Size>,
        #[arg(long)]
        context: Option<u64>,
        /// Output format extension
        #[arg(long, default_value = "jpg")]
        format: String,
    },
    /// Print a stock imageserver.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Crop {
            width,
            height,
            ratio,
        } => {
            let source = Size::new(width, height);
            let crop = imaging::calculate_crop_rect(source, ratio)?;
            output::print_crop_output(source, ratio, crop);
        }
        Command::Register {
            image,
            resolution_id,
            width,
            height,
            crop,
            context,
        } => {
            let (key, source) = identify(&image)?;
            let mut modification = Modification::new(Size::new(width, height), crop)
                .with_resolution_id(ResolutionId(resolution_id));
            if let Some(context) = context {
                modification = modification.with_context(ContextId(context));
            }

            let mut registry = ModificationRegistry::load(&cli.registry)?;
            registry.register(&key, source.dimensions, modification.clone());
            registry.save(&cli.registry)?;

            let total = registry.get(&key).map_or(0, |e| e.modifications.len());
            output::print_register_output(&key, &modification, total);
        }
        Command::Resolve {
            image,
            width,
            height,
            resolution_id,
            context,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            let (key, source) = identify(&image)?;
            let registry = ModificationRegistry::load(&cli.registry)?;

            let requested = match resolution_id {
                Some(id) => RequestedResolution::registered(ResolutionId(id), width, height),
                None => RequestedResolution::new(width, height),
            };
            let resolved = resolver(&config).resolve(
                &source,
                &registry.candidates(&key),
                &requested,
                context.map(ContextId),
            )?;
            output::print_resolve_output(&resolved, &source);
        }
        Command::Render {
            image,
            output_dir,
            sizes,
            context,
            format,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            init_thread_pool(&config.processing);
            let (key, source) = identify(&image)?;
            let registry = ModificationRegistry::load(&cli.registry)?;
            let candidates = registry.candidates(&key);
            let resolver = resolver(&config);

            let resolved = sizes
                .iter()
                .map(|size| {
                    resolver.resolve(
                        &source,
                        &candidates,
                        &RequestedResolution::new(size.width, size.height),
                        context.map(ContextId),
                    )
                })
                .collect::<Result<Vec<ResolvedModification>, _>>()?;

            let stem = image
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| key.clone());
            let variants = imaging::render_all(
                &RustResizer::new(),
                &image,
                &output_dir,
                &stem,
                &format,
                &resolved,
                Quality::new(config.output.quality),
            )?;
            output::print_render_output(&image, source.dimensions, &variants);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Registry key and dimensions of a source image.
fn identify(path: &Path) -> Result<(String, Image), Box<dyn std::error::Error>> {
    let dimensions = RustResizer::new().get_size(path)?;
    let key = registry::hash_file(path)?;
    Ok((key, Image { dimensions }))
}

fn resolver(config: &config::ServerConfig) -> ModificationResolver {
    ModificationResolver::from_kinds(&config.selection.strategies, config.quality.allow_upscale)
}

/// Log to stderr. `RUST_LOG` applies unless `-v` asks for debug output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// `WxH`, either side may be 0.
fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<i32>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| format!("invalid dimension '{v}' in '{s}'"))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}

/// `x,y,width,height`
fn parse_crop(s: &str) -> Result<Rect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid crop '{s}': {e}"))?;
    match parts.as_slice() {
        [x, y, w, h] if *w > 0 && *h > 0 => Ok(Rect::new(*x, *y, *w, *h)),
        _ => Err(format!("expected x,y,width,height with a positive size, got '{s}'")),
    }
}
