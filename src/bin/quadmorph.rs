use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quadmorph::engine::orchestrator::SETTLE_STEP;
use quadmorph::foundation::math::unpremultiply_rgba8_in_place;
use quadmorph::{
    Direction, Engine, EngineConfig, FrameRenderer, GlyphDictionary, RenderSettings,
};

#[derive(Parser, Debug)]
#[command(name = "quadmorph", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a snapshot.
    Validate(ValidateArgs),
    /// Play operations in animate mode and render one frame as a PNG.
    Frame(FrameArgs),
    /// Re-export a snapshot in normalized form.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Snapshot JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Snapshot JSON.
    #[arg(long)]
    config: PathBuf,

    /// Glyph dictionary JSON.
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Image for an item or container URL, as `url=path`.
    #[arg(long = "image", value_parser = parse_image_arg)]
    images: Vec<(String, PathBuf)>,

    /// Operation to play: `up`, `down`, `up:<speed>`, `down:<speed>`,
    /// `button:<bundle>` or `toggle`. Repeatable.
    #[arg(long = "op")]
    ops: Vec<Op>,

    /// Seconds to advance after the last operation (default: until idle).
    #[arg(long)]
    at: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 1000)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Snapshot JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
enum Op {
    Scroll(Direction, Option<f64>),
    Button(String),
    Toggle,
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, arg) = match s.split_once(':') {
            Some((h, a)) => (h, Some(a)),
            None => (s, None),
        };
        let speed = |arg: Option<&str>| -> Result<Option<f64>, String> {
            arg.map(|a| a.parse::<f64>().map_err(|e| format!("bad speed '{a}': {e}")))
                .transpose()
        };
        match head {
            "up" => Ok(Op::Scroll(Direction::Up, speed(arg)?)),
            "down" => Ok(Op::Scroll(Direction::Down, speed(arg)?)),
            "button" => match arg {
                Some(bundle) if !bundle.is_empty() => Ok(Op::Button(bundle.to_owned())),
                _ => Err("button needs a bundle id, e.g. button:bundle-1".to_owned()),
            },
            "toggle" if arg.is_none() => Ok(Op::Toggle),
            _ => Err(format!("unknown operation '{s}'")),
        }
    }
}

fn parse_image_arg(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((url, path)) if !url.is_empty() && !path.is_empty() => {
            Ok((url.to_owned(), PathBuf::from(path)))
        }
        _ => Err(format!("expected url=path, got '{s}'")),
    }
}

fn main() -> anyhow::Result<()> {
    initialise_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    EngineConfig::from_json_str(&json).with_context(|| format!("load config '{}'", path.display()))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let lists = config
        .bundle_items
        .values()
        .filter(|b| b.number_of_items > 0)
        .count();
    println!(
        "ok: {} bundle(s), {} container(s), {} bundle(s) with items",
        config.bundles.len(),
        config.containers.len(),
        lists
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let mut engine = Engine::from_config(config)?;

    let mut renderer = FrameRenderer::new(RenderSettings {
        width: args.width,
        height: args.height,
        ..RenderSettings::default()
    });
    if let Some(path) = &args.dictionary {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read dictionary '{}'", path.display()))?;
        renderer.set_dictionary(GlyphDictionary::from_json_str(&json)?);
    }
    for (url, path) in &args.images {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        renderer
            .images_mut()
            .insert_encoded(url.clone(), &bytes)
            .with_context(|| format!("decode image '{}'", path.display()))?;
    }

    engine.enter_mode();
    let last = args.ops.len().saturating_sub(1);
    for (i, op) in args.ops.iter().enumerate() {
        match op {
            Op::Scroll(dir, speed) => engine.scroll(*dir, *speed),
            Op::Button(bundle) => engine.activate_button(bundle),
            Op::Toggle => engine.activate_toggle(),
        }
        match args.at {
            Some(at) if i == last => advance(&mut engine, at),
            _ => {
                if !engine.settle() {
                    tracing::warn!(op = ?op, "engine did not settle");
                }
            }
        }
    }

    let mut frame = renderer.render(&engine.snapshot())?;
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut frame.data);
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn advance(engine: &mut Engine, seconds: f64) {
    let mut left = seconds.max(0.0);
    while left > 1e-9 {
        let dt = left.min(SETTLE_STEP);
        engine.tick(dt);
        left -= dt;
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_default();
    let json = config.to_json(Some(&stamp))?;
    std::fs::write(&args.out, json)
        .with_context(|| format!("write config '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
