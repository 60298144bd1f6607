use std::{
    fs::File,
    io::BufReader,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use primitive_art::{
    BackgroundColor, GenerationParams, Generator, GeneratorSettings, OutputFormat, ServerConfig,
    ShapeMode, Toolchain, Upload, web,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "primitive-art", version)]
struct Cli {
    /// Directory per-request workspaces are created in (default: OS temp dir).
    #[arg(long, global = true, env = "PRIMITIVE_ART_WORKSPACE")]
    workspace_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that `primitive` and ImageMagick are on PATH.
    Check(CheckArgs),
    /// Generate one artwork from an image file.
    Generate(GenerateArgs),
    /// Serve the upload page.
    Serve(ServeArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Print the resolved toolchain as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input PNG or JPEG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory the artifact is written to.
    #[arg(long, default_value = "outputs")]
    out_dir: PathBuf,

    /// JSON file with generation parameters; flags below override it.
    #[arg(long)]
    params: Option<PathBuf>,

    #[command(flatten)]
    overrides: ParamOverrides,

    /// Print a JSON summary instead of the generated command.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Default)]
struct ParamOverrides {
    /// Number of shapes (-n).
    #[arg(short = 'n', long)]
    shapes: Option<u32>,

    /// Shape mode, by code or name (-m).
    #[arg(short = 'm', long)]
    mode: Option<ShapeMode>,

    /// Add N extra shapes per iteration with reduced search (-rep).
    #[arg(long)]
    repeat: Option<u32>,

    /// Save every Nth frame, GIF only (-nth).
    #[arg(long)]
    nth: Option<u32>,

    /// Resize the input to this size before fitting (-r).
    #[arg(short = 'r', long)]
    resize: Option<u32>,

    /// Output image size (-s).
    #[arg(short = 's', long)]
    output_size: Option<u32>,

    /// Shape alpha (-a).
    #[arg(short = 'a', long)]
    alpha: Option<u8>,

    /// Background color as hex, `#` optional (-bg).
    #[arg(long = "bg")]
    background: Option<BackgroundColor>,

    /// Worker count, 0 for all cores (-j).
    #[arg(short = 'j', long)]
    workers: Option<u32>,

    /// png, jpg, svg or gif.
    #[arg(short = 'f', long)]
    format: Option<OutputFormat>,

    /// Pass -v to primitive.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Pass -vv to primitive.
    #[arg(long)]
    very_verbose: bool,
}

impl ParamOverrides {
    fn apply(self, params: &mut GenerationParams) {
        if let Some(v) = self.shapes {
            params.num_shapes = v;
        }
        if let Some(v) = self.mode {
            params.mode = v;
        }
        if let Some(v) = self.repeat {
            params.repeat = v;
        }
        if let Some(v) = self.nth {
            params.nth = v;
        }
        if let Some(v) = self.resize {
            params.resize = v;
        }
        if let Some(v) = self.output_size {
            params.output_size = v;
        }
        if let Some(v) = self.alpha {
            params.alpha = v;
        }
        if let Some(v) = self.background {
            params.background = v;
        }
        if let Some(v) = self.workers {
            params.workers = v;
        }
        if let Some(v) = self.format {
            params.format = v;
        }
        params.verbose |= self.verbose;
        params.very_verbose |= self.very_verbose;
    }
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "PRIMITIVE_ART_BIND", default_value = web::DEFAULT_BIND)]
    bind: SocketAddr,

    /// Largest accepted request body.
    #[arg(long, default_value_t = web::DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "primitive_art=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match cli.workspace_dir {
        Some(dir) => GeneratorSettings {
            workspace_base: dir,
        },
        None => GeneratorSettings::default(),
    };

    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Generate(args) => cmd_generate(args, settings),
        Command::Serve(args) => cmd_serve(args, settings),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let toolchain = Toolchain::discover()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&toolchain)?);
    } else {
        println!("primitive: {}", toolchain.primitive.display());
        println!(
            "{}: {}",
            toolchain.converter.kind.program_name(),
            toolchain.converter.path.display()
        );
    }
    Ok(())
}

fn read_params_json(path: &Path) -> anyhow::Result<GenerationParams> {
    let f = File::open(path).with_context(|| format!("open params '{}'", path.display()))?;
    let params: GenerationParams = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse params JSON '{}'", path.display()))?;
    Ok(params)
}

fn cmd_generate(args: GenerateArgs, settings: GeneratorSettings) -> anyhow::Result<()> {
    let mut params = match &args.params {
        Some(path) => read_params_json(path)?,
        None => GenerationParams::default(),
    };
    args.overrides.apply(&mut params);
    params.validate()?;

    let generator = Generator::from_environment(settings)?;
    let upload = Upload::from_path(&args.in_path)?;
    let generation = generator.generate(&upload, &params)?;
    let written = generation.output.save_into(&args.out_dir)?;

    if args.json {
        let summary = serde_json::json!({
            "artifact": written,
            "mime": generation.output.mime,
            "bytes": generation.output.len(),
            "source_size": [generation.source_size.0, generation.source_size.1],
            "commands": generation.commands.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "frames_removed": generation.frames_removed,
            "elapsed_ms": generation.elapsed.as_millis() as u64,
            "params": params,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for command in &generation.commands {
            println!("{command}");
        }
    }

    eprintln!("wrote {}", written.display());
    Ok(())
}

fn cmd_serve(args: ServeArgs, settings: GeneratorSettings) -> anyhow::Result<()> {
    let config = ServerConfig {
        bind: args.bind,
        max_upload_bytes: args.max_upload_bytes,
        generator: settings,
        search_path: None,
    };
    let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    runtime.block_on(primitive_art::serve(config))
}
