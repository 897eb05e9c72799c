//! Apply a tinct effect chain to an image file and write the encoded
//! preview.
//!
//! ```text
//! tinct-cli photo.jpg --effect contrast=1.0 --effect brightness=0.5 -o out.jpg
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tinct_pipeline::{
    Dimensions, EffectInstance, ImageFormat, OutputFormat, ResizeFilter, Session, SessionConfig,
    UpdatePolicy, UploadSource,
};

/// Apply brightness, contrast, and edge-detection effects to an image.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input image path (PNG or JPEG, or a data-URL text file with
    /// `--data-url`).
    input: PathBuf,

    /// Effect to append, as "KIND=VALUE" (e.g. "contrast=1.5").
    /// Repeat to build a chain; effects apply in the order given.
    #[arg(short, long = "effect", value_name = "KIND=VALUE", value_parser = parse_effect)]
    effects: Vec<(String, f64)>,

    /// Output path. Defaults to "<input stem>-tinct.<ext>" next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Preview width in pixels.
    #[arg(long, value_name = "N")]
    preview_width: Option<u32>,

    /// Resampling filter for the preview.
    #[arg(long, value_enum)]
    filter: Option<FilterArg>,

    /// JPEG quality (1-100).
    #[arg(long, value_name = "Q")]
    quality: Option<u8>,

    /// Output encoding.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Fail on value changes for unknown effect ids instead of ignoring them.
    #[arg(long)]
    strict: bool,

    /// Complete session configuration as JSON. Individual flags override
    /// its fields.
    #[arg(long, value_name = "JSON")]
    config_json: Option<String>,

    /// Treat the input file as a `data:image/...;base64,` URL.
    #[arg(long)]
    data_url: bool,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpeg => Self::Jpeg,
            FormatArg::Png => Self::Png,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<FilterArg> for ResizeFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => Self::Nearest,
            FilterArg::Triangle => Self::Triangle,
            FilterArg::CatmullRom => Self::CatmullRom,
            FilterArg::Gaussian => Self::Gaussian,
            FilterArg::Lanczos3 => Self::Lanczos3,
        }
    }
}

/// Parse `--effect KIND=VALUE`.
fn parse_effect(s: &str) -> Result<(String, f64), String> {
    let (kind, value) = s
        .split_once('=')
        .ok_or_else(|| format!("effect must be 'KIND=VALUE', got: '{s}'"))?;
    let kind = kind.trim();
    if kind.is_empty() {
        return Err(format!("missing effect kind in '{s}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value '{value}': {e}"))?;
    Ok((kind.to_owned(), value))
}

/// Build the session configuration from `--config-json` and the
/// individual flags layered on top.
fn session_config(args: &Args) -> Result<SessionConfig, serde_json::Error> {
    let mut config = match &args.config_json {
        Some(json) => serde_json::from_str(json)?,
        None => SessionConfig::default(),
    };
    if let Some(width) = args.preview_width {
        config.preview_width = width;
    }
    if let Some(filter) = args.filter {
        config.resize_filter = filter.into();
    }
    if let Some(quality) = args.quality {
        config.jpeg_quality = quality;
    }
    if let Some(format) = args.format {
        config.output_format = format.into();
    }
    if args.strict {
        config.update_policy = UpdatePolicy::Strict;
    }
    Ok(config)
}

/// MIME type implied by a path's extension.
fn mime_hint(path: &Path) -> Option<String> {
    let format = ImageFormat::from_extension(path.extension()?.to_str()?)?;
    Some(format.mime_type().to_owned())
}

fn default_output(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}-tinct.{}", format.extension()))
}

/// What was done, for the final report.
#[derive(Serialize)]
struct Summary {
    input: PathBuf,
    output: PathBuf,
    original: Dimensions,
    preview: Dimensions,
    effects: Vec<EffectInstance>,
    format: OutputFormat,
    encoded_bytes: usize,
    elapsed_ms: f64,
}

impl Summary {
    fn print_text(&self) {
        println!("Input:    {} ({})", self.input.display(), self.original);
        println!("Preview:  {}", self.preview);
        if self.effects.is_empty() {
            println!("Effects:  (none)");
        } else {
            for (i, effect) in self.effects.iter().enumerate() {
                let heading = if i == 0 { "Effects:" } else { "" };
                println!("{heading:<9} {} = {:.2}", effect.id, effect.value);
            }
        }
        println!(
            "Output:   {} ({} bytes, {:?})",
            self.output.display(),
            self.encoded_bytes,
            self.format
        );
        println!("Elapsed:  {:.1} ms", self.elapsed_ms);
    }
}

fn run(args: &Args) -> Result<Summary, Box<dyn std::error::Error>> {
    let config = session_config(args).map_err(|e| format!("--config-json: {e}"))?;
    let mut session = Session::new(config)?;

    log::info!("reading {}", args.input.display());
    let upload = if args.data_url {
        UploadSource::DataUrl(std::fs::read_to_string(&args.input)?.trim().to_owned())
    } else {
        UploadSource::Bytes {
            bytes: std::fs::read(&args.input)?,
            mime_hint: mime_hint(&args.input),
        }
    };

    let start = Instant::now();
    let original = session.load(&upload)?.original_dimensions();
    let mut effects = Vec::with_capacity(args.effects.len());
    for (kind, value) in &args.effects {
        effects.push(session.append_with_value(kind, *value)?);
    }
    let rendered = session.render_output()?;
    let encoded = session.encode(&rendered)?;
    let elapsed = start.elapsed();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, encoded.format));
    std::fs::write(&output, &encoded.bytes)?;
    log::info!("wrote {}", output.display());

    session.shutdown();

    Ok(Summary {
        input: args.input.clone(),
        output,
        original,
        preview: encoded.dimensions,
        effects,
        format: encoded.format,
        encoded_bytes: encoded.bytes.len(),
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
    })
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(summary) => {
            if args.json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("error: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                summary.print_text();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
