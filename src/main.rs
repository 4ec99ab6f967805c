//! Command-line wrapper around the phixel pipeline: decode → crop →
//! pixelate → resize → encode, plus the palette-generation mode.

use std::io::{Cursor, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use image::ImageFormat;
use log::info;

use phixel::frame::{self, Anchor};
use phixel::palette::{self, PaletteSource, BUILTIN_NAMES};
use phixel::{extract, ColorMode, PhixelError, PixelBuffer, PixelateConfig};

#[derive(Parser)]
#[command(name = "phixel", version, about = "Create \"pixel art\" from a photo")]
#[command(
    after_help = "Disclaimer: this does not *really* make pixel art, it just reduces the \
                  image resolution with preset color palettes."
)]
struct Args {
    /// Block size for pixelation, in pixels
    #[arg(short, long, default_value_t = 8)]
    block: u32,

    /// Built-in color palette to quantize with
    #[arg(short, long, value_name = "NAME", help = builtin_help())]
    palette: Option<String>,

    /// A custom palette file: plain JSON with a single array of color triplets
    #[arg(short, long, value_name = "FILE", conflicts_with = "palette")]
    custom: Option<PathBuf>,

    /// Color space for averaging and palette matching
    #[arg(short, long, value_enum, default_value_t = ModeArg::Rgb)]
    mode: ModeArg,

    /// Crop the image to a block-size multiple, keeping the given corner
    #[arg(short = 'x', long, value_enum, value_name = "CORNER")]
    crop: Option<CropArg>,

    /// Dimensions of the output image (format: 120x80)
    #[arg(short, long, value_name = "WxH")]
    dimensions: Option<String>,

    /// Output encoding format
    #[arg(short = 't', long = "type", value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// Hue/saturation/value(lightness) distance weights for the HSV and
    /// HLS metrics (format: 1,1,1)
    #[arg(short = 'w', long, value_name = "H,S,V", value_parser = parse_weights)]
    weights: Option<Weights>,

    /// Generate a palette document from the input's colors instead of
    /// converting it; other options except --mode are ignored
    #[arg(short, long)]
    generate: bool,

    /// Input file (defaults to stdin)
    input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    output: Option<PathBuf>,
}

fn builtin_help() -> String {
    format!(
        "Built-in color palette to quantize with [possible values: {}]",
        BUILTIN_NAMES.join(", ")
    )
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Rgb,
    Hsv,
    Hls,
}

impl From<ModeArg> for ColorMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Rgb => ColorMode::Rgb,
            ModeArg::Hsv => ColorMode::Hsv,
            ModeArg::Hls => ColorMode::Hls,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CropArg {
    Tl,
    Tr,
    Bl,
    Br,
}

impl From<CropArg> for Anchor {
    fn from(arg: CropArg) -> Self {
        match arg {
            CropArg::Tl => Anchor::TopLeft,
            CropArg::Tr => Anchor::TopRight,
            CropArg::Bl => Anchor::BottomLeft,
            CropArg::Br => Anchor::BottomRight,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Jpeg => ImageFormat::Jpeg,
            FormatArg::Gif => ImageFormat::Gif,
            FormatArg::Bmp => ImageFormat::Bmp,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Weights([f32; 3]);

fn parse_weights(s: &str) -> Result<Weights, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err("expected three comma-separated weights".to_string());
    }
    let mut weights = [0.0f32; 3];
    for (slot, part) in weights.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("invalid weight {part:?}"))?;
    }
    Ok(Weights(weights))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("phixel: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), PhixelError> {
    let mode = ColorMode::from(args.mode);
    let input = read_input(args.input.as_deref())?;
    let decoded = image::load_from_memory(&input)?.to_rgba8();
    let mut buffer = PixelBuffer::from_image(decoded);
    info!("decoded {}x{} input", buffer.width(), buffer.height());

    if args.generate {
        let doc = extract::extract(&buffer, mode);
        info!("extracted {} distinct colors", doc.len());
        return write_output(args.output.as_deref(), doc.to_json().as_bytes());
    }

    let source = match (&args.palette, &args.custom) {
        (Some(name), _) => PaletteSource::Builtin(name.clone()),
        (_, Some(path)) => PaletteSource::Custom(path.clone()),
        (None, None) => PaletteSource::None,
    };
    let palette = palette::resolve_palette(&source, mode);

    if let Some(crop) = args.crop {
        buffer = frame::crop_to_blocks(buffer, args.block, crop.into())?;
        info!("cropped to {}x{}", buffer.width(), buffer.height());
    }

    let mut config = PixelateConfig::new().block_size(args.block).mode(mode);
    if let Some(Weights(weights)) = args.weights {
        config = config.channel_weights(weights);
    }
    phixel::pixelate(&mut buffer, palette.as_ref(), &config)?;

    if let Some(spec) = &args.dimensions {
        buffer = frame::resize_with_fallback(buffer, spec);
    }

    let encoded = encode(buffer, args.format)?;
    write_output(args.output.as_deref(), &encoded)
}

fn read_input(path: Option<&std::path::Path>) -> Result<Vec<u8>, PhixelError> {
    match path {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read(path)?),
        _ => {
            let mut bytes = Vec::new();
            std::io::stdin().lock().read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}

fn write_output(path: Option<&std::path::Path>, bytes: &[u8]) -> Result<(), PhixelError> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::write(path, bytes)?,
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn encode(buffer: PixelBuffer, format: FormatArg) -> Result<Vec<u8>, PhixelError> {
    let img = buffer.into_image();
    let mut out = Cursor::new(Vec::new());
    match format {
        // The JPEG encoder takes no alpha channel
        FormatArg::Jpeg => {
            image::DynamicImage::ImageRgba8(img)
                .to_rgb8()
                .write_to(&mut out, ImageFormat::Jpeg)?;
        }
        other => img.write_to(&mut out, other.into())?,
    }
    Ok(out.into_inner())
}
