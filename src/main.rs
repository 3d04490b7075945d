use anyhow::{bail, Context};
use clap::Parser;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use khmer_converter::encoding::decode_utf8;
use khmer_converter::{FontCatalog, KhmerConverter, TextEncoding};

#[derive(Parser, Debug)]
#[command(author, version, about = "Converts Khmer text between legacy fonts and Unicode", long_about = None)]
struct Args {
    /// Font catalog (XML)
    #[arg(long, default_value = "fontdata.xml")]
    catalog: PathBuf,

    /// Legacy font of the input, or of the output with --oldfont
    #[arg(short, long, default_value = "abc-zwsp")]
    font: String,

    /// Codec of a legacy input file
    #[arg(short, long, default_value = "cp1252")]
    encoding: TextEncoding,

    /// Convert from Unicode to the legacy font
    #[arg(short, long)]
    oldfont: bool,

    /// Khmer font size for document output (plain text has no font size)
    #[arg(short, long)]
    size: Option<u32>,

    /// List all supported fonts
    #[arg(short, long)]
    list: bool,

    /// Print the font list as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// List all supported codecs for input files
    #[arg(short, long)]
    codec: bool,

    /// Print the time the conversion took
    #[arg(short, long)]
    timer: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Input text file
    input: Option<PathBuf>,

    /// Output file, default is converted-<input> next to the input
    output: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn print_fonts(catalog: &FontCatalog, json: bool) -> anyhow::Result<()> {
    let fonts = catalog.fonts();
    if json {
        println!("{}", serde_json::to_string_pretty(&fonts)?);
        return Ok(());
    }

    println!("Supported fonts:");
    for font in &fonts {
        if font.names.is_empty() {
            println!("  {}", font.font_type);
        } else {
            println!("  {} ({})", font.font_type, font.names.join(", "));
        }
    }
    Ok(())
}

/// Picks the output path and refuses to clobber anything.
fn output_path(input: &Path, output: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let output = match output {
        Some(path) => {
            if path == input {
                bail!("Input file and output file must be different!");
            }
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    bail!("The path {} does not exist!", parent.display());
                }
            }
            path
        }
        None => {
            let name = input
                .file_name()
                .with_context(|| format!("{} is not a file name", input.display()))?;
            let mut converted = std::ffi::OsString::from("converted-");
            converted.push(name);
            input.with_file_name(converted)
        }
    };

    if output.exists() {
        bail!("The output file {} already exists!", output.display());
    }
    Ok(output)
}

fn decode_file(
    converter: &KhmerConverter,
    raw: &[u8],
    font: &str,
    encoding: TextEncoding,
) -> anyhow::Result<Vec<u8>> {
    let bytes = encoding.to_legacy_bytes(raw)?;
    let lines: Vec<&[u8]> = bytes.split_inclusive(|&b| b == b'\n').collect();
    debug!("Decoding {} lines from {}", lines.len(), font);

    let results = lines
        .par_iter()
        .map(|line| converter.decode_from_legacy(line, font))
        .collect::<khmer_converter::Result<Vec<String>>>()?;
    Ok(results.concat().into_bytes())
}

fn encode_file(converter: &KhmerConverter, raw: &[u8], font: &str) -> anyhow::Result<Vec<u8>> {
    let text = decode_utf8(raw)?;
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    debug!("Encoding {} lines to {}", lines.len(), font);

    let results = lines
        .par_iter()
        .map(|line| converter.encode_to_legacy(line, font))
        .collect::<khmer_converter::Result<Vec<Vec<u8>>>>()?;
    Ok(results.concat())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.codec {
        println!(
            "Supported input encodings: {}",
            TextEncoding::display_names().join(", ")
        );
        return Ok(());
    }

    let catalog = FontCatalog::load(&args.catalog)
        .with_context(|| format!("loading font catalog {}", args.catalog.display()))?;

    if args.list {
        return print_fonts(&catalog, args.json);
    }

    let Some(input) = args.input else {
        bail!("Please enter a file name or a legal option! Use --help for more info.");
    };
    if !input.exists() {
        bail!("{} does not exist!", input.display());
    }
    let output = output_path(&input, args.output)?;

    let converter = KhmerConverter::new(Arc::new(catalog));
    if !converter.catalog().is_convertible(&args.font) {
        bail!("Unknown font {}!", args.font);
    }

    let start = Instant::now();
    let raw = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;

    let converted = if args.oldfont {
        let target = converter.target_font(&args.font, args.size)?;
        info!(
            "Converting {} to {} ({})",
            input.display(),
            target.font_type,
            target.display_name
        );
        if let Some(size) = target.size {
            warn!("Font size {} does not apply to plain text output", size);
        }
        encode_file(&converter, &raw, &args.font)?
    } else {
        info!("Converting {} from {} to Unicode", input.display(), args.font);
        decode_file(&converter, &raw, &args.font, args.encoding)?
    };

    let mut writer = BufWriter::new(File::create(&output)?);
    writer.write_all(&converted)?;
    writer.flush()?;

    println!("Done. Saved to {}", output.display());
    if args.timer {
        println!("Total conversion time: {:.3}s", start.elapsed().as_secs_f64());
    }

    Ok(())
}
