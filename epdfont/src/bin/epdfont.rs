//! Command line tool for building and inspecting EPDFONT files.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use clap::Parser;
use epdfont::{
    ranges::parse_unicodes, BitDepth, ConvertOptions, EpdFontRef, DEFAULT_RANGES,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Render a stack of fonts into an EPDFONT file
    Convert {
        /// Pixels per em (8 to 128)
        #[arg(short, long, default_value_t = 28, value_parser = clap::value_parser!(u32).range(8..=128))]
        size: u32,
        /// Store four gray levels instead of black and white
        #[arg(long)]
        two_bit: bool,
        /// Line height as a multiple of the font's (0.5 to 3.0)
        #[arg(long, default_value_t = 1.2)]
        line_height: f64,
        /// Pixels added to every advance (-10 to 10)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true, value_parser = clap::value_parser!(i32).range(-10..=10))]
        letter_spacing: i32,
        /// Horizontal scale applied to every advance (0.1 to 2.0)
        #[arg(long, default_value_t = 1.0)]
        width_scale: f64,
        /// Pixels added to the top of every glyph (-20 to 20)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true, value_parser = clap::value_parser!(i32).range(-20..=20))]
        baseline_offset: i32,
        /// Code points to include, e.g. "U+0020-007E,A0-FF" (default: a
        /// broad selection of scripts and symbols)
        #[arg(short, long)]
        unicodes: Option<String>,
        /// The output file (default: <first font name>_<size>.epdfont)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Font files in priority order; later fonts fill in missing glyphs
        /// (may use glob syntax)
        #[arg(required = true)]
        fonts: Vec<PathBuf>,
    },
    /// Print the contents of an EPDFONT file
    Inspect {
        /// Also draw the glyph for this character
        #[arg(short, long)]
        glyph: Option<char>,
        file: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse_from(wild::args());
    let result = match args.command {
        Command::Convert {
            size,
            two_bit,
            line_height,
            letter_spacing,
            width_scale,
            baseline_offset,
            unicodes,
            output,
            json,
            fonts,
        } => {
            let ranges = match unicodes.as_deref().map(parse_unicodes).transpose() {
                Ok(ranges) => ranges.unwrap_or_else(|| DEFAULT_RANGES.to_vec()),
                Err(e) => exit_with(e),
            };
            let options = ConvertOptions {
                pixel_size: size,
                bit_depth: if two_bit { BitDepth::Two } else { BitDepth::One },
                line_height,
                letter_spacing,
                width_scale,
                baseline_offset,
                ranges,
            };
            let output = output.unwrap_or_else(|| default_output(&fonts[0], size));
            convert(&fonts, &options, &output, json)
        }
        Command::Inspect { glyph, file } => inspect(&file, glyph),
    };
    if let Err(e) = result {
        exit_with(e);
    }
}

fn exit_with(error: impl std::fmt::Display) -> ! {
    eprintln!("{error}");
    std::process::exit(1);
}

fn default_output(font: &Path, size: u32) -> PathBuf {
    let name = font
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".into());
    PathBuf::from(format!("{name}_{size}.epdfont"))
}

/// The contents of a file, memory mapped.
struct MappedFile(memmap2::Mmap);

impl MappedFile {
    fn open(path: &Path) -> Result<Self, String> {
        let file = File::open(path).map_err(|e| format!("failed to open {path:?}: {e}"))?;
        // the file is only read and is not expected to change while we run
        let map = unsafe { memmap2::Mmap::map(&file) }
            .map_err(|e| format!("failed to map {path:?}: {e}"))?;
        Ok(Self(map))
    }

    fn data(&self) -> &[u8] {
        self.0.as_ref()
    }
}

fn convert(
    fonts: &[PathBuf],
    options: &ConvertOptions,
    output: &Path,
    json: bool,
) -> Result<(), String> {
    let files = fonts
        .iter()
        .map(|path| MappedFile::open(path))
        .collect::<Result<Vec<_>, _>>()?;
    let data = files.iter().map(MappedFile::data).collect::<Vec<_>>();
    let progress = |processed: u32, total: u32| {
        log::info!("{processed}/{total} code points");
    };
    let result = epdfont::convert_fonts(&data, options, progress).map_err(|e| e.to_string())?;
    std::fs::write(output, &result.bytes)
        .map_err(|e| format!("failed to write {output:?}: {e}"))?;
    if json {
        let json = serde_json::to_string_pretty(&result.stats).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        let stats = &result.stats;
        println!("wrote {}", output.display());
        println!("glyphs:       {}", stats.glyph_count);
        println!("intervals:    {}", stats.interval_count);
        println!("line advance: {}", stats.line_advance);
        println!("ascender:     {}", stats.ascender);
        println!("descender:    {}", stats.descender);
        println!("size:         {} bytes", stats.byte_size);
    }
    Ok(())
}

fn inspect(path: &Path, glyph: Option<char>) -> Result<(), String> {
    let file = MappedFile::open(path)?;
    let font = EpdFontRef::read(file.data()).map_err(|e| format!("{path:?}: {e}"))?;
    let header = font.header();
    println!("version:      {}", header.version);
    println!("bit depth:    {:?}", header.bit_depth());
    println!("line advance: {}", header.line_advance);
    println!("ascender:     {}", header.ascender());
    println!("descender:    {}", header.descender());
    println!("glyphs:       {}", header.glyph_count);
    println!("intervals:    {}", header.interval_count);
    for interval in font.intervals() {
        println!(
            "  U+{:04X}-U+{:04X} @ {}",
            interval.start(),
            interval.end(),
            interval.glyph_index_offset
        );
    }
    let Some(ch) = glyph else {
        return Ok(());
    };
    let record = font
        .glyph(ch as u32)
        .ok_or_else(|| format!("no glyph for {ch:?}"))?;
    println!(
        "{ch:?}: {}x{} advance {} left {} top {}",
        record.width, record.height, record.advance_x, record.left, record.top
    );
    let shades: &[char] = match font.bit_depth() {
        BitDepth::One => &[' ', '#'],
        BitDepth::Two => &[' ', '.', '+', '#'],
    };
    let levels = font.unpack(&record).map_err(|e| e.to_string())?;
    for row in levels.chunks(record.width.max(1) as usize) {
        let line: String = row.iter().map(|level| shades[*level as usize]).collect();
        println!("|{line}|");
    }
    Ok(())
}
