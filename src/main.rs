use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use spacing_rescale::samples::{all_samples, build_sample, find_sample};
use spacing_rescale::{
    ConsoleNotifier, Document, RescaleError, RescaleOptions, Rescaler, SystemFontLoader,
};

const USAGE: &str = "Usage: spacing-rescale <document.json | --sample NAME> [--output PATH] \
[--config PATH] [--reset-line-heights] [--font-dir DIR]... [--no-system-fonts]";

/// Command-line arguments.
#[derive(Debug, PartialEq)]
struct Args {
    input: Option<PathBuf>,
    sample: Option<String>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    reset_line_heights: bool,
    font_dirs: Vec<PathBuf>,
    system_fonts: bool,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input: None,
            sample: None,
            output: None,
            config: None,
            reset_line_heights: false,
            font_dirs: Vec::new(),
            system_fonts: true,
            help: false,
        }
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{flag} expects a value"))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-o" | "--output" => parsed.output = Some(next_value(&mut args, &arg)?.into()),
            "-c" | "--config" => parsed.config = Some(next_value(&mut args, &arg)?.into()),
            "--sample" => parsed.sample = Some(next_value(&mut args, &arg)?),
            "--font-dir" => parsed.font_dirs.push(next_value(&mut args, &arg)?.into()),
            "--reset-line-heights" => parsed.reset_line_heights = true,
            "--no-system-fonts" => parsed.system_fonts = false,
            flag if flag.starts_with('-') => bail!("unknown option {flag}"),
            _ if parsed.input.is_some() => bail!("only one document can be rescaled at a time"),
            _ => parsed.input = Some(PathBuf::from(&arg)),
        }
    }
    if !parsed.help && parsed.input.is_none() == parsed.sample.is_none() {
        bail!("expected either a document path or --sample");
    }
    Ok(parsed)
}

fn load_document(args: &Args) -> Result<Document> {
    if let Some(slug) = &args.sample {
        let Some(kind) = find_sample(slug) else {
            let known: Vec<&str> = all_samples().iter().map(|info| info.slug).collect();
            bail!("unknown sample {slug}, expected one of: {}", known.join(", "));
        };
        return Ok(build_sample(kind));
    }

    let path = args.input.as_ref().context("no document given")?;
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Document::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_document(document: &Document, output: Option<&PathBuf>) -> Result<()> {
    let json = document.to_json()?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut options = match &args.config {
        Some(path) => RescaleOptions::load(path)?,
        None => RescaleOptions::default(),
    };
    options.reset_line_heights |= args.reset_line_heights;

    let mut document = load_document(&args)?;

    let mut loader = if args.system_fonts {
        tokio::task::spawn_blocking(SystemFontLoader::with_system_fonts).await?
    } else {
        SystemFontLoader::new()
    };
    for dir in &args.font_dirs {
        loader.load_fonts_dir(dir);
    }
    log::debug!("Font database holds {} faces", loader.face_count());

    let rescaler = Rescaler::new(loader, options);
    let mut notifier = ConsoleNotifier::new();
    match rescaler.run(&mut document, &mut notifier).await {
        Ok(report) => {
            log::info!("{report:?}");
            write_document(&document, args.output.as_ref())
        }
        Err(err @ RescaleError::FontLoad { .. }) => {
            // Spacing and the other text nodes were still rescaled
            write_document(&document, args.output.as_ref())?;
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
