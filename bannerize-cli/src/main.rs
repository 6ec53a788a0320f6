//! Command line front end: renders its arguments as a banner on stdout or into a file.

use std::path::PathBuf;

use anyhow::{Result, bail};
use bannerize::font::BannerLibrary;
use bannerize::render::{
    Alignment, Highlight, OutputFile, RenderOptions, RenderRequest, normalize_line_breaks,
};
use clap::Parser;
use log::debug;
use terminal_size::{Width, terminal_size};

const DEFAULT_BANNER: &str = "standard";
const FALLBACK_WIDTH: usize = 80;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let args = cli.positional()?;
    let font = BannerLibrary::new(&cli.banners_dir).load(args.banner)?;
    let text = normalize_line_breaks(args.text);
    let highlight = match args.substring {
        Some(substring) => Highlight::Substring(substring),
        None if cli.color.is_some() => Highlight::All,
        None => Highlight::None,
    };
    let request = RenderRequest {
        text: &text,
        highlight,
        font: &font,
        options: cli.options(),
    };
    let output = request.render()?;
    if cli.output.is_none() {
        println!("{output}");
    }
    Ok(())
}

#[derive(Parser)]
#[command(version, about, override_usage = "bannerize [OPTION] [SUBSTRING] STRING [BANNER]")]
struct Cli {
    /// Color for the substring (or the whole text): a name, rgb(r, g, b) or hsl(h, s%, l%)
    #[arg(long)]
    color: Option<String>,
    /// Alignment within the terminal width: left, center or right (other names align left)
    #[arg(long)]
    align: Option<String>,
    /// Write the banner to this file in the output directory instead of printing it
    #[arg(long)]
    output: Option<PathBuf>,
    /// Width to align within; defaults to the terminal width
    #[arg(long)]
    width: Option<usize>,
    /// Directory holding the banner fonts
    #[arg(long, default_value = "banners")]
    banners_dir: PathBuf,
    /// Directory for --output files
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,
    /// [SUBSTRING] STRING [BANNER]
    #[arg(required = true, num_args = 1..=3)]
    args: Vec<String>,
}

struct Positional<'a> {
    substring: Option<&'a str>,
    text: &'a str,
    banner: &'a str,
}

impl Cli {
    fn positional(&self) -> Result<Positional<'_>> {
        let positional = match (self.args.as_slice(), self.color.is_some()) {
            ([text], _) => Positional {
                substring: None,
                text,
                banner: DEFAULT_BANNER,
            },
            ([substring, text], true) => Positional {
                substring: Some(substring.as_str()),
                text,
                banner: DEFAULT_BANNER,
            },
            ([text, banner], false) => Positional {
                substring: None,
                text,
                banner,
            },
            ([substring, text, banner], _) => Positional {
                substring: Some(substring.as_str()),
                text,
                banner,
            },
            _ => bail!("expected [SUBSTRING] STRING [BANNER], got {} arguments", self.args.len()),
        };
        Ok(positional)
    }

    fn options(&self) -> RenderOptions {
        let alignment = self
            .align
            .as_deref()
            .map(Alignment::from_name)
            .unwrap_or_default();
        let width = self
            .align
            .as_ref()
            .map(|_| self.width.unwrap_or_else(terminal_width));
        debug!("alignment {alignment:?} within {width:?} columns");
        RenderOptions {
            color: self.color.clone(),
            alignment,
            width,
            output: self.output.clone().map(|file| OutputFile {
                dir: self.output_dir.clone(),
                file,
            }),
        }
    }
}

fn terminal_width() -> usize {
    terminal_size().map_or(FALLBACK_WIDTH, |(Width(width), _)| usize::from(width))
}
