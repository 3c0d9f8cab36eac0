use crate::{
    annotation::DEFAULT_BASE_QUALITY,
    utils::{InputSource, Result},
};
use clap::{ArgAction, ArgGroup, Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter};
use owo_colors::{
    colors::{Blue, Green, Magenta, Red, Yellow},
    OwoColorize, Stream, Style,
};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub const FULL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name="frs",
          version=FULL_VERSION,
          about="Featurized read sets: per-allele read features for variant records",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Enable or disable color output in logging
    #[arg(long, value_enum, default_value_t = Color::Auto, global = true, help_heading = "Advanced")]
    color: Color,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Annotate VCF records with featurized read sets")]
    Annotate(AnnotateArgs),
    #[clap(about = "Print the header lines of the annotation fields")]
    Header(HeaderArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Annotate(_) => "annotate",
            Command::Header(_) => "header",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("annotate")))]
#[command(arg_required_else_help(true))]
pub struct AnnotateArgs {
    /// VCF/BCF file with the sites to annotate
    #[arg(short = 'f', long = "vcf", value_name = "VCF", required = true)]
    pub bcf_src: InputSource,

    /// Indexed BAM/CRAM file with aligned reads
    #[arg(short = 'r', long = "reads", value_name = "READS", required = true)]
    pub reads_src: InputSource,

    /// Per-read allele likelihoods (chrom, pos, read, allele, log10 likelihood)
    #[arg(
        short = 'l',
        long = "likelihoods",
        value_name = "LIKELIHOODS",
        required = true
    )]
    pub likelihoods_src: InputSource,

    /// Output VCF/BCF path; the format follows the extension
    #[arg(
        short = 'o',
        long = "output",
        value_name = "OUTPUT",
        value_parser = check_output_path,
        required = true
    )]
    pub output_path: PathBuf,

    /// Sample to annotate (defaults to the first sample in the VCF)
    #[arg(
        long = "sample",
        value_name = "SAMPLE",
        value_parser = check_sample_name_nonempty
    )]
    pub sample_name: Option<String>,

    /// Maximum number of reference-supporting reads kept per site
    #[arg(long = "max-ref-count", value_name = "COUNT")]
    pub max_ref_count: Option<usize>,

    /// Seed for reference read downsampling; random if not set
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Base quality reported when a read has no base at the site
    #[arg(
        long = "default-base-quality",
        value_name = "QUAL",
        default_value_t = DEFAULT_BASE_QUALITY,
        help_heading = "Advanced"
    )]
    pub default_base_quality: u8,

    /// Number of threads
    #[arg(
        short = 't',
        long = "threads",
        value_name = "THREADS",
        default_value = "1",
        value_parser = threads_in_range
    )]
    pub num_threads: usize,

    /// Number of sites annotated together
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        default_value = "1000",
        value_parser = positive_count,
        help_heading = "Advanced"
    )]
    pub batch_size: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct HeaderArgs {}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Color {
    Always,
    Auto,
    Never,
}

impl Color {
    fn apply(self) {
        match self {
            Color::Always => owo_colors::set_override(true),
            Color::Auto => {}
            Color::Never => owo_colors::set_override(false),
        }
    }
}

pub fn init_verbose(args: &Cli) {
    args.color.apply();

    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(format_log)
        .filter_level(filter_level)
        .init();
}

#[inline(always)]
fn level_style(level: Level) -> (&'static str, Style) {
    match level {
        Level::Error => ("ERROR", Style::new().fg::<Red>().bold()),
        Level::Warn => ("WARN", Style::new().fg::<Yellow>()),
        Level::Info => ("INFO", Style::new().fg::<Green>()),
        Level::Debug => ("DEBUG", Style::new().fg::<Blue>()),
        Level::Trace => ("TRACE", Style::new().fg::<Magenta>()),
    }
}

fn format_log(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> std::io::Result<()> {
    let (label, style) = level_style(record.level());
    let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let painted_label = label.if_supports_color(Stream::Stderr, |t| style.style(t));
    writeln!(buf, "{ts} [{}] - {}", painted_label, record.args())
}

fn check_output_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(PathBuf::from(s))
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn positive_count(s: &str) -> Result<usize> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("`{}` is not a positive number", s)),
    }
}

fn check_sample_name_nonempty(s: &str) -> Result<String> {
    if s.trim().is_empty() {
        Err("Sample name cannot be an empty string".to_string())
    } else {
        Ok(s.to_string())
    }
}
