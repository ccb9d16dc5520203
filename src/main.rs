// CLI entry for stripfilter
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use stripfilter::config::{
    PipelineConfig, DEFAULT_BLUR_STRENGTH, DEFAULT_SLICE_WIDTH, DEFAULT_WORKERS,
};
use stripfilter::filters::FilterKind;
use stripfilter::{logging, BatchRunner};

#[derive(Parser, Debug)]
#[command(
    name = "stripfilter",
    version,
    about = "Filter every image in a directory using a column-strip worker pool"
)]
struct Cli {
    /// Directory containing .jpg, .jpeg, .png or .bmp files
    #[arg(value_hint = ValueHint::DirPath)]
    source: PathBuf,

    /// Filter to apply: blur, invert, contrast, red, green, blue
    #[arg(short = 'f', long = "filter")]
    filter: FilterKind,

    /// Directory for processed_<name> outputs (created if missing)
    #[arg(short = 'o', long = "output", default_value = "results", value_hint = ValueHint::DirPath)]
    output: PathBuf,

    /// Number of worker threads
    #[arg(short = 'w', long = "workers", default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Fragment width in pixels
    #[arg(short = 's', long = "slice-width", default_value_t = DEFAULT_SLICE_WIDTH)]
    slice_width: usize,

    /// Blur window size (reads strength / 2 columns past each fragment)
    #[arg(short = 'b', long = "blur-strength", default_value_t = DEFAULT_BLUR_STRENGTH)]
    blur_strength: usize,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose).context("failed to initialize logging")?;

    let config = PipelineConfig::new(cli.workers, cli.slice_width, cli.blur_strength)
        .context("invalid configuration")?;
    let runner = BatchRunner::new(config, cli.filter.build(&config));

    let report = runner
        .run(&cli.source, &cli.output)
        .with_context(|| format!("batch over '{}' failed", cli.source.display()))?;

    println!("{report}");
    Ok(())
}
