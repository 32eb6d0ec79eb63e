use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use xmlenum::{render_with_config, Aggregator, Config, RenderConfig, TagTree};

#[derive(Debug, Parser)]
#[command(
    name = "xmlenum",
    version,
    about = "Enumerate the tag shapes beneath an XML element across files"
)]
struct Args {
    /// Element whose contents are enumerated
    #[arg(value_name = "FIRST_ELEMENT_NAME")]
    root: String,
    /// XML files to scan, merged in order
    #[arg(value_name = "FILE", required = true, num_args = 1..)]
    files: Vec<PathBuf>,
    /// Spaces per nesting level
    #[arg(
        long,
        value_name = "N",
        default_value_t = 4,
        value_parser = clap::value_parser!(u8).range(1..=8)
    )]
    indent: u8,
    /// Largest accepted input file in bytes (0 means unlimited)
    #[arg(long, value_name = "BYTES", default_value_t = 0)]
    max_size: usize,
    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let tree = aggregate(&args)?;
    let config = RenderConfig::new(usize::from(args.indent));
    let output = render_with_config(&tree, &config);

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("failed to write stdout")?;
    stdout.flush().context("failed to write stdout")?;
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Merge every input file; the first failure ends the run.
fn aggregate(args: &Args) -> Result<TagTree> {
    let reader_config = Config::new(args.max_size);
    let mut aggregator = Aggregator::new(args.root.as_str());

    for path in &args.files {
        info!("Reading file: {}", path.display());
        let content = std::fs::read(path)
            .with_context(|| format!("couldn't open {}", path.display()))?;
        aggregator
            .feed_bytes_with_config(&content, reader_config)
            .with_context(|| format!("couldn't parse {}", path.display()))?;
        debug!(file = %path.display(), tags = aggregator.tree().len(), "merged");
    }

    Ok(aggregator.into_tree())
}
