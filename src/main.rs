use anyhow::Result;
use clap::Parser;
use devstage::core::Config;
use devstage::io::{InputReader, ManifestReader, StdinReader};
use devstage::processing::ExclusionSet;
use devstage::service::StagingService;

#[derive(Parser)]
#[command(
    name = "devstage",
    about = "Maps build runtime dependencies to on-device staging paths for Android test deployment",
    version = "0.2.0"
)]
struct Args {
    /// Runtime-deps manifest listing host-relative paths (reads from stdin if not provided)
    #[arg(short = 'f', long = "runtime-deps")]
    runtime_deps: Option<String>,

    /// Absolute path to the build output directory (overrides environment variables)
    #[arg(short = 'o', long = "output-directory")]
    output_directory: Option<String>,

    /// Absolute path to the source tree root (overrides environment variables)
    #[arg(short = 's', long = "source-root")]
    source_root: Option<String>,

    /// Expand manifest entries that name directories into their files
    #[arg(long = "expand-dirs")]
    expand_dirs: bool,

    /// Disable progress output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::builder()
        .output_directory(args.output_directory.as_deref(), true)
        .source_root(args.source_root.as_deref(), true)
        .show_progress(!args.quiet)
        .build()?;

    let rules = ExclusionSet::device_defaults()?;

    // Create reader based on input source
    let reader: Box<dyn InputReader> = match &args.runtime_deps {
        Some(manifest_path) => Box::new(ManifestReader::new(manifest_path)),
        None => Box::new(StdinReader::new()),
    };

    let service = StagingService::new(reader, config, rules).expand_dirs(args.expand_dirs);
    service.run().await?;

    Ok(())
}
