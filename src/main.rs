use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use svn_mirror::cli::{run_sync, SyncOptions};
use svn_mirror::config::{self, MirrorConfig};
use svn_mirror::ui;

#[derive(clap::Parser)]
#[command(
    name = "svn-mirror",
    version,
    about = "Mirror Subversion release tags into a git repository"
)]
struct Args {
    #[arg(help = "Shared working copy (created on first run)")]
    working_copy: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Override the source repository URL")]
    source_url: Option<String>,

    #[arg(long, help = "Override the source development line")]
    trunk: Option<String>,

    #[arg(long, help = "Do not push branches and tags to the remote")]
    no_push: bool,

    #[arg(long, help = "Show which versions would be mirrored without changing anything")]
    dry_run: bool,

    #[arg(short, long, help = "Log every command that is run")]
    verbose: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut MirrorConfig) {
        if let Some(url) = &self.source_url {
            config.source.url = url.clone();
        }
        if let Some(trunk) = &self.trunk {
            config.source.trunk_branch = trunk.clone();
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "svn_mirror=debug"
    } else {
        "svn_mirror=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };
    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    let options = SyncOptions {
        push: !args.no_push,
        dry_run: args.dry_run,
    };

    match run_sync(config, &args.working_copy, &options) {
        Ok(report) => {
            tracing::info!(
                mirrored = report.mirrored.len(),
                skipped = report.skipped.len(),
                pushed = report.pushed,
                "sync finished"
            );
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
