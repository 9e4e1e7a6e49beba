//! verpager - headless driver for the upgrade dialog's version pager
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use verpager_core::prelude::*;
use verpager_core::{logging, InstanceContext, VersionId};
use version_pager::HeadlessArgs;

/// Paginated, searchable version picker driven over stdin
#[derive(Parser, Debug)]
#[command(name = "verpager")]
#[command(about = "Pick an application version to upgrade to, headlessly", long_about = None)]
struct Args {
    /// JSON version catalog served by the fixture store
    #[arg(long, value_name = "FILE", required_unless_present = "init_config")]
    catalog: Option<PathBuf>,

    /// Sidebar parent key of the instance, "<envId>-<appId>"
    #[arg(long, value_name = "ENV-APP", required_unless_present = "init_config")]
    parent: Option<String>,

    /// Project the application belongs to
    #[arg(long, default_value_t = 1)]
    project: u64,

    /// Application instance being upgraded
    #[arg(long, default_value_t = 1)]
    instance: u64,

    /// Version currently deployed on the instance
    #[arg(long, value_name = "VERSION_ID")]
    preselect: Option<String>,

    /// Directory holding .verpager/config.toml
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Write a default .verpager/config.toml and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init()?;

    let config_dir = args
        .config_dir
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if args.init_config {
        verpager_app::config::init_config_dir(&config_dir)?;
        eprintln!("Wrote default settings under {}", config_dir.display());
        return Ok(());
    }

    let (Some(catalog_path), Some(parent)) = (args.catalog, args.parent) else {
        return Err(Error::config("--catalog and --parent are required"));
    };

    let context = InstanceContext::from_parent_key(args.project, args.instance, &parent)?;

    version_pager::run_headless(HeadlessArgs {
        context,
        catalog_path,
        preselected_version_id: args.preselect.map(VersionId::from),
        config_dir,
    })
    .await
}
