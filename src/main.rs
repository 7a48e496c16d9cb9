use anyhow::Result;
use clap::Parser;
use simpledeps::commands::{self, config::Config};
use std::path::PathBuf;

/// simpledeps - in-memory package dependency manager
///
/// Loads package definitions from a JSON manifest and installs or removes
/// packages together with their dependencies. Nothing is kept between runs.
///
/// The manifest is taken from --manifest, the SIMPLEDEPS_MANIFEST environment
/// variable, or simpledeps.json in the current directory, in that order.
///
/// Examples:
///   simpledeps --manifest deps.json install a    # Print the install order of a
///   simpledeps run script.txt                    # Execute a command script
#[derive(Parser, Debug)]
#[command(author, version = env!("SIMPLEDEPS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON manifest with package definitions
    #[arg(long = "manifest", short = 'm', value_name = "PATH", global = true)]
    pub manifest: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install packages and print every newly installed package in order
    Install(InstallArgs),

    /// Show a package's dependencies and install order
    Show(ShowArgs),

    /// Run a script of DEPEND/INSTALL/REMOVE/LIST commands
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Packages to install, in order
    #[arg(value_name = "PACKAGE", required = true)]
    pub packages: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    #[arg(value_name = "PACKAGE")]
    pub package: String,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Path to the command script
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::new(simpledeps::runtime::RealRuntime, cli.manifest)?;

    match cli.command {
        Commands::Install(args) => commands::install(&args.packages, config)?,
        Commands::Show(args) => commands::show(&args.package, config)?,
        Commands::Run(args) => commands::run(&args.script, config)?,
    }
    Ok(())
}
