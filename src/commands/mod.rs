use anyhow::{Context, Result, bail};
use log::debug;
use std::io::{self, Write};
use std::path::Path;

use crate::{
    manager::PackageManager,
    runtime::Runtime,
    script::{parse_script, run_script},
};

pub mod config;

use config::Config;

/// Install packages in order, printing each newly installed package
#[tracing::instrument(skip(config))]
pub fn install<R: Runtime>(packages: &[String], config: Config<R>) -> Result<()> {
    let mut manager = config.load_manager()?;
    let stdout = io::stdout();
    install_with(&mut manager, packages, &mut stdout.lock())
}

fn install_with<W: Write>(
    manager: &mut PackageManager,
    packages: &[String],
    out: &mut W,
) -> Result<()> {
    for name in packages {
        let order = manager.install(name)?;
        if order.is_empty() {
            writeln!(out, "{} is already installed", name)?;
        }
        for pkg in order {
            writeln!(out, "{}", pkg)?;
        }
    }
    Ok(())
}

/// Show a package's direct dependencies and the order it would install in
#[tracing::instrument(skip(config))]
pub fn show<R: Runtime>(package: &str, config: Config<R>) -> Result<()> {
    let manager = config.load_manager()?;
    let stdout = io::stdout();
    show_with(&manager, package, &mut stdout.lock())
}

fn show_with<W: Write>(manager: &PackageManager, package: &str, out: &mut W) -> Result<()> {
    let deps = manager
        .dependencies(package)
        .with_context(|| format!("package {} not defined", package))?;

    // Install on a scratch copy so the order only reflects the graph
    let order = PackageManager::with_graph(manager.graph().clone()).install(package)?;

    writeln!(out, "Package: {}", package)?;
    if deps.is_empty() {
        writeln!(out, "Depends on: (none)")?;
    } else {
        writeln!(out, "Depends on: {}", deps.join(", "))?;
    }
    writeln!(out, "Install order: {}", order.join(" "))?;
    Ok(())
}

/// Run a command script against the manifest's packages
#[tracing::instrument(skip(config))]
pub fn run<R: Runtime>(script: &Path, config: Config<R>) -> Result<()> {
    let text = config
        .runtime
        .read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let ops = parse_script(&text)?;
    debug!("Parsed {} command(s) from {:?}", ops.len(), script);

    let mut manager = config.load_manager()?;
    let stdout = io::stdout();
    let summary = run_script(&mut manager, &ops, &mut stdout.lock())?;

    if summary.failed > 0 {
        bail!(
            "{} of {} operation(s) failed",
            summary.failed,
            summary.executed
        );
    }
    Ok(())
}
