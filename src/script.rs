//! Line-oriented command scripts.
//!
//! ```text
//! DEPEND a b c     # alias: DEFINE
//! INSTALL a
//! REMOVE a
//! LIST
//! END
//! ```
//!
//! Keywords are case-insensitive. Blank lines and `#` comments are ignored.

use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::manager::PackageManager;

/// A single script command
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Define { name: String, deps: Vec<String> },
    Install(String),
    Remove(String),
    List,
    End,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Define { name, deps } => {
                write!(f, "DEPEND {}", name)?;
                for dep in deps {
                    write!(f, " {}", dep)?;
                }
                Ok(())
            }
            Op::Install(name) => write!(f, "INSTALL {}", name),
            Op::Remove(name) => write!(f, "REMOVE {}", name),
            Op::List => write!(f, "LIST"),
            Op::End => write!(f, "END"),
        }
    }
}

impl FromStr for Op {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let keyword = words.next().ok_or_else(|| anyhow!("Empty command"))?;
        let args: Vec<String> = words.map(str::to_string).collect();

        match keyword.to_ascii_uppercase().as_str() {
            "DEPEND" | "DEFINE" => {
                let mut args = args.into_iter();
                let name = args
                    .next()
                    .ok_or_else(|| anyhow!("{} needs a package name", keyword))?;
                Ok(Op::Define {
                    name,
                    deps: args.collect(),
                })
            }
            "INSTALL" => Ok(Op::Install(single_arg(keyword, args)?)),
            "REMOVE" => Ok(Op::Remove(single_arg(keyword, args)?)),
            "LIST" => no_args(keyword, &args).map(|_| Op::List),
            "END" => no_args(keyword, &args).map(|_| Op::End),
            _ => bail!("Unknown command '{}'", keyword),
        }
    }
}

fn single_arg(keyword: &str, args: Vec<String>) -> Result<String> {
    match <[String; 1]>::try_from(args) {
        Ok([name]) => Ok(name),
        Err(args) if args.is_empty() => bail!("{} needs a package name", keyword),
        Err(_) => bail!("{} takes exactly one package name", keyword),
    }
}

fn no_args(keyword: &str, args: &[String]) -> Result<()> {
    if !args.is_empty() {
        bail!("{} takes no arguments", keyword);
    }
    Ok(())
}

/// Parse a whole script, skipping blank lines and comments.
pub fn parse_script(text: &str) -> Result<Vec<Op>> {
    let mut ops = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        if line.trim().is_empty() {
            continue;
        }
        let op = line
            .parse::<Op>()
            .with_context(|| format!("Invalid command on line {}", index + 1))?;
        ops.push(op);
    }
    Ok(ops)
}

/// Outcome of running a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptSummary {
    pub executed: usize,
    pub failed: usize,
}

/// Execute `ops` against `manager`, writing a transcript to `out`.
///
/// Failed operations are reported in the transcript and do not stop the run.
pub fn run_script<W: Write>(
    manager: &mut PackageManager,
    ops: &[Op],
    out: &mut W,
) -> Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();

    for op in ops {
        writeln!(out, "{}", op)?;
        summary.executed += 1;

        match op {
            Op::Define { name, deps } => manager.define(name, deps.iter().cloned()),
            Op::Install(name) => match manager.install(name) {
                Ok(order) if order.is_empty() => {
                    writeln!(out, "   {} is already installed", name)?
                }
                Ok(order) => {
                    for pkg in order {
                        writeln!(out, "   Installing {}", pkg)?;
                    }
                }
                Err(e) => {
                    debug!("{} failed: {}", op, e);
                    summary.failed += 1;
                    writeln!(out, "   error: {}", e)?;
                }
            },
            Op::Remove(name) => match manager.remove(name) {
                Ok(order) if order.is_empty() => writeln!(out, "   {} is not installed", name)?,
                Ok(order) => {
                    for pkg in order {
                        writeln!(out, "   Removing {}", pkg)?;
                    }
                }
                Err(e) => {
                    debug!("{} failed: {}", op, e);
                    summary.failed += 1;
                    writeln!(out, "   error: {}", e)?;
                }
            },
            Op::List => {
                for pkg in manager.list() {
                    writeln!(out, "   {}", pkg)?;
                }
            }
            Op::End => {
                debug!("END reached, stopping");
                break;
            }
        }
    }

    Ok(summary)
}
