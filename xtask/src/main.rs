//! Development tasks for branchplay
//!
//! Usage: `cargo xtask man [--out-dir DIR]`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_mangen::Man;

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for branchplay")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages for branchplay and its subcommands
    Man {
        /// Directory to write the pages to
        #[arg(long, default_value = "target/man")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    match Xtask::parse().task {
        Task::Man { out_dir } => generate_man_pages(&out_dir),
    }
}

fn generate_man_pages(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let command = branchplay::cli::Cli::command();
    write_page(out_dir, "branchplay", Man::new(command.clone()))?;

    for sub in command.get_subcommands() {
        let name = format!("branchplay-{}", sub.get_name());
        write_page(out_dir, &name, Man::new(sub.clone()).title(name.clone()))?;
    }

    println!("Man pages written to {}", out_dir.display());
    Ok(())
}

fn write_page(out_dir: &Path, name: &str, man: Man) -> Result<()> {
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .with_context(|| format!("Failed to render man page {}", name))?;
    let path = out_dir.join(format!("{}.1", name));
    fs::write(&path, buffer).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
