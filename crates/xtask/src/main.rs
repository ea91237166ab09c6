use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

const BIN_NAME: &str = "wikipage";

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Artifact {
  Completions,
  Manpage,
  Stylesheet,
}

#[derive(Subcommand)]
enum Commands {
  /// Build distribution artifacts for the wikipage CLI
  Dist {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Only build these artifacts. Builds everything when omitted.
    #[arg(long = "only", value_enum, action = clap::ArgAction::Append)]
    only: Vec<Artifact>,
  },
}

fn main() -> Result<()> {
  let xtask = Xtask::parse();

  match xtask.command {
    Commands::Dist { output_dir, only } => {
      let wanted = |artifact| only.is_empty() || only.contains(&artifact);

      if wanted(Artifact::Completions) {
        generate_completions(&output_dir)?;
      }
      if wanted(Artifact::Manpage) {
        generate_manpage(&output_dir)?;
      }
      if wanted(Artifact::Stylesheet) {
        write_stylesheet(&output_dir)?;
      }
    },
  }

  Ok(())
}

/// Generate shell completions for various shells.
fn generate_completions(output_dir: &Path) -> Result<()> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir)?;
  let mut cmd = wikipage::cli::Cli::command();
  for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
    generate_to(shell, &mut cmd, BIN_NAME, &completions_dir).with_context(
      || format!("Failed to generate {shell} completions"),
    )?;
  }
  println!(
    "Shell completions generated in {}",
    completions_dir.display()
  );
  Ok(())
}

/// Generate the manpage for the wikipage CLI.
fn generate_manpage(output_dir: &Path) -> Result<()> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)?;
  let man = Man::new(wikipage::cli::Cli::command().name(BIN_NAME));
  let file_path = man_dir.join(format!("{BIN_NAME}.1"));
  let mut file = fs::File::create(&file_path).with_context(|| {
    format!("Failed to create manpage file at {}", file_path.display())
  })?;
  man
    .render(&mut file)
    .with_context(|| "Failed to render manpage")?;
  println!("Manpage generated in {}", man_dir.display());
  Ok(())
}

/// Write the default TOC stylesheet for sites that link it instead of
/// inlining it.
fn write_stylesheet(output_dir: &Path) -> Result<()> {
  fs::create_dir_all(output_dir)?;
  let file_path = output_dir.join("wikipage-toc.css");
  fs::write(&file_path, wikipage_toc::DEFAULT_CSS).with_context(|| {
    format!("Failed to write stylesheet at {}", file_path.display())
  })?;
  println!("Stylesheet written to {}", file_path.display());
  Ok(())
}
