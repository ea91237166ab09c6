use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wikipage_toc::TocMode;

/// Command line interface for wikipage
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "wikipage: table of contents for rendered wiki pages"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the wikipage CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new wikipage configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "wikipage.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Insert a table of contents into a page.
  Render {
    #[command(flatten)]
    page: PageArgs,

    /// Output file. Writes to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fewest headings a page needs to get a table of contents.
    #[arg(long)]
    min_headings: Option<usize>,

    /// Title shown above the table of contents.
    #[arg(short = 'T', long)]
    title: Option<String>,

    /// Do not append permalinks to headings.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_section_links: bool,

    /// Prepend the default stylesheet to the page.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    inline_styles: bool,
  },

  /// Print the table of contents entries of a page as JSON.
  Headings {
    #[command(flatten)]
    page: PageArgs,
  },
}

/// Input selection shared by the page commands.
#[derive(Args, Debug)]
pub struct PageArgs {
  /// Page to read. Reads stdin when omitted or `-`.
  pub input: Option<PathBuf>,

  /// Heading discovery mode.
  #[arg(short, long, value_parser = parse_mode)]
  pub mode: Option<TocMode>,
}

fn parse_mode(value: &str) -> Result<TocMode, String> {
  value.parse().map_err(|e: wikipage_toc::TocError| e.to_string())
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::panic, reason = "Fine in tests")]

  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_is_well_formed() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_render_flags() {
    let cli = Cli::try_parse_from([
      "wikipage",
      "-v",
      "render",
      "page.html",
      "--mode",
      "text",
      "--min-headings",
      "3",
      "--no-section-links",
      "--config",
      "toc.collapsed=true",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config_overrides, ["toc.collapsed=true"]);
    let Commands::Render {
      page,
      min_headings,
      no_section_links,
      ..
    } = cli.command
    else {
      panic!("expected render");
    };
    assert_eq!(page.input, Some(PathBuf::from("page.html")));
    assert_eq!(page.mode, Some(TocMode::Text));
    assert_eq!(min_headings, Some(3));
    assert!(no_section_links);
  }

  #[test]
  fn test_rejects_unknown_mode() {
    assert!(Cli::try_parse_from(["wikipage", "headings", "--mode", "xml"]).is_err());
  }
}
