use color_eyre::eyre::{Context, Result};
use log::LevelFilter;
use wikipage::{
  cli::{Cli, Commands},
  commands::{self, RenderOverrides},
};
use wikipage_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => commands::init(&output, &format, force),

    Commands::Render {
      page,
      output,
      min_headings,
      title,
      no_section_links,
      inline_styles,
    } => {
      let mut config = load_config(&cli.config_files, &cli.config_overrides)?;
      RenderOverrides {
        mode: page.mode,
        min_headings,
        title,
        no_section_links,
        inline_styles,
      }
      .apply(&mut config);
      config.validate()?;

      commands::render(&config, page.input.as_deref(), output.as_deref())
    },

    Commands::Headings { page } => {
      let mut config = load_config(&cli.config_files, &cli.config_overrides)?;
      if let Some(mode) = page.mode {
        config.mode = mode;
      }

      commands::headings(&config, page.input.as_deref())
    },
  }
}

fn load_config(
  config_files: &[std::path::PathBuf],
  config_overrides: &[String],
) -> Result<Config> {
  Config::load(config_files, config_overrides)
    .wrap_err("Failed to load configuration")
}
