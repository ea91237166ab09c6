//! Subcommand implementations.
use std::{
  fs,
  io::{self, Read, Write},
  path::Path,
};

use color_eyre::eyre::{Context, Result, bail};
use log::info;
use wikipage_config::Config;
use wikipage_toc::{
  DEFAULT_CSS,
  PagePipeline,
  TocBuilder,
  TocItem,
  TocMode,
  process_safe,
  utils::is_full_document,
};

/// Command line adjustments for `render`, applied on top of the loaded
/// configuration.
#[derive(Debug, Default, Clone)]
pub struct RenderOverrides {
  pub mode:             Option<TocMode>,
  pub min_headings:     Option<usize>,
  pub title:            Option<String>,
  pub no_section_links: bool,
  pub inline_styles:    bool,
}

impl RenderOverrides {
  /// Apply the flags that were given to `config`.
  pub fn apply(&self, config: &mut Config) {
    if let Some(mode) = self.mode {
      config.mode = mode;
    }
    if let Some(min_headings) = self.min_headings {
      config.toc.min_headings = min_headings;
    }
    if let Some(ref title) = self.title {
      config.toc.title.clone_from(title);
    }
    if self.no_section_links {
      config.toc.section_links = false;
    }
    if self.inline_styles {
      config.inline_styles = true;
    }
  }
}

/// Read a page from `input`, or stdin when it is `None` or `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn read_input(input: Option<&Path>) -> Result<String> {
  match input {
    Some(path) if path != Path::new("-") => {
      fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read page: {}", path.display()))
    },
    _ => {
      let mut content = String::new();
      io::stdin()
        .read_to_string(&mut content)
        .wrap_err("Failed to read page from stdin")?;
      Ok(content)
    },
  }
}

/// Write `content` to `output`, or stdout when it is `None`.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
  if let Some(path) = output {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
      && !parent.exists()
    {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
    }
    fs::write(path, content)
      .wrap_err_with(|| format!("Failed to write page: {}", path.display()))
  } else {
    let mut stdout = io::stdout().lock();
    stdout
      .write_all(content.as_bytes())
      .and_then(|()| stdout.flush())
      .wrap_err("Failed to write page to stdout")
  }
}

/// Put the default stylesheet into a page: into `<head>` for documents that
/// have one, at the top otherwise.
#[must_use]
pub fn with_styles(page: &str) -> String {
  let style = format!("<style>\n{DEFAULT_CSS}</style>\n");

  if is_full_document(page)
    && let Some(head_end) = page.to_ascii_lowercase().find("</head>")
  {
    let mut out = String::with_capacity(page.len() + style.len());
    out.push_str(&page[..head_end]);
    out.push_str(&style);
    out.push_str(&page[head_end..]);
    return out;
  }

  format!("{style}{page}")
}

/// Run the page through the configured transforms.
#[must_use]
pub fn render_page(config: &Config, html: &str) -> String {
  let page = if config.toc.enabled {
    let builder = TocBuilder::new(config.to_toc_options());
    match config.mode {
      TocMode::Dom => PagePipeline::new().with(builder).render(html),
      TocMode::Text => {
        process_safe(html, |content| {
          builder.process(content, TocMode::Text).html
        })
      },
    }
  } else {
    info!("Table of contents disabled, leaving page untouched");
    html.to_string()
  };

  if config.inline_styles {
    with_styles(&page)
  } else {
    page
  }
}

/// Compute the TOC entries of a page without keeping the rewritten markup.
///
/// Empty when the page is below the heading threshold or the TOC is
/// disabled.
#[must_use]
pub fn heading_items(config: &Config, html: &str) -> Vec<TocItem> {
  if !config.toc.enabled {
    return Vec::new();
  }
  TocBuilder::new(config.to_toc_options())
    .process(html, config.mode)
    .toc
    .map(|toc| toc.items)
    .unwrap_or_default()
}

/// `wikipage render`
///
/// # Errors
///
/// Returns an error if the page cannot be read or written.
pub fn render(
  config: &Config,
  input: Option<&Path>,
  output: Option<&Path>,
) -> Result<()> {
  let html = read_input(input)?;
  let rendered = render_page(config, &html);
  write_output(output, &rendered)?;

  if let Some(path) = output {
    info!("Rendered page written to {}", path.display());
  }
  Ok(())
}

/// `wikipage headings`
///
/// # Errors
///
/// Returns an error if the page cannot be read or the entries cannot be
/// written.
pub fn headings(config: &Config, input: Option<&Path>) -> Result<()> {
  let html = read_input(input)?;
  let items = heading_items(config, &html);
  let mut json = serde_json::to_string_pretty(&items)
    .wrap_err("Failed to serialize TOC entries")?;
  json.push('\n');
  write_output(None, &json)
}

/// `wikipage init`
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize how pages \
     are rendered."
  );
  Ok(())
}
