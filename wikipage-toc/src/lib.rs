//! # wikipage-toc - Table of contents generation for wiki pages
//!
//! Discovers the headings of a rendered wiki page, numbers them MediaWiki
//! style (`2.1.3`), gives each a unique anchor and splices a collapsible,
//! nested table of contents into the page.
//!
//! ## Quick Start
//!
//! ```rust
//! use wikipage_toc::{TocBuilder, TocMode, TocOptions};
//!
//! let builder = TocBuilder::new(TocOptions::default());
//! let outcome = builder.process(
//!   "<h1>Intro</h1><h2>Background</h2><h2>Setup</h2>",
//!   TocMode::Dom,
//! );
//!
//! let toc = outcome.toc.expect("three headings is enough");
//! assert_eq!(toc.items[2].number, "1.2");
//! assert!(outcome.html.starts_with("<div class=\"wiki-toc-container\">"));
//! ```
//!
//! ## Injection points
//!
//! The TOC goes to the first of these found in the page:
//!
//! 1. before an element with class `toc-before`
//! 2. after an element with class `toc-after`
//! 3. in place of a `<p>` holding only `__TOC__`
//! 4. in place of a `<wiki:toc/>` directive
//! 5. before the first heading
//!
//! Running the builder again over its own output does not add a second TOC.
//!
//! ## Modes
//!
//! [`TocMode::Dom`] parses the page with `kuchikikiki` and edits the tree.
//! [`TocMode::Text`] works on the raw markup with regular expressions, for
//! callers that only have the markup string. Both apply the same
//! `min_headings` threshold.

mod anchor;
mod builder;
pub mod dom;
mod error;
mod numbering;
mod options;
mod pipeline;
mod render;
pub mod text;
mod types;
pub mod utils;

pub use crate::{
  anchor::{AnchorNames, sanitize_anchor},
  builder::TocBuilder,
  error::TocError,
  numbering::TocNumberState,
  options::{TocMarkers, TocOptions, TocOptionsBuilder},
  pipeline::{PagePipeline, PageTransform, process_safe},
  render::{CONTAINER_CLASS, DEFAULT_CSS, render_container, render_list},
  types::{
    HeadingDescriptor,
    PageOutcome,
    Placement,
    TocItem,
    TocMode,
    TocResult,
  },
};
