//! Ordered page enhancement transforms.
//!
//! A rendered page goes through each transform in the order they were added.
//! The TOC builder is one such transform; others (link rewriting, table
//! reformatting and so on) plug in through the same trait.
use kuchikikiki::NodeRef;
use log::{debug, error};

use crate::{builder::TocBuilder, dom, error::TocError};

/// One enhancement applied to a parsed page.
pub trait PageTransform {
  /// Short name used in logs.
  fn name(&self) -> &str;

  /// Mutate the page rooted at `root`. Returns whether anything was
  /// touched.
  fn transform(&self, root: &NodeRef) -> bool;
}

impl PageTransform for TocBuilder {
  fn name(&self) -> &str {
    "toc"
  }

  fn transform(&self, root: &NodeRef) -> bool {
    self.build_toc(root).is_some_and(|result| {
      debug!(
        "Built TOC with {} entries ({})",
        result.items.len(),
        result.placement
      );
      true
    })
  }
}

/// An explicit, ordered list of page transforms.
#[derive(Default)]
pub struct PagePipeline {
  transforms: Vec<Box<dyn PageTransform>>,
}

impl std::fmt::Debug for PagePipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PagePipeline")
      .field("transforms", &self.names())
      .finish()
  }
}

impl PagePipeline {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a transform, builder style.
  #[must_use]
  pub fn with<T: PageTransform + 'static>(mut self, transform: T) -> Self {
    self.push(transform);
    self
  }

  pub fn push<T: PageTransform + 'static>(&mut self, transform: T) {
    self.transforms.push(Box::new(transform));
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.transforms.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.transforms.is_empty()
  }

  /// Transform names in run order.
  #[must_use]
  pub fn names(&self) -> Vec<&str> {
    self.transforms.iter().map(|t| t.name()).collect()
  }

  /// Apply every transform to an already parsed page. Returns whether any
  /// of them touched it.
  pub fn run(&self, root: &NodeRef) -> bool {
    let mut changed = false;
    for transform in &self.transforms {
      debug!("Running page transform '{}'", transform.name());
      changed |= transform.transform(root);
    }
    changed
  }

  /// Parse, transform and serialize page markup.
  ///
  /// A page no transform touched comes back byte for byte, not
  /// re-serialized.
  ///
  /// # Errors
  ///
  /// Returns an error if the transformed page cannot be serialized.
  pub fn try_render(&self, html: &str) -> Result<String, TocError> {
    if self.is_empty() {
      return Ok(html.to_string());
    }
    let page = dom::parse_page(html);
    if !self.run(&page.root()) {
      return Ok(html.to_string());
    }
    dom::serialize_page(&page)
  }

  /// Like [`Self::try_render`], but any failure yields the input unchanged.
  #[must_use]
  pub fn render(&self, html: &str) -> String {
    process_safe(html, |content| {
      self.try_render(content).unwrap_or_else(|e| {
        error!("Failed to render page: {e}");
        content.to_string()
      })
    })
  }
}

/// Run `processor_fn` over `content`, returning `content` itself if the
/// processor panics.
pub fn process_safe<F>(content: &str, processor_fn: F) -> String
where
  F: FnOnce(&str) -> String,
{
  if content.is_empty() {
    return String::new();
  }

  let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor_fn(content)
  }));

  match result {
    Ok(processed) => processed,
    Err(e) => {
      if let Some(error_msg) = e.downcast_ref::<String>() {
        error!("Error processing page: {error_msg}");
      } else if let Some(error_msg) = e.downcast_ref::<&str>() {
        error!("Error processing page: {error_msg}");
      } else {
        error!("Unknown error occurred while processing page");
      }
      content.to_string()
    },
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  struct Recorder {
    name: &'static str,
    log:  Rc<RefCell<Vec<&'static str>>>,
  }

  impl PageTransform for Recorder {
    fn name(&self) -> &str {
      self.name
    }

    fn transform(&self, _root: &NodeRef) -> bool {
      self.log.borrow_mut().push(self.name);
      false
    }
  }

  #[test]
  fn test_transforms_run_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let pipeline = PagePipeline::new()
      .with(Recorder {
        name: "first",
        log:  Rc::clone(&log),
      })
      .with(TocBuilder::default())
      .with(Recorder {
        name: "last",
        log:  Rc::clone(&log),
      });

    assert_eq!(pipeline.names(), ["first", "toc", "last"]);
    let _ = pipeline.render("<h1>A</h1><h1>B</h1>");
    assert_eq!(*log.borrow(), ["first", "last"]);
  }

  #[test]
  fn test_empty_pipeline_is_identity() {
    let pipeline = PagePipeline::new();
    assert!(pipeline.is_empty());
    assert_eq!(pipeline.render("<p>unparsed <b>x"), "<p>unparsed <b>x");
  }

  #[test]
  fn test_untouched_page_is_not_reserialized() {
    let pipeline = PagePipeline::new().with(TocBuilder::default());
    assert_eq!(pipeline.len(), 1);
    assert_eq!(pipeline.render("<h1>Only<p>unclosed"), "<h1>Only<p>unclosed");
  }

  #[test]
  fn test_process_safe_recovers_from_panic() {
    #[allow(clippy::panic, reason = "Exercising panic recovery")]
    let out = process_safe("<h1>A</h1>", |_| panic!("boom"));
    assert_eq!(out, "<h1>A</h1>");
    assert_eq!(process_safe("", |_| "x".to_string()), "");
  }
}
