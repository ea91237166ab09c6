use std::io;

use thiserror::Error;

/// Error type for wikipage-toc operations.
///
/// Building a table of contents never fails; these cover invalid options and
/// the I/O around serializing a parsed page.
#[derive(Debug, Error)]
pub enum TocError {
  #[error("Invalid TOC options: {0}")]
  InvalidOptions(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serialized page is not valid UTF-8: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),
}
