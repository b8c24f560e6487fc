use serde::Serialize;

use super::DocumentUrl;

/// A document's identity plus its current text.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, Serialize)]
pub struct Document {
  pub url: DocumentUrl,
  pub contents: String,
}

impl Document {
  pub fn new(url: impl Into<DocumentUrl>, contents: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      contents: contents.into(),
    }
  }
}
