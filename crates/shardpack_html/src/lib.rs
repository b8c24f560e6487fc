//! HTML implementations of the bundler's collaborators, built on `html5ever`.
//!
//! Imports are `<link rel="import" href="...">` elements. Everything else a document references
//! (scripts, stylesheets, images) is content as far as bundling is concerned.

use std::io::BufReader;

use anyhow::Error;
use html5ever::serialize::SerializeOpts;
use html5ever::tendril::TendrilSink;
use html5ever::{serialize, ParseOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};

pub use analyzer::*;
pub use document_format::*;
pub use inliner::*;

mod analyzer;
pub mod attrs;
pub mod dom;
pub mod dom_visitor;
mod document_format;
mod imports;
mod inliner;

#[cfg(test)]
mod test_utils;

pub fn serialize_html(dom: RcDom) -> Result<String, Error> {
  let document: SerializableHandle = dom.document.clone().into();
  let mut output_bytes = vec![];
  let options = SerializeOpts::default();
  serialize(&mut output_bytes, &document, options)?;
  Ok(String::from_utf8(output_bytes)?)
}

pub fn parse_html(bytes: &[u8]) -> Result<RcDom, Error> {
  let mut bytes = BufReader::new(bytes);
  let options = ParseOpts::default();
  let dom = RcDom::default();
  let dom = html5ever::parse_document(dom, options)
    .from_utf8()
    .read_from(&mut bytes)?;
  Ok(dom)
}
