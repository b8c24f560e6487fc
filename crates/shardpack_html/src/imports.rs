use markup5ever::{expanded_name, local_name, namespace_url, ns};
use markup5ever_rcdom::Handle;

use crate::dom::{is_element, with_attrs};
use crate::dom_visitor::{walk, DomTraversalOperation, DomVisitor};

/// A `<link rel="import">` element and its href as written
#[derive(Debug)]
pub struct ImportLink {
  pub node: Handle,
  pub href: String,
}

#[derive(Default)]
struct ImportLinksVisitor {
  links: Vec<ImportLink>,
}

impl DomVisitor for ImportLinksVisitor {
  fn visit_node(&mut self, node: Handle) -> DomTraversalOperation {
    if !is_element(&node, expanded_name!(html "link")) {
      return DomTraversalOperation::Continue;
    }

    let href = with_attrs(&node, |attrs| {
      if !attrs.has_token("rel", "import") {
        return None;
      }

      attrs
        .get("href")
        .map(|href| href.to_string())
    })
    .flatten();

    if let Some(href) = href {
      self.links.push(ImportLink { node, href });
    }

    DomTraversalOperation::Continue
  }
}

/// Every import declared below `root`, in document order
pub fn import_links(root: &Handle) -> Vec<ImportLink> {
  let mut visitor = ImportLinksVisitor::default();
  walk(root.clone(), &mut visitor);
  visitor.links
}
