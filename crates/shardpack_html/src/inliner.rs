use std::collections::HashSet;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use markup5ever::{expanded_name, local_name, namespace_url, ns};
use markup5ever_rcdom::Handle;
use shardpack_core::loader::{Loader, LoaderRef};
use shardpack_core::plugin::{InlineOptions, Inliner};
use shardpack_core::types::DocumentUrl;
use shardpack_core::url::{is_external, relative_url, resolve_url, url_dirname};

use crate::dom::{
  append_child, create_element, create_text, find_element, is_element, prepend_children,
  remove_node, replace_node, take_children, with_attrs,
};
use crate::dom_visitor::{walk, DomTraversalOperation, DomVisitor};
use crate::imports::import_links;
use crate::{parse_html, serialize_html};

/// Flattens a document and its imports into a single document.
#[derive(Debug)]
pub struct HtmlInliner {
  loader: LoaderRef,
}

impl HtmlInliner {
  pub fn new(loader: LoaderRef) -> Self {
    Self { loader }
  }

  fn inline(&self, url: &str, options: &InlineOptions) -> anyhow::Result<String> {
    let document = self
      .loader
      .load(url)
      .with_context(|| format!("Unable to read {url}"))?;
    let dom = parse_html(document.contents.as_bytes())?;

    let mut context = InlineContext {
      loader: &self.loader,
      excluded: options.excluded_imports.iter().cloned().collect(),
      inlined: HashSet::from([url.to_string()]),
    };
    context.inline_imports(&dom.document, url)?;

    if options.inline_scripts {
      context.inline_scripts(&dom.document, url)?;
    }

    if options.inline_css {
      context.inline_stylesheets(&dom.document, url)?;
    }

    if !options.added_imports.is_empty() {
      let head = find_element(&dom.document, expanded_name!(html "head"))
        .ok_or_else(|| anyhow!("{url} has no head element"))?;
      let links = options
        .added_imports
        .iter()
        .map(|href| create_element("link", &[("rel", "import"), ("href", href)]))
        .collect();
      prepend_children(&head, links);
    }

    serialize_html(dom)
  }
}

#[async_trait]
impl Inliner for HtmlInliner {
  async fn process(&self, url: &str, options: InlineOptions) -> anyhow::Result<String> {
    self.inline(url, &options)
  }
}

struct InlineContext<'a> {
  loader: &'a Loader,
  excluded: HashSet<DocumentUrl>,
  inlined: HashSet<DocumentUrl>,
}

impl InlineContext<'_> {
  /// Replaces every import below `root` with the contents of the imported document
  fn inline_imports(&mut self, root: &Handle, base_url: &str) -> anyhow::Result<()> {
    for link in import_links(root) {
      let Some(url) = resolve_url(base_url, &link.href) else {
        continue;
      };

      if self.excluded.contains(&url) {
        tracing::trace!(%url, importer = base_url, "Stripping excluded import");
        remove_node(&link.node);
        continue;
      }

      if !self.inlined.insert(url.clone()) {
        remove_node(&link.node);
        continue;
      }

      let imported = self
        .loader
        .load(&url)
        .with_context(|| format!("Unable to read {url}, imported by {base_url}"))?;
      let dom = parse_html(imported.contents.as_bytes())?;

      self.inline_imports(&dom.document, &url)?;
      rebase_urls(&dom.document, &url, base_url);

      let mut contents = Vec::new();
      for section in [expanded_name!(html "head"), expanded_name!(html "body")] {
        if let Some(section) = find_element(&dom.document, section) {
          contents.extend(take_children(&section));
        }
      }

      replace_node(&link.node, contents);
    }

    Ok(())
  }

  fn inline_scripts(&self, root: &Handle, base_url: &str) -> anyhow::Result<()> {
    for (node, src) in references(root, Reference::Script) {
      let Some(url) = resolve_url(base_url, &src) else {
        continue;
      };

      let script = self
        .loader
        .load(&url)
        .with_context(|| format!("Unable to read script {url}, referenced by {base_url}"))?;

      with_attrs(&node, |attrs| attrs.delete("src"));
      take_children(&node);
      append_child(&node, create_text(&script.contents));
    }

    Ok(())
  }

  fn inline_stylesheets(&self, root: &Handle, base_url: &str) -> anyhow::Result<()> {
    for (node, href) in references(root, Reference::Stylesheet) {
      let Some(url) = resolve_url(base_url, &href) else {
        continue;
      };

      let stylesheet = self
        .loader
        .load(&url)
        .with_context(|| format!("Unable to read stylesheet {url}, referenced by {base_url}"))?;

      let style = create_element("style", &[]);
      append_child(&style, create_text(&stylesheet.contents));
      replace_node(&node, vec![style]);
    }

    Ok(())
  }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Reference {
  Script,
  Stylesheet,
}

struct ReferencesVisitor {
  kind: Reference,
  references: Vec<(Handle, String)>,
}

impl DomVisitor for ReferencesVisitor {
  fn visit_node(&mut self, node: Handle) -> DomTraversalOperation {
    let reference = match self.kind {
      Reference::Script if is_element(&node, expanded_name!(html "script")) => {
        with_attrs(&node, |attrs| {
          attrs
            .get("src")
            .map(|src| src.to_string())
        })
      }
      Reference::Stylesheet if is_element(&node, expanded_name!(html "link")) => {
        with_attrs(&node, |attrs| {
          if !attrs.has_token("rel", "stylesheet") {
            return None;
          }

          attrs
            .get("href")
            .map(|href| href.to_string())
        })
      }
      _ => None,
    };

    if let Some(value) = reference.flatten() {
      if !is_external(&value) {
        self.references.push((node, value));
      }
    }

    DomTraversalOperation::Continue
  }
}

fn references(root: &Handle, kind: Reference) -> Vec<(Handle, String)> {
  let mut visitor = ReferencesVisitor {
    kind,
    references: Vec::new(),
  };
  walk(root.clone(), &mut visitor);
  visitor.references
}

struct RebaseVisitor<'a> {
  from_url: &'a str,
  to_dir: &'a str,
}

impl DomVisitor for RebaseVisitor<'_> {
  fn visit_node(&mut self, node: Handle) -> DomTraversalOperation {
    with_attrs(&node, |attrs| {
      for name in ["href", "src"] {
        let Some(value) = attrs.get(name).map(|value| value.to_string()) else {
          continue;
        };

        let Some(url) = resolve_url(self.from_url, &value) else {
          continue;
        };

        let suffix = value
          .find(|c: char| c == '?' || c == '#')
          .map(|index| &value[index..])
          .unwrap_or("");

        attrs.set(name, &format!("{}{suffix}", relative_url(self.to_dir, &url)));
      }
    });

    DomTraversalOperation::Continue
  }
}

/// Rewrites relative `href` and `src` attributes written for `from_url` so they resolve the same
/// from `to_url`
fn rebase_urls(root: &Handle, from_url: &str, to_url: &str) {
  if url_dirname(from_url) == url_dirname(to_url) {
    return;
  }

  let mut visitor = RebaseVisitor {
    from_url,
    to_dir: url_dirname(to_url),
  };
  walk(root.clone(), &mut visitor);
}
