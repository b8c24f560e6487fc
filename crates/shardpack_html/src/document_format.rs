use anyhow::anyhow;
use markup5ever::{expanded_name, local_name, namespace_url, ns};
use shardpack_core::plugin::DocumentFormat;
use shardpack_core::types::{DocumentUrl, ShellRewrite};

use crate::dom::{append_child, create_element, find_element, remove_node};
use crate::imports::import_links;
use crate::{parse_html, serialize_html};

/// Edits HTML import declarations.
#[derive(Debug, Default)]
pub struct HtmlDocumentFormat {}

impl DocumentFormat for HtmlDocumentFormat {
  fn declared_imports(&self, contents: &str) -> anyhow::Result<Vec<String>> {
    let dom = parse_html(contents.as_bytes())?;

    Ok(
      import_links(&dom.document)
        .into_iter()
        .map(|link| link.href)
        .collect(),
    )
  }

  fn apply_shell_rewrite(&self, contents: &str, rewrite: &ShellRewrite) -> anyhow::Result<String> {
    let dom = parse_html(contents.as_bytes())?;

    for link in import_links(&dom.document) {
      if rewrite.remove.contains(&link.href) {
        remove_node(&link.node);
      }
    }

    let head = find_element(&dom.document, expanded_name!(html "head"))
      .ok_or_else(|| anyhow!("Shell has no head element"))?;
    for href in &rewrite.append {
      append_child(
        &head,
        create_element("link", &[("rel", "import"), ("href", href)]),
      );
    }

    serialize_html(dom)
  }

  fn import_document(&self, imports: &[DocumentUrl]) -> String {
    imports
      .iter()
      .map(|import| {
        let href = import.replace('&', "&amp;").replace('"', "&quot;");
        format!(r#"<link rel="import" href="{href}">"#)
      })
      .collect::<Vec<_>>()
      .join("\n")
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::test_utils::normalize_html;

  const SHELL: &str = r#"
    <html>
      <head>
        <link rel="import" href="../lib/polymer.html">
        <link rel="import" href="app-layout.html">
        <link rel="stylesheet" href="theme.css">
      </head>
      <body><app-shell></app-shell></body>
    </html>
  "#;

  fn rewrite() -> ShellRewrite {
    ShellRewrite {
      remove: ["../lib/polymer.html".to_string()].into_iter().collect(),
      append: vec![
        String::from("../lib/polymer.html"),
        String::from("../lib/card.html"),
      ],
    }
  }

  #[test]
  fn reads_declared_imports_as_written() {
    assert_eq!(
      HtmlDocumentFormat::default().declared_imports(SHELL).unwrap(),
      vec!["../lib/polymer.html", "app-layout.html"]
    );
  }

  #[test]
  fn moves_imports_to_the_end_of_the_head() {
    let output = HtmlDocumentFormat::default()
      .apply_shell_rewrite(SHELL, &rewrite())
      .unwrap();

    assert_eq!(
      normalize_html(&output),
      normalize_html(
        r#"
        <html>
          <head>
            <link rel="import" href="app-layout.html">
            <link rel="stylesheet" href="theme.css">
            <link rel="import" href="../lib/polymer.html">
            <link rel="import" href="../lib/card.html">
          </head>
          <body><app-shell></app-shell></body>
        </html>
        "#
      )
    );
  }

  #[test]
  fn rewriting_twice_changes_nothing_more() {
    let format = HtmlDocumentFormat::default();
    let once = format.apply_shell_rewrite(SHELL, &rewrite()).unwrap();

    let declared = format.declared_imports(&once).unwrap();
    let again = ShellRewrite {
      remove: declared
        .into_iter()
        .filter(|href| href.starts_with("../lib/"))
        .collect(),
      append: rewrite().append,
    };
    let twice = format.apply_shell_rewrite(&once, &again).unwrap();

    assert_eq!(twice, once);
  }

  #[test]
  fn renders_import_documents() {
    assert_eq!(
      HtmlDocumentFormat::default().import_document(&[
        String::from("lib/polymer.html"),
        String::from("lib/a&b.html"),
      ]),
      "<link rel=\"import\" href=\"lib/polymer.html\">\n<link rel=\"import\" href=\"lib/a&amp;b.html\">"
    );
  }
}
