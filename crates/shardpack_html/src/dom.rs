//! Small tree editing helpers for `markup5ever_rcdom`, which only exposes raw node fields.

use std::cell::RefCell;
use std::rc::Rc;

use markup5ever::{namespace_url, ns, Attribute, ExpandedName, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData};

use crate::attrs::Attrs;
use crate::dom_visitor::{walk, DomTraversalOperation, DomVisitor};

/// Creates an HTML element with attributes in the null namespace
pub fn create_element(name: &str, attributes: &[(&str, &str)]) -> Handle {
  let attributes = attributes
    .iter()
    .map(|(name, value)| Attribute {
      name: QualName::new(None, ns!(), LocalName::from(*name)),
      value: (*value).into(),
    })
    .collect();

  Node::new(NodeData::Element {
    name: QualName::new(None, ns!(html), LocalName::from(name)),
    attrs: RefCell::new(attributes),
    template_contents: RefCell::new(None),
    mathml_annotation_xml_integration_point: false,
  })
}

pub fn create_text(contents: &str) -> Handle {
  Node::new(NodeData::Text {
    contents: RefCell::new(contents.into()),
  })
}

/// Runs `f` with the attributes of an element. Other nodes have no attributes.
pub fn with_attrs<T>(node: &Handle, f: impl FnOnce(&mut Attrs) -> T) -> Option<T> {
  let NodeData::Element { attrs, .. } = &node.data else {
    return None;
  };

  let mut attrs = attrs.borrow_mut();
  let mut attrs = Attrs::new(&mut attrs);
  Some(f(&mut attrs))
}

pub fn is_element(node: &Handle, name: ExpandedName) -> bool {
  matches!(&node.data, NodeData::Element { name: element, .. } if element.expanded() == name)
}

struct FindElement<'a> {
  name: ExpandedName<'a>,
  found: Option<Handle>,
}

impl DomVisitor for FindElement<'_> {
  fn visit_node(&mut self, node: Handle) -> DomTraversalOperation {
    if is_element(&node, self.name) {
      self.found = Some(node);
      return DomTraversalOperation::Stop;
    }

    DomTraversalOperation::Continue
  }
}

/// First element called `name` below `root`, in document order
pub fn find_element(root: &Handle, name: ExpandedName) -> Option<Handle> {
  let mut visitor = FindElement { name, found: None };
  walk(root.clone(), &mut visitor);
  visitor.found
}

pub fn append_child(parent: &Handle, child: Handle) {
  child.parent.set(Some(Rc::downgrade(parent)));
  parent.children.borrow_mut().push(child);
}

pub fn prepend_children(parent: &Handle, children: Vec<Handle>) {
  for child in &children {
    child.parent.set(Some(Rc::downgrade(parent)));
  }
  parent.children.borrow_mut().splice(0..0, children);
}

/// Detaches every child of `node`
pub fn take_children(node: &Handle) -> Vec<Handle> {
  let children = std::mem::take(&mut *node.children.borrow_mut());
  for child in &children {
    child.parent.set(None);
  }
  children
}

/// Replaces `node` with `replacements` in its parent. Returns `false` for detached nodes.
pub fn replace_node(node: &Handle, replacements: Vec<Handle>) -> bool {
  let Some(parent) = node.parent.take().and_then(|parent| parent.upgrade()) else {
    return false;
  };

  let mut children = parent.children.borrow_mut();
  let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, node)) else {
    return false;
  };

  for replacement in &replacements {
    replacement.parent.set(Some(Rc::downgrade(&parent)));
  }
  children.splice(index..=index, replacements);

  true
}

pub fn remove_node(node: &Handle) -> bool {
  replace_node(node, Vec::new())
}
