use markup5ever::{namespace_url, ns, Attribute, LocalName, QualName};

/// Attributes of one element, addressed by local name in the null namespace.
///
/// Link, script and style attributes never carry a namespace, so lookups ignore prefixed
/// attributes such as `xlink:href`.
pub struct Attrs<'a> {
  attributes: &'a mut Vec<Attribute>,
}

impl<'a> Attrs<'a> {
  pub fn new(attributes: &'a mut Vec<Attribute>) -> Self {
    Self { attributes }
  }

  fn position(&self, name: &str) -> Option<usize> {
    self
      .attributes
      .iter()
      .position(|attribute| attribute.name.ns == ns!() && &*attribute.name.local == name)
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .position(name)
      .map(|index| &*self.attributes[index].value)
  }

  /// Whether the space separated attribute `name` contains `token`, ignoring ASCII case
  pub fn has_token(&self, name: &str, token: &str) -> bool {
    self.get(name).is_some_and(|value| {
      value
        .split_ascii_whitespace()
        .any(|candidate| candidate.eq_ignore_ascii_case(token))
    })
  }

  pub fn delete(&mut self, name: &str) {
    if let Some(index) = self.position(name) {
      self.attributes.remove(index);
    }
  }

  pub fn set(&mut self, name: &str, value: &str) {
    match self.position(name) {
      Some(index) => self.attributes[index].value = value.into(),
      None => self.attributes.push(Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.into(),
      }),
    }
  }
}
