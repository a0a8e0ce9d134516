//! Inline style declarations.
//!
//! A tolerant parser/serializer for the `style="prop: value; ..."`
//! attribute format. Order-preserving; setting an existing property
//! replaces its value in place.

/// An ordered list of inline style declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDecls {
    decls: Vec<(String, String)>,
}

impl StyleDecls {
    /// Empty declaration list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the contents of a `style` attribute.
    ///
    /// Declarations without a `:` or with an empty property name are
    /// skipped rather than treated as errors.
    pub fn parse(css: &str) -> Self {
        let mut decls = Vec::new();
        for decl in css.split(';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim();
            if prop.is_empty() || value.is_empty() {
                continue;
            }
            decls.push((prop, value.to_string()));
        }
        Self { decls }
    }

    /// Current value of `prop`, if declared.
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Set `prop` to `value`, replacing any existing declaration.
    pub fn set(&mut self, prop: &str, value: &str) {
        let prop = prop.to_ascii_lowercase();
        if let Some(entry) = self.decls.iter_mut().find(|(p, _)| *p == prop) {
            entry.1 = value.to_string();
        } else {
            self.decls.push((prop, value.to_string()));
        }
    }

    /// Remove the declaration for `prop`. Returns true if one existed.
    pub fn remove(&mut self, prop: &str) -> bool {
        let before = self.decls.len();
        self.decls.retain(|(p, _)| p != prop);
        self.decls.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Serialize back to `style` attribute form.
    pub fn to_css(&self) -> String {
        self.decls
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
