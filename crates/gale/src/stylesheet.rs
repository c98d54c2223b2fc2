//! Style rules and the ordered, deduplicated stylesheet they live in.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexSet;

/// Named partition of the aggregate stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Base,
    Components,
    Utilities,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Base, Layer::Components, Layer::Utilities];

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Base => "base",
            Layer::Components => "components",
            Layer::Utilities => "utilities",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.as_str() == name)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }
}

/// One selector with its declarations, optionally nested in at-rules
/// (outermost first). Identity is structural: two equal rules are the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    pub at_rules: Vec<String>,
    pub layer: Layer,
    /// Came from a preflight request
    pub preflight: bool,
}

impl StyleRule {
    pub fn new(selector: impl Into<String>, layer: Layer) -> Self {
        Self {
            selector: selector.into(),
            declarations: Vec::new(),
            at_rules: Vec::new(),
            layer,
            preflight: false,
        }
    }

    pub fn utility(selector: impl Into<String>) -> Self {
        Self::new(selector, Layer::Utilities)
    }

    pub fn declare(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration::new(property, value));
        self
    }

    pub fn declare_important(
        mut self,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut declaration = Declaration::new(property, value);
        declaration.important = true;
        self.declarations.push(declaration);
        self
    }

    pub fn within(mut self, at_rule: impl Into<String>) -> Self {
        self.at_rules.push(at_rule.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn write_css(&self, out: &mut String) {
        let depth = self.at_rules.len();
        for (level, at_rule) in self.at_rules.iter().enumerate() {
            indent(out, level);
            out.push_str(at_rule);
            out.push_str(" {\n");
        }

        indent(out, depth);
        out.push_str(&self.selector);
        out.push_str(" {\n");
        for declaration in &self.declarations {
            indent(out, depth + 1);
            out.push_str(&declaration.property);
            out.push_str(": ");
            out.push_str(&declaration.value);
            if declaration.important {
                out.push_str(" !important");
            }
            out.push_str(";\n");
        }
        indent(out, depth);
        out.push_str("}\n");

        for level in (0..depth).rev() {
            indent(out, level);
            out.push_str("}\n");
        }
    }
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

/// Ordered set of rules. Insertion order is kept until [`StyleSheet::sort_by`].
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: IndexSet<StyleRule>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one rule. Returns `false` if an identical rule is already present.
    pub fn add(&mut self, rule: StyleRule) -> bool {
        self.rules.insert(rule)
    }

    /// Append the rules of `other` that are not present yet and return how many
    /// were added. Preflight rules are tagged and moved to the base layer.
    pub fn extend(&mut self, other: StyleSheet, is_preflight: bool) -> usize {
        let mut added = 0;
        for mut rule in other.rules {
            if is_preflight {
                rule.preflight = true;
                rule.layer = Layer::Base;
            }
            if self.rules.insert(rule) {
                added += 1;
            }
        }
        added
    }

    /// Stable reorder.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&StyleRule, &StyleRule) -> Ordering,
    {
        self.rules.sort_by(|a, b| compare(a, b));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter()
    }

    pub fn contains(&self, rule: &StyleRule) -> bool {
        self.rules.contains(rule)
    }

    /// Serialize every non-empty rule. Same sheet, same bytes.
    pub fn build(&self) -> String {
        self.build_filtered(|_| true)
    }

    pub fn build_layer(&self, layer: Layer) -> String {
        self.build_filtered(|rule| rule.layer == layer)
    }

    fn build_filtered(&self, keep: impl Fn(&StyleRule) -> bool) -> String {
        let mut out = String::new();
        for rule in self.rules.iter().filter(|rule| !rule.is_empty() && keep(rule)) {
            if !out.is_empty() {
                out.push('\n');
            }
            rule.write_css(&mut out);
        }
        out
    }
}

impl FromIterator<StyleRule> for StyleSheet {
    fn from_iter<I: IntoIterator<Item = StyleRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
