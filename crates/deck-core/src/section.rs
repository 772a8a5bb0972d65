//! The recursive section tree: `section` (leaf container), `row`
//! (horizontal) and `column` (vertical child of a row), per spec §3.

use serde::{Deserialize, Serialize};

use crate::directive::Directives;
use crate::element::Element;
use crate::geometry::{LogicalPosition, LogicalSize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Section,
    Row,
    Column,
}

/// A child of a `Section`'s `children` list: either a rendered leaf or
/// a nested container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf(Element),
    Container(Section),
}

impl Node {
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Node::Container(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Node::Container(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Element> {
        match self {
            Node::Leaf(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Leaf(e) => Some(e),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<LogicalPosition> {
        match self {
            Node::Leaf(e) => e.position,
            Node::Container(s) => s.position,
        }
    }

    pub fn size(&self) -> Option<LogicalSize> {
        match self {
            Node::Leaf(e) => e.size,
            Node::Container(s) => s.size,
        }
    }

    pub fn directives(&self) -> &Directives {
        match self {
            Node::Leaf(e) => &e.directives,
            Node::Container(s) => &s.directives,
        }
    }

    /// Count of visible leaves within this node, recursively.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Container(s) => s.children.iter().map(Node::leaf_count).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub kind: SectionKind,
    pub position: Option<LogicalPosition>,
    pub size: Option<LogicalSize>,
    pub directives: Directives,
    pub children: Vec<Node>,
}

impl Section {
    pub fn new(id: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: None,
            size: None,
            directives: Directives::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn leaf_count(&self) -> usize {
        self.children.iter().map(Node::leaf_count).sum()
    }

    /// Validates the nesting rules from spec §3:
    /// - a `column` may only appear as a direct child of a `row`;
    /// - a `section` may not be a direct child of another `section`;
    /// - a `row` contains only `column`s; a `column` contains only
    ///   `section`s or `row`s.
    ///
    /// Returns the first violation found, if any. The (external) parser
    /// is expected to uphold these; this is a defensive check the
    /// engine runs once per top-level layout call so a malformed input
    /// surfaces as a `GrammarError` rather than corrupting layout.
    pub fn validate(&self) -> Result<(), SectionGrammarViolation> {
        self.validate_children()
    }

    fn validate_children(&self) -> Result<(), SectionGrammarViolation> {
        for child in &self.children {
            if let Node::Container(child_section) = child {
                match (self.kind, child_section.kind) {
                    (SectionKind::Row, SectionKind::Column) => {}
                    (SectionKind::Row, _) => {
                        return Err(SectionGrammarViolation::RowContainsNonColumn {
                            row_id: self.id.clone(),
                        })
                    }
                    (SectionKind::Column, SectionKind::Section)
                    | (SectionKind::Column, SectionKind::Row) => {}
                    (SectionKind::Column, SectionKind::Column) => {
                        return Err(SectionGrammarViolation::ColumnOutsideRow {
                            column_id: child_section.id.clone(),
                        })
                    }
                    (SectionKind::Section, SectionKind::Section) => {
                        return Err(SectionGrammarViolation::SectionInsideSection {
                            section_id: child_section.id.clone(),
                        })
                    }
                    (SectionKind::Section, _) => {}
                }
                child_section.validate_children()?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionGrammarViolation {
    #[error("column '{column_id}' found outside of a row")]
    ColumnOutsideRow { column_id: String },
    #[error("row contains a non-column child")]
    RowContainsNonColumn { row_id: String },
    #[error("section '{section_id}' nested directly inside another section")]
    SectionInsideSection { section_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_row_of_columns_passes() {
        let col_a = Section::new("col_a", SectionKind::Column);
        let col_b = Section::new("col_b", SectionKind::Column);
        let row = Section::new("row", SectionKind::Row)
            .with_children(vec![Node::Container(col_a), Node::Container(col_b)]);
        assert!(row.validate().is_ok());
    }

    #[test]
    fn column_directly_inside_column_is_rejected() {
        let inner = Section::new("inner", SectionKind::Column);
        let outer = Section::new("outer", SectionKind::Column)
            .with_children(vec![Node::Container(inner)]);
        assert_eq!(
            outer.validate(),
            Err(SectionGrammarViolation::ColumnOutsideRow {
                column_id: "inner".into()
            })
        );
    }

    #[test]
    fn section_directly_inside_section_is_rejected() {
        let inner = Section::new("inner", SectionKind::Section);
        let outer = Section::new("outer", SectionKind::Section)
            .with_children(vec![Node::Container(inner)]);
        assert_eq!(
            outer.validate(),
            Err(SectionGrammarViolation::SectionInsideSection {
                section_id: "inner".into()
            })
        );
    }
}
