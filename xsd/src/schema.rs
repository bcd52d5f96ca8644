use roxmltree::Document;

use super::{
    error::XsdError,
    schema_node::{NodeKind, SchemaNode},
};

/// The `<schema>` element of a parsed XSD document
#[derive(Copy, Clone, Debug)]
pub struct Schema<'a, 'input> {
    root: SchemaNode<'a, 'input>,
}

impl<'a, 'input: 'a> Schema<'a, 'input> {
    pub fn from_document(document: &'a Document<'input>) -> Result<Self, XsdError> {
        let root = SchemaNode::new(document.root_element());
        if !root.is(NodeKind::Schema) {
            let tag_name = root.xml().tag_name();
            let name = match tag_name.namespace() {
                Some(namespace) => format!("{{{namespace}}}{}", tag_name.name()),
                None => tag_name.name().to_string(),
            };
            return Err(XsdError::NotASchema(name));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> SchemaNode<'a, 'input> {
        self.root
    }

    /// Top-level declarations of the given kind, in document order
    pub fn top_level(&self, kind: NodeKind) -> impl Iterator<Item = SchemaNode<'a, 'input>> + 'a {
        self.root.children(kind)
    }

    /// Looks up a top-level `<complexType>` by its (unprefixed) `name`.
    pub fn find_complex_type(&self, name: &str) -> Option<SchemaNode<'a, 'input>> {
        self.top_level(NodeKind::ComplexType)
            .find(|complex_type| complex_type.name() == Some(name))
    }
}
