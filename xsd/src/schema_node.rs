use std::fmt;

use roxmltree::Node;

use super::xstypes::XS_NAMESPACE;

/// The XSD element information items the converter looks at. Everything else (annotations,
/// attributes, choices, ...) is invisible to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Schema,
    Element,
    ComplexType,
    Sequence,
    SimpleType,
    Restriction,
}

impl NodeKind {
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Element => "element",
            Self::ComplexType => "complexType",
            Self::Sequence => "sequence",
            Self::SimpleType => "simpleType",
            Self::Restriction => "restriction",
        }
    }

    pub fn from_tag_name(tag_name: &str) -> Option<Self> {
        match tag_name {
            "schema" => Some(Self::Schema),
            "element" => Some(Self::Element),
            "complexType" => Some(Self::ComplexType),
            "sequence" => Some(Self::Sequence),
            "simpleType" => Some(Self::SimpleType),
            "restriction" => Some(Self::Restriction),
            _ => None,
        }
    }
}

/// A read-only view over one element of the parsed XSD document.
#[derive(Copy, Clone, Debug)]
pub struct SchemaNode<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input: 'a> SchemaNode<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        Self { node }
    }

    pub fn xml(&self) -> Node<'a, 'input> {
        self.node
    }

    /// The kind of this node, or `None` for elements outside the XSD namespace and XSD elements
    /// the converter does not know.
    pub fn kind(&self) -> Option<NodeKind> {
        if !self.node.is_element() || self.node.tag_name().namespace() != Some(XS_NAMESPACE) {
            return None;
        }
        NodeKind::from_tag_name(self.node.tag_name().name())
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind() == Some(kind)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node.attribute("name")
    }

    /// The `type` attribute
    pub fn type_name(&self) -> Option<&'a str> {
        self.node.attribute("type")
    }

    /// The `ref` attribute
    pub fn reference(&self) -> Option<&'a str> {
        self.node.attribute("ref")
    }

    /// The `base` attribute of a `<restriction>`
    pub fn base(&self) -> Option<&'a str> {
        self.node.attribute("base")
    }

    /// Direct children of the given kind, in document order. This is not a descendant search:
    /// `<element>`s nested in a `<choice>` are not children of the enclosing `<complexType>`.
    pub fn children(&self, kind: NodeKind) -> impl Iterator<Item = SchemaNode<'a, 'input>> + 'a {
        self.node
            .children()
            .map(SchemaNode::new)
            .filter(move |child| child.is(kind))
    }

    pub fn child(&self, kind: NodeKind) -> Option<SchemaNode<'a, 'input>> {
        self.children(kind).next()
    }
}

impl fmt::Display for SchemaNode<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.node.tag_name().name();
        match (self.name(), self.reference()) {
            (Some(name), _) => write!(f, "<{tag} name={name:?}>"),
            (None, Some(reference)) => write!(f, "<{tag} ref={reference:?}>"),
            (None, None) => write!(f, "<{tag}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:other="urn:other">
            <xs:annotation/>
            <xs:element name="a" type="xs:string"/>
            <other:element name="foreign"/>
            <xs:complexType name="T">
                <xs:choice>
                    <xs:element name="hidden"/>
                </xs:choice>
                <xs:sequence>
                    <xs:element ref="a"/>
                </xs:sequence>
            </xs:complexType>
        </xs:schema>
    "#;

    #[test]
    fn children_are_direct_and_in_xsd_namespace() {
        let document = roxmltree::Document::parse(SOURCE).unwrap();
        let root = SchemaNode::new(document.root_element());
        assert_eq!(root.kind(), Some(NodeKind::Schema));

        let elements: Vec<_> = root.children(NodeKind::Element).collect();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name(), Some("a"));
        assert_eq!(elements[0].type_name(), Some("xs:string"));

        let complex_type = root.child(NodeKind::ComplexType).unwrap();
        assert_eq!(complex_type.children(NodeKind::Element).count(), 0);
        let sequence = complex_type.child(NodeKind::Sequence).unwrap();
        let reference = sequence.child(NodeKind::Element).unwrap();
        assert_eq!(reference.reference(), Some("a"));
        assert_eq!(reference.name(), None);
    }

    #[test]
    fn display_names_the_node() {
        let document = roxmltree::Document::parse(SOURCE).unwrap();
        let root = SchemaNode::new(document.root_element());
        let element = root.child(NodeKind::Element).unwrap();
        assert_eq!(element.to_string(), r#"<element name="a">"#);
        assert_eq!(root.to_string(), "<schema>");
    }
}
