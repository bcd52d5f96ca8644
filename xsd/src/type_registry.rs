use std::collections::HashMap;

use tracing::debug;

use super::{
    builtins::resolve_builtin,
    error::XsdError,
    naming::normalize_identifier,
    schema::Schema,
    schema_node::NodeKind,
    xstypes::{strip_prefix, DEFAULT_SCHEMA_PREFIX},
};

/// The outcome of looking up a type name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The type maps to this column type.
    Column(&'static str),
    /// The type is known but has no relational equivalent.
    Unsupported,
    /// The type is neither a built-in nor a registered user type. It may still name a complex
    /// type, which the walker has to expand structurally.
    NotFound,
}

/// Built-in types plus the named types declared by the documents converted so far.
///
/// User types are registered under their normalized name but looked up by the name exactly as
/// written in `type` or `ref`, so `<simpleType name="OrderStatus">` is found as `orderstatus`
/// only. Built-in names always take precedence.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    schema_prefix: String,
    user_types: HashMap<String, Option<&'static str>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_PREFIX)
    }
}

impl TypeRegistry {
    pub fn new(schema_prefix: impl Into<String>) -> Self {
        Self {
            schema_prefix: schema_prefix.into(),
            user_types: HashMap::new(),
        }
    }

    pub fn schema_prefix(&self) -> &str {
        &self.schema_prefix
    }

    /// Resolves against the built-in table only, ignoring any registered user types.
    pub fn resolve_builtin(&self, type_name: &str) -> Result<Resolution, XsdError> {
        resolve_builtin(strip_prefix(type_name, &self.schema_prefix))
    }

    /// Resolves a `type` or `ref` value, trying built-in types first and user types second.
    pub fn resolve(&self, type_name: &str) -> Result<Resolution, XsdError> {
        let name = strip_prefix(type_name, &self.schema_prefix);
        match resolve_builtin(name)? {
            Resolution::NotFound => {}
            resolution => return Ok(resolution),
        }
        Ok(match self.user_types.get(name).copied() {
            Some(Some(column_type)) => Resolution::Column(column_type),
            Some(None) => Resolution::Unsupported,
            None => Resolution::NotFound,
        })
    }

    /// Registers the top-level `<simpleType>` restrictions and typed `<element>` declarations of
    /// `schema`. Simple types are registered first, so elements (and later simple types) may
    /// refer to them. Declarations whose type can't be resolved are left to the walker.
    pub fn register_user_types(&mut self, schema: &Schema) -> Result<(), XsdError> {
        for simple_type in schema.top_level(NodeKind::SimpleType) {
            let (Some(name), Some(base)) = (
                simple_type.name(),
                simple_type
                    .child(NodeKind::Restriction)
                    .and_then(|restriction| restriction.base()),
            ) else {
                continue;
            };
            self.register(name, base, "simpleType")?;
        }

        for element in schema.top_level(NodeKind::Element) {
            let (Some(name), Some(type_name)) = (element.name(), element.type_name()) else {
                continue;
            };
            self.register(name, type_name, "element")?;
        }

        Ok(())
    }

    fn register(&mut self, name: &str, type_name: &str, tag: &str) -> Result<(), XsdError> {
        let column_type = match self.resolve(type_name)? {
            Resolution::Column(column_type) => Some(column_type),
            Resolution::Unsupported => None,
            Resolution::NotFound => {
                debug!(
                    tag,
                    user_type = name,
                    type_name,
                    "not registering user type with unknown base"
                );
                return Ok(());
            }
        };
        let key = normalize_identifier(name);
        debug!(tag, user_type = key.as_str(), ?column_type, "registered user type");
        self.user_types.insert(key, column_type);
        Ok(())
    }

    pub fn user_type_count(&self) -> usize {
        self.user_types.len()
    }

    /// Forgets all user types, e.g. before converting an unrelated document.
    pub fn clear_user_types(&mut self) {
        self.user_types.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_for(source: &str) -> TypeRegistry {
        let document = roxmltree::Document::parse(source).unwrap();
        let schema = Schema::from_document(&document).unwrap();
        let mut registry = TypeRegistry::default();
        registry.register_user_types(&schema).unwrap();
        registry
    }

    #[test]
    fn strips_schema_prefix() {
        let registry = TypeRegistry::default();
        assert_eq!(
            registry.resolve("xs:int").unwrap(),
            Resolution::Column("integer")
        );
        assert_eq!(
            registry.resolve("xs:ID").unwrap(),
            Resolution::Unsupported
        );
        assert_eq!(registry.resolve("xs:Foo").unwrap(), Resolution::NotFound);
    }

    #[test]
    fn custom_schema_prefix() {
        let registry = TypeRegistry::new("xsd:");
        assert_eq!(
            registry.resolve("xsd:date").unwrap(),
            Resolution::Column("date")
        );
        assert_eq!(registry.resolve("xs:date").unwrap(), Resolution::NotFound);
    }

    #[test]
    fn registers_simple_types_and_elements() {
        let registry = registry_for(
            r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="created_at" type="xs:dateTime"/>
                <xs:element name="reference" type="xs:IDREF"/>
                <xs:element name="status" type="order_status"/>
                <xs:element name="customer" type="CustomerType"/>
                <xs:element name="untyped"/>
                <xs:simpleType name="order_status">
                    <xs:restriction base="xs:token">
                        <xs:enumeration value="open"/>
                    </xs:restriction>
                </xs:simpleType>
                <xs:simpleType name="short_status">
                    <xs:restriction base="order_status"/>
                </xs:simpleType>
                <xs:simpleType name="listy">
                    <xs:list itemType="xs:int"/>
                </xs:simpleType>
            </xs:schema>
            "#,
        );

        assert_eq!(
            registry.resolve("created_at").unwrap(),
            Resolution::Column("timestamp")
        );
        assert_eq!(
            registry.resolve("reference").unwrap(),
            Resolution::Unsupported
        );
        assert_eq!(
            registry.resolve("order_status").unwrap(),
            Resolution::Column("varchar")
        );
        assert_eq!(
            registry.resolve("short_status").unwrap(),
            Resolution::Column("varchar")
        );
        // Elements may use simple types declared after them
        assert_eq!(
            registry.resolve("status").unwrap(),
            Resolution::Column("varchar")
        );
        assert_eq!(registry.resolve("customer").unwrap(), Resolution::NotFound);
        assert_eq!(registry.resolve("untyped").unwrap(), Resolution::NotFound);
        assert_eq!(registry.resolve("listy").unwrap(), Resolution::NotFound);
        assert_eq!(registry.user_type_count(), 5);
    }

    #[test]
    fn lookups_are_not_normalized() {
        let registry = registry_for(
            r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:simpleType name="phone_number">
                    <xs:restriction base="xs:string"/>
                </xs:simpleType>
                <xs:simpleType name="OrderStatus">
                    <xs:restriction base="xs:token"/>
                </xs:simpleType>
                <xs:simpleType name="ShortStatus">
                    <xs:restriction base="OrderStatus"/>
                </xs:simpleType>
            </xs:schema>
            "#,
        );
        assert_eq!(
            registry.resolve("phone_number").unwrap(),
            Resolution::Column("varchar")
        );
        assert_eq!(
            registry.resolve("Phone-Number").unwrap(),
            Resolution::NotFound
        );
        // Stored as `orderstatus`
        assert_eq!(
            registry.resolve("orderstatus").unwrap(),
            Resolution::Column("varchar")
        );
        assert_eq!(
            registry.resolve("OrderStatus").unwrap(),
            Resolution::NotFound
        );
        // so a base written in mixed case doesn't resolve either
        assert_eq!(
            registry.resolve("shortstatus").unwrap(),
            Resolution::NotFound
        );
        assert_eq!(registry.user_type_count(), 2);
    }

    #[test]
    fn resolve_builtin_ignores_user_types() {
        let registry = registry_for(
            r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="amount" type="xs:decimal"/>
            </xs:schema>
            "#,
        );
        assert_eq!(
            registry.resolve_builtin("xs:int").unwrap(),
            Resolution::Column("integer")
        );
        assert_eq!(
            registry.resolve_builtin("xs:NMTOKENS").unwrap(),
            Resolution::Unsupported
        );
        assert_eq!(
            registry.resolve_builtin("amount").unwrap(),
            Resolution::NotFound
        );
        assert_eq!(
            registry.resolve("amount").unwrap(),
            Resolution::Column("numeric")
        );
    }

    #[test]
    fn builtins_shadow_user_types() {
        let registry = registry_for(
            r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:simpleType name="date">
                    <xs:restriction base="xs:string"/>
                </xs:simpleType>
            </xs:schema>
            "#,
        );
        assert_eq!(registry.resolve("date").unwrap(), Resolution::Column("date"));
    }

    #[test]
    fn clearing_forgets_user_types() {
        let mut registry = registry_for(
            r#"
            <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="amount" type="xs:decimal"/>
            </xs:schema>
            "#,
        );
        assert_eq!(
            registry.resolve("amount").unwrap(),
            Resolution::Column("numeric")
        );
        registry.clear_user_types();
        assert_eq!(registry.resolve("amount").unwrap(), Resolution::NotFound);
    }
}
