//! Infers a relational schema from an XML Schema Definition.
//!
//! Every structural node (`<element>` with children, `<complexType>`, `<sequence>`) that has leaf
//! `<element>` children becomes one `CREATE TABLE` statement; the leaves become its columns, typed
//! through the [`TypeRegistry`]. References to named complex types are expanded in place.

pub mod builtins;
pub mod ddl;
pub mod error;
pub mod naming;
pub mod schema;
pub mod schema_node;
pub mod type_registry;
pub mod walker;
pub mod xstypes;

pub use ddl::{Column, CreateTable};
pub use error::XsdError;
pub use naming::{normalize_identifier, table_name_for_path, IdentifierPolicy};
pub use schema::Schema;
pub use schema_node::{NodeKind, SchemaNode};
pub use type_registry::{Resolution, TypeRegistry};
pub use walker::{
    Conversion, DropReason, DroppedField, WalkOptions, WalkResult, Walker, MAX_DEPTH_LIMIT,
    MAX_RECURSE_LEVEL,
};
pub use xstypes::{DEFAULT_SCHEMA_PREFIX, XS_NAMESPACE};

/// Converts one parsed XSD document.
///
/// The document's named types are added to `registry` first. They stay there afterwards, so
/// converting several documents with the same registry lets later ones use the types of earlier
/// ones; call [`TypeRegistry::clear_user_types()`] in between to keep them apart.
pub fn convert_document(
    document: &roxmltree::Document,
    registry: &mut TypeRegistry,
    root_table: &str,
    options: &WalkOptions,
) -> Result<Conversion, XsdError> {
    let schema = Schema::from_document(document)?;
    registry.register_user_types(&schema)?;
    tracing::debug!(
        user_types = registry.user_type_count(),
        root_table,
        "walking schema"
    );
    Walker::new(schema, registry, options).convert(root_table)
}
