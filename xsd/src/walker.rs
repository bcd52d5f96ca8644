use std::fmt;

use tracing::debug;

use super::{
    ddl::CreateTable,
    error::XsdError,
    naming::IdentifierPolicy,
    schema::Schema,
    schema_node::{NodeKind, SchemaNode},
    type_registry::{Resolution, TypeRegistry},
    xstypes::{local_name, strip_prefix},
};

/// How deep the walk may nest before giving up.
pub const MAX_RECURSE_LEVEL: usize = 100;

/// The largest `max_depth` honoured. Each level is a native stack frame, so larger values are
/// clamped to this.
pub const MAX_DEPTH_LIMIT: usize = 500;

/// The type assumed for elements with neither a `type` nor a `ref` attribute
const DEFAULT_TYPE: &str = "string";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkOptions {
    /// Normalize table and column names, see
    /// [`normalize_identifier()`](crate::normalize_identifier).
    pub normalize: bool,
    /// Fail with [`XsdError::InvalidType`] instead of dropping fields whose type can't be mapped.
    pub fail_on_bad_type: bool,
    /// Fail with [`XsdError::RecursionLimitExceeded`] once a node deeper than this is reached.
    /// The `<schema>` root is depth 0. Values above [`MAX_DEPTH_LIMIT`] count as that limit.
    pub max_depth: usize,
    /// Fail with [`XsdError::RecursiveType`] as soon as a named complex type is expanded inside
    /// itself, instead of running into `max_depth`.
    pub detect_cycles: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            fail_on_bad_type: false,
            max_depth: MAX_RECURSE_LEVEL,
            detect_cycles: false,
        }
    }
}

impl WalkOptions {
    /// `max_depth`, capped at [`MAX_DEPTH_LIMIT`]
    pub fn depth_limit(&self) -> usize {
        self.max_depth.min(MAX_DEPTH_LIMIT)
    }
}

/// Output of walking a single node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkResult {
    /// Whether the node had at least one `<element>`, `<complexType>` or `<sequence>` child,
    /// whether or not any of them produced a table.
    pub has_structural_children: bool,
    /// `CREATE TABLE` statements of the node and its descendants, in document order
    pub statements: Vec<String>,
}

impl WalkResult {
    pub fn ddl(&self) -> String {
        self.statements.join("\n")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The type is a built-in (or user type) without a column equivalent, e.g. `xs:ID`.
    UnsupportedType,
    /// The type is neither a known simple type nor a top-level complex type.
    UnresolvedType,
    /// The element has neither a `name` nor a `ref`, so there's nothing to name the column.
    Unnamed,
}

/// A leaf element that did not become a column
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedField {
    pub table: String,
    pub element: String,
    pub type_name: String,
    pub reason: DropReason,
}

impl fmt::Display for DroppedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            DropReason::UnsupportedType => "unsupported type",
            DropReason::UnresolvedType => "unresolved type",
            DropReason::Unnamed => "no name",
        };
        write!(
            f,
            "{}.{} ({}): {reason}",
            self.table, self.element, self.type_name
        )
    }
}

/// The result of converting a whole document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversion {
    pub statements: Vec<String>,
    pub dropped: Vec<DroppedField>,
}

impl Conversion {
    pub fn ddl(&self) -> String {
        self.statements.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Recursive descent over `<element>`, `<complexType>` and `<sequence>` nodes.
///
/// Every node with leaf `<element>` children becomes one table named after the nearest named
/// ancestor; the leaves become its columns. Nested tables are emitted separately and are not
/// linked to their parent.
pub struct Walker<'s, 'a, 'input> {
    schema: Schema<'a, 'input>,
    registry: &'s TypeRegistry,
    options: &'s WalkOptions,
    naming: IdentifierPolicy,

    dropped: Vec<DroppedField>,
    /// Named complex types currently being expanded, only tracked with `detect_cycles`
    expanding: Vec<&'a str>,
}

impl<'s, 'a, 'input: 'a> Walker<'s, 'a, 'input> {
    pub fn new(
        schema: Schema<'a, 'input>,
        registry: &'s TypeRegistry,
        options: &'s WalkOptions,
    ) -> Self {
        Self {
            schema,
            registry,
            options,
            naming: IdentifierPolicy::from_normalize_flag(options.normalize),
            dropped: Vec::new(),
            expanding: Vec::new(),
        }
    }

    /// Walks the whole schema, starting at `<schema>` with depth 0. Top-level leaf elements end
    /// up in `root_table`.
    pub fn convert(mut self, root_table: &str) -> Result<Conversion, XsdError> {
        let result = self.walk(self.schema.root(), root_table, 0)?;
        Ok(Conversion {
            statements: result.statements,
            dropped: self.dropped,
        })
    }

    pub fn walk(
        &mut self,
        node: SchemaNode<'a, 'input>,
        parent_name: &str,
        depth: usize,
    ) -> Result<WalkResult, XsdError> {
        let limit = self.options.depth_limit();
        if depth > limit {
            return Err(XsdError::RecursionLimitExceeded { depth, limit });
        }

        let entered = self.enter_named_type(node)?;
        let result = self.walk_children(node, parent_name, depth);
        if entered {
            self.expanding.pop();
        }
        result
    }

    fn enter_named_type(&mut self, node: SchemaNode<'a, 'input>) -> Result<bool, XsdError> {
        if !self.options.detect_cycles || !node.is(NodeKind::ComplexType) {
            return Ok(false);
        }
        let Some(name) = node.name() else {
            return Ok(false);
        };
        if self.expanding.contains(&name) {
            return Err(XsdError::RecursiveType {
                type_name: name.into(),
            });
        }
        self.expanding.push(name);
        Ok(true)
    }

    fn walk_children(
        &mut self,
        node: SchemaNode<'a, 'input>,
        parent_name: &str,
        depth: usize,
    ) -> Result<WalkResult, XsdError> {
        let mut result = WalkResult::default();
        let mut table = CreateTable::new(self.naming.apply(parent_name));

        for element in node.children(NodeKind::Element) {
            result.has_structural_children = true;

            let child = self.walk(element, element.name().unwrap_or(parent_name), depth + 1)?;
            result.statements.extend(child.statements);
            if !child.has_structural_children {
                self.visit_leaf(element, &mut table, &mut result.statements, depth)?;
            }
        }

        if !table.is_empty() {
            debug!(table = table.name.as_str(), columns = table.columns.len(), "table");
            result.statements.push(table.to_string());
        }

        for kind in [NodeKind::ComplexType, NodeKind::Sequence] {
            for group in node.children(kind) {
                result.has_structural_children = true;

                let child = self.walk(group, group.name().unwrap_or(parent_name), depth + 1)?;
                result.statements.extend(child.statements);
            }
        }

        Ok(result)
    }

    /// Turns a leaf element into a column of `table`, expands the complex type it refers to, or
    /// drops it.
    fn visit_leaf(
        &mut self,
        element: SchemaNode<'a, 'input>,
        table: &mut CreateTable,
        statements: &mut Vec<String>,
        depth: usize,
    ) -> Result<(), XsdError> {
        let type_name = element
            .type_name()
            .or_else(|| element.reference())
            .unwrap_or(DEFAULT_TYPE);

        match self.registry.resolve(type_name)? {
            Resolution::Column(column_type) => {
                let Some(column_name) = self.column_name(element) else {
                    return self.drop_field(table, element, type_name, DropReason::Unnamed);
                };
                table.push(column_name, column_type);
            }
            Resolution::Unsupported => {
                self.drop_field(table, element, type_name, DropReason::UnsupportedType)?;
            }
            Resolution::NotFound => {
                let name = local_name(strip_prefix(type_name, self.registry.schema_prefix()));
                match self.schema.find_complex_type(name) {
                    Some(complex_type) => {
                        debug!(%element, type_name, "expanding named complex type");
                        let expanded = self.walk(complex_type, name, depth + 1)?;
                        statements.extend(expanded.statements);
                    }
                    None => {
                        self.drop_field(table, element, type_name, DropReason::UnresolvedType)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn column_name(&self, element: SchemaNode) -> Option<String> {
        let name = element
            .name()
            .or_else(|| element.reference().map(local_name))?;
        Some(self.naming.apply(name).into_owned())
    }

    fn drop_field(
        &mut self,
        table: &CreateTable,
        element: SchemaNode,
        type_name: &str,
        reason: DropReason,
    ) -> Result<(), XsdError> {
        let element_name = element
            .name()
            .or_else(|| element.reference())
            .unwrap_or_default();

        if self.options.fail_on_bad_type && reason != DropReason::Unnamed {
            return Err(XsdError::InvalidType {
                type_name: type_name.into(),
                element: element_name.into(),
            });
        }

        debug!(table = table.name.as_str(), %element, type_name, ?reason, "dropping field");
        self.dropped.push(DroppedField {
            table: table.name.clone(),
            element: element_name.into(),
            type_name: type_name.into(),
            reason,
        });
        Ok(())
    }
}
