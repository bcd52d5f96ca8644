use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use super::{error::XsdError, type_registry::Resolution};

/// One entry of the built-in type table
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BuiltinType {
    /// Maps directly to a PostgreSQL column type.
    Column(&'static str),
    /// Maps to whatever the named built-in type maps to.
    Alias(&'static str),
    /// A primitive with no relational equivalent. Fields of this type are dropped.
    Unsupported,
}

pub type BuiltinTable = HashMap<&'static str, BuiltinType>;

lazy_static! {
    /// XSD built-in datatypes (pt. 2, §3) and the column types they translate to
    pub static ref BUILTIN_TYPES: BuiltinTable = {
        use BuiltinType::*;

        HashMap::from([
            // Primitive datatypes (pt. 2, §3.3)
            ("string", Column("varchar")),
            ("boolean", Column("boolean")),
            ("decimal", Column("numeric")),
            ("float", Column("real")),
            ("double", Column("double precision")),
            ("duration", Column("interval")),
            ("dateTime", Column("timestamp")),
            ("time", Column("time")),
            ("date", Column("date")),
            ("gYearMonth", Column("timestamp")),
            ("gYear", Column("timestamp")),
            ("gMonthDay", Column("timestamp")),
            ("gDay", Column("timestamp")),
            ("gMonth", Column("timestamp")),
            ("hexBinary", Column("bytea")),
            ("base64Binary", Column("bytea")),
            ("anyURI", Column("varchar")),
            ("QName", Unsupported),
            ("NOTATION", Unsupported),

            // Other built-in datatypes (pt. 2, §3.4)
            ("normalizedString", Alias("string")),
            ("token", Alias("string")),
            ("language", Alias("string")),
            ("NMTOKEN", Unsupported),
            ("NMTOKENS", Unsupported),
            ("Name", Alias("string")),
            ("NCName", Alias("string")),
            ("ID", Unsupported),
            ("IDREF", Unsupported),
            ("IDREFS", Unsupported),
            ("ENTITY", Unsupported),
            ("ENTITIES", Unsupported),
            ("integer", Column("integer")),
            ("nonPositiveInteger", Alias("integer")),
            ("negativeInteger", Alias("integer")),
            ("long", Alias("integer")),
            ("int", Alias("integer")),
            ("short", Alias("integer")),
            ("byte", Alias("integer")),
            ("nonNegativeInteger", Alias("integer")),
            ("unsignedLong", Alias("integer")),
            ("unsignedInt", Alias("integer")),
            ("unsignedShort", Alias("integer")),
            ("unsignedByte", Alias("integer")),
            ("positiveInteger", Alias("integer")),
        ])
    };
}

/// Resolves `name` in the fixed built-in table.
pub fn resolve_builtin(name: &str) -> Result<Resolution, XsdError> {
    dereference(&BUILTIN_TYPES, name)
}

/// Follows [`BuiltinType::Alias`] edges starting at `name` until a column type or
/// [`BuiltinType::Unsupported`] is reached. Names missing from `table` resolve to
/// [`Resolution::NotFound`].
pub fn dereference(table: &BuiltinTable, name: &str) -> Result<Resolution, XsdError> {
    let mut visited = HashSet::new();
    let mut current = name;
    loop {
        let Some(entry) = table.get(current) else {
            if current == name {
                return Ok(Resolution::NotFound);
            }
            return Err(XsdError::DanglingAlias {
                name: name.into(),
                target: current.into(),
            });
        };
        match *entry {
            BuiltinType::Column(column_type) => return Ok(Resolution::Column(column_type)),
            BuiltinType::Unsupported => return Ok(Resolution::Unsupported),
            BuiltinType::Alias(target) => {
                if !visited.insert(current) {
                    return Err(XsdError::AliasCycle { name: name.into() });
                }
                current = target;
            }
        }
    }
}
