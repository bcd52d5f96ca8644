use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum XsdError {
    #[error("the document root is <{0}>, expected an XML Schema <schema> element")]
    NotASchema(String),

    /// The walk went deeper than the configured ceiling. This usually means a named complex type
    /// (directly or indirectly) contains itself.
    #[error("recursion limit exceeded: depth {depth} is deeper than the limit of {limit}")]
    RecursionLimitExceeded { depth: usize, limit: usize },

    #[error("invalid type {type_name:?} on element {element:?}")]
    InvalidType { type_name: String, element: String },

    #[error("complex type {type_name:?} is expanded inside itself")]
    RecursiveType { type_name: String },

    #[error("built-in type {name:?} is part of an alias cycle")]
    AliasCycle { name: String },

    #[error("built-in type {name:?} aliases the unknown type {target:?}")]
    DanglingAlias { name: String, target: String },
}
