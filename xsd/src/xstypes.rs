// The XML Schema namespace (XSD 1.1 pt. 1, §1.3.1)
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// The prefix removed from `type` and `ref` values before looking them up as built-in or user
/// types. Documents using another prefix for the XSD namespace can override it through
/// [`TypeRegistry::new()`](crate::TypeRegistry::new).
pub const DEFAULT_SCHEMA_PREFIX: &str = "xs:";

/// Removes `prefix` from the start of `value`, if present.
pub fn strip_prefix<'a>(value: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        value
    } else {
        value.strip_prefix(prefix).unwrap_or(value)
    }
}

/// The local part of a possibly prefixed name, i.e. everything after the last `:`.
pub fn local_name(value: &str) -> &str {
    value
        .rsplit_once(':')
        .map(|(_prefix, local)| local)
        .unwrap_or(value)
}
