use std::borrow::Cow;
use std::path::Path;

/// How element and type names become SQL identifiers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// See [`normalize_identifier()`]
    #[default]
    Normalize,
    /// Keep names exactly as written in the schema.
    AsIs,
}

impl IdentifierPolicy {
    pub fn from_normalize_flag(normalize: bool) -> Self {
        if normalize {
            Self::Normalize
        } else {
            Self::AsIs
        }
    }

    pub fn apply<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            Self::Normalize => Cow::Owned(normalize_identifier(name)),
            Self::AsIs => Cow::Borrowed(name),
        }
    }
}

/// Replaces `-`, `.` and spaces with underscores and lowercases the result.
pub fn normalize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '-' | '.' | ' ' => '_',
            c => c,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// The root table name for a schema file: its file name up to the first `.`.
pub fn table_name_for_path(path: impl AsRef<Path>, policy: IdentifierPolicy) -> String {
    let file_name = path
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let base = file_name.split('.').next().unwrap_or_default();
    policy.apply(base).into_owned()
}
