use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use apollo_compiler::Name;

/// A [schema coordinate](https://github.com/graphql/graphql-wg/blob/main/rfcs/SchemaCoordinates.md)
/// for a type or a field of a type in the overall schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NadelSchemaCoordinate {
    pub type_name: Name,
    pub field_name: Option<Name>,
}

impl NadelSchemaCoordinate {
    pub fn for_type(type_name: Name) -> Self {
        Self {
            type_name,
            field_name: None,
        }
    }

    pub fn for_field(type_name: Name, field_name: Name) -> Self {
        Self {
            type_name,
            field_name: Some(field_name),
        }
    }
}

impl Display for NadelSchemaCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.field_name {
            Some(field_name) => write!(f, "{}.{field_name}", self.type_name),
            None => write!(f, "{}", self.type_name),
        }
    }
}

/// Renders a dotted path such as `$source.owner.id` without the prefix.
pub(crate) fn display_path(path: &[Name]) -> String {
    path.iter().map(Name::as_str).collect::<Vec<_>>().join(".")
}
