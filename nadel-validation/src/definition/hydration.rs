use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use apollo_compiler::Name;

use crate::directives::HYDRATION_ARGUMENT_PREFIX;
use crate::directives::HYDRATION_SOURCE_PREFIX;
use crate::directives::PREDICATE_EQUALS;
use crate::directives::PREDICATE_MATCHES;
use crate::directives::PREDICATE_STARTS_WITH;
use crate::schema::coordinates::display_path;

/// One `@hydrated` application.
#[derive(Clone, Debug, PartialEq)]
pub struct NadelHydrationDefinition {
    /// The `service:` argument. When absent the actor service is the one declaring the actor
    /// field's top-level `Query` field.
    pub service_name: Option<String>,
    /// `field: "a.b"` split on dots, starting from `Query`.
    pub actor_field_path: Vec<Name>,
    pub arguments: Vec<NadelHydrationArgumentDefinition>,
    pub identified_by: Option<String>,
    pub is_indexed: bool,
    pub batch_size: Option<u32>,
    pub timeout: Option<i32>,
    pub condition: Option<NadelHydrationCondition>,
}

impl NadelHydrationDefinition {
    /// The `$source` paths read by the arguments, in declaration order.
    pub fn source_paths(&self) -> impl Iterator<Item = &[Name]> {
        self.arguments
            .iter()
            .filter_map(|argument| match &argument.value {
                NadelHydrationArgumentValue::FieldResultValue { path } => Some(path.as_slice()),
                _ => None,
            })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NadelHydrationArgumentDefinition {
    /// Name of the actor field argument being bound.
    pub name: Name,
    pub value: NadelHydrationArgumentValue,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NadelHydrationArgumentValue {
    /// A literal passed as is.
    StaticValue(serde_json::Value),
    /// `$source.a.b`: a field of the object being hydrated.
    FieldResultValue { path: Vec<Name> },
    /// `$argument.a`: an argument of the hydrated field.
    ArgumentValue { name: Name },
}

impl Display for NadelHydrationArgumentDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

impl Display for NadelHydrationArgumentValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticValue(value) => write!(f, "{value}"),
            Self::FieldResultValue { path } => {
                write!(f, "{HYDRATION_SOURCE_PREFIX}{}", display_path(path))
            }
            Self::ArgumentValue { name } => write!(f, "{HYDRATION_ARGUMENT_PREFIX}{name}"),
        }
    }
}

/// `when: { result: { sourceField, predicate } }`
#[derive(Clone, Debug, PartialEq)]
pub struct NadelHydrationCondition {
    pub source_field: Vec<Name>,
    pub predicate: NadelHydrationConditionPredicate,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NadelHydrationConditionPredicate {
    Equals(serde_json::Value),
    StartsWith(String),
    Matches(String),
}

impl NadelHydrationConditionPredicate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equals(_) => PREDICATE_EQUALS,
            Self::StartsWith(_) => PREDICATE_STARTS_WITH,
            Self::Matches(_) => PREDICATE_MATCHES,
        }
    }
}
