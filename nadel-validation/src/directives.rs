//! The directive vocabulary understood by Nadel.

use apollo_compiler::Name;
use apollo_compiler::name;

pub(crate) const RENAMED_DIRECTIVE_NAME: Name = name!("renamed");
pub(crate) const RENAMED_FROM_ARGUMENT_NAME: Name = name!("from");

pub(crate) const HYDRATED_DIRECTIVE_NAME: Name = name!("hydrated");
pub(crate) const HYDRATED_SERVICE_ARGUMENT_NAME: Name = name!("service");
pub(crate) const HYDRATED_FIELD_ARGUMENT_NAME: Name = name!("field");
pub(crate) const HYDRATED_ARGUMENTS_ARGUMENT_NAME: Name = name!("arguments");
pub(crate) const HYDRATED_IDENTIFIED_BY_ARGUMENT_NAME: Name = name!("identifiedBy");
pub(crate) const HYDRATED_INDEXED_ARGUMENT_NAME: Name = name!("indexed");
pub(crate) const HYDRATED_BATCH_SIZE_ARGUMENT_NAME: Name = name!("batchSize");
pub(crate) const HYDRATED_TIMEOUT_ARGUMENT_NAME: Name = name!("timeout");
pub(crate) const HYDRATED_WHEN_ARGUMENT_NAME: Name = name!("when");

pub(crate) const HYDRATION_ARGUMENT_NAME_FIELD: &str = "name";
pub(crate) const HYDRATION_ARGUMENT_VALUE_FIELD: &str = "value";
pub(crate) const HYDRATION_SOURCE_PREFIX: &str = "$source.";
pub(crate) const HYDRATION_ARGUMENT_PREFIX: &str = "$argument.";

pub(crate) const CONDITION_RESULT_FIELD: &str = "result";
pub(crate) const CONDITION_SOURCE_FIELD_FIELD: &str = "sourceField";
pub(crate) const CONDITION_PREDICATE_FIELD: &str = "predicate";
pub(crate) const PREDICATE_EQUALS: &str = "equals";
pub(crate) const PREDICATE_STARTS_WITH: &str = "startsWith";
pub(crate) const PREDICATE_MATCHES: &str = "matches";

pub(crate) const STUBBED_DIRECTIVE_NAME: Name = name!("stubbed");

pub(crate) const PARTITION_DIRECTIVE_NAME: Name = name!("partition");
pub(crate) const PARTITION_PATH_ARGUMENT_NAME: Name = name!("pathToPartitionArg");

pub(crate) const HIDDEN_DIRECTIVE_NAME: Name = name!("hidden");
pub(crate) const NAMESPACED_DIRECTIVE_NAME: Name = name!("namespaced");
pub(crate) const VIRTUAL_TYPE_DIRECTIVE_NAME: Name = name!("virtualType");

/// SDL for every directive (and its supporting input types) that may appear in an overall schema.
///
/// [`crate::NadelSchemas::builder`] adds these definitions to the overall schema before the
/// service definitions.
pub const NADEL_DIRECTIVE_DEFINITIONS: &str = r#"
directive @renamed(from: String!) on FIELD_DEFINITION | OBJECT | INTERFACE | UNION | INPUT_OBJECT | SCALAR | ENUM

directive @hydrated(
  service: String
  field: String!
  arguments: [NadelHydrationArgument!]
  identifiedBy: String
  indexed: Boolean = false
  batchSize: Int
  timeout: Int
  when: NadelHydrationCondition
) repeatable on FIELD_DEFINITION

directive @stubbed on FIELD_DEFINITION

directive @partition(pathToPartitionArg: [String!]!) on FIELD_DEFINITION

directive @hidden on FIELD_DEFINITION

directive @namespaced on FIELD_DEFINITION

directive @virtualType on OBJECT

scalar NadelJSON

input NadelHydrationArgument {
  name: String!
  value: NadelJSON!
}

input NadelHydrationCondition {
  result: NadelHydrationResultCondition!
}

input NadelHydrationResultCondition {
  sourceField: String!
  predicate: NadelHydrationResultFieldPredicate!
}

input NadelHydrationResultFieldPredicate {
  startsWith: String
  equals: NadelJSON
  matches: String
}
"#;
