//! Directive-driven intents, read once from the overall schema.

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast::Directive;
use multimap::MultiMap;
use tracing::debug;

use crate::directives::HYDRATED_DIRECTIVE_NAME;
use crate::directives::PARTITION_DIRECTIVE_NAME;
use crate::directives::RENAMED_DIRECTIVE_NAME;
use crate::directives::STUBBED_DIRECTIVE_NAME;
use crate::directives::VIRTUAL_TYPE_DIRECTIVE_NAME;
use crate::error::NadelSchemaValidationError;
use crate::schema::NadelFieldsContainer;
use crate::schema::NadelSchemaCoordinate;

mod hydration;
mod parser;

pub use hydration::NadelHydrationArgumentDefinition;
pub use hydration::NadelHydrationArgumentValue;
pub use hydration::NadelHydrationCondition;
pub use hydration::NadelHydrationConditionPredicate;
pub use hydration::NadelHydrationDefinition;

/// What a directive asks the execution engine to do for a type or field.
#[derive(Clone, Debug, PartialEq)]
pub enum NadelInstructionDefinition {
    /// `@renamed` on a field. A path longer than one is a deep rename.
    Renamed { from: Vec<Name> },
    /// `@renamed` on a type.
    TypeRenamed { from: Name },
    Stubbed,
    Partitioned { path_to_partition_arg: Vec<Name> },
    Hydrated(NadelHydrationDefinition),
    VirtualType,
}

/// Every instruction definition of the overall schema, keyed by coordinate.
///
/// Built in a single pass and never modified afterwards. A field may hold several definitions,
/// e.g. one per `@hydrated` application.
#[derive(Debug, Default)]
pub struct NadelInstructionDefinitionRegistry {
    definitions: MultiMap<NadelSchemaCoordinate, NadelInstructionDefinition>,
}

impl NadelInstructionDefinitionRegistry {
    /// Reads the definitions of every non built-in type. Malformed directive applications are
    /// skipped and reported.
    pub fn build(schema: &Schema) -> (Self, Vec<NadelSchemaValidationError>) {
        let mut definitions = MultiMap::new();
        let mut errors = Vec::new();
        let mut record =
            |coordinate: &NadelSchemaCoordinate,
             directive: &Directive,
             parsed: Result<NadelInstructionDefinition, String>| match parsed {
                Ok(definition) => definitions.insert(coordinate.clone(), definition),
                Err(message) => errors.push(NadelSchemaValidationError::MalformedDirective {
                    coordinate: coordinate.clone(),
                    directive: directive.name.clone(),
                    message,
                }),
            };

        for ty in schema.types.values().filter(|ty| !ty.is_built_in()) {
            let coordinate = NadelSchemaCoordinate::for_type(ty.name().clone());
            for directive in ty.directives().iter() {
                if directive.name == RENAMED_DIRECTIVE_NAME {
                    let parsed = parser::parse_type_renamed(directive)
                        .map(|from| NadelInstructionDefinition::TypeRenamed { from });
                    record(&coordinate, directive, parsed);
                } else if directive.name == VIRTUAL_TYPE_DIRECTIVE_NAME {
                    record(&coordinate, directive, Ok(NadelInstructionDefinition::VirtualType));
                }
            }

            let Some(container) = NadelFieldsContainer::from_type(ty) else {
                continue;
            };
            for field in container.fields() {
                let coordinate =
                    NadelSchemaCoordinate::for_field(ty.name().clone(), field.name.clone());
                for directive in field.directives.iter() {
                    let parsed = if directive.name == RENAMED_DIRECTIVE_NAME {
                        parser::parse_renamed(directive)
                            .map(|from| NadelInstructionDefinition::Renamed { from })
                    } else if directive.name == HYDRATED_DIRECTIVE_NAME {
                        parser::parse_hydrated(directive).map(NadelInstructionDefinition::Hydrated)
                    } else if directive.name == STUBBED_DIRECTIVE_NAME {
                        Ok(NadelInstructionDefinition::Stubbed)
                    } else if directive.name == PARTITION_DIRECTIVE_NAME {
                        parser::parse_partition(directive).map(|path_to_partition_arg| {
                            NadelInstructionDefinition::Partitioned {
                                path_to_partition_arg,
                            }
                        })
                    } else {
                        continue;
                    };
                    record(&coordinate, directive, parsed);
                }
            }
        }

        debug!(
            coordinates = definitions.len(),
            malformed = errors.len(),
            "read instruction definitions"
        );
        (Self { definitions }, errors)
    }

    pub fn get(&self, coordinate: &NadelSchemaCoordinate) -> &[NadelInstructionDefinition] {
        self.definitions
            .get_vec(coordinate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The path of a field `@renamed`.
    pub fn renamed(&self, coordinate: &NadelSchemaCoordinate) -> Option<&[Name]> {
        self.get(coordinate).iter().find_map(|definition| match definition {
            NadelInstructionDefinition::Renamed { from } => Some(from.as_slice()),
            _ => None,
        })
    }

    pub fn is_renamed(&self, coordinate: &NadelSchemaCoordinate) -> bool {
        self.renamed(coordinate).is_some()
    }

    pub fn hydrations(
        &self,
        coordinate: &NadelSchemaCoordinate,
    ) -> impl Iterator<Item = &NadelHydrationDefinition> {
        self.get(coordinate)
            .iter()
            .filter_map(|definition| match definition {
                NadelInstructionDefinition::Hydrated(hydration) => Some(hydration),
                _ => None,
            })
    }

    pub fn is_hydrated(&self, coordinate: &NadelSchemaCoordinate) -> bool {
        self.hydrations(coordinate).next().is_some()
    }

    pub fn is_stubbed(&self, coordinate: &NadelSchemaCoordinate) -> bool {
        self.get(coordinate)
            .contains(&NadelInstructionDefinition::Stubbed)
    }

    pub fn partition(&self, coordinate: &NadelSchemaCoordinate) -> Option<&[Name]> {
        self.get(coordinate).iter().find_map(|definition| match definition {
            NadelInstructionDefinition::Partitioned {
                path_to_partition_arg,
            } => Some(path_to_partition_arg.as_slice()),
            _ => None,
        })
    }

    pub fn is_partitioned(&self, coordinate: &NadelSchemaCoordinate) -> bool {
        self.partition(coordinate).is_some()
    }

    pub fn is_virtual_type(&self, type_name: &Name) -> bool {
        self.get(&NadelSchemaCoordinate::for_type(type_name.clone()))
            .contains(&NadelInstructionDefinition::VirtualType)
    }

    /// The name an overall type has in its service, which differs when the type is `@renamed`.
    pub fn underlying_type_name<'a>(&'a self, overall_type_name: &'a Name) -> &'a Name {
        self.get(&NadelSchemaCoordinate::for_type(overall_type_name.clone()))
            .iter()
            .find_map(|definition| match definition {
                NadelInstructionDefinition::TypeRenamed { from } => Some(from),
                _ => None,
            })
            .unwrap_or(overall_type_name)
    }
}
