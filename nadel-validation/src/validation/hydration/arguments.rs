use std::collections::HashSet;

use apollo_compiler::Name;
use apollo_compiler::ast::Type;
use apollo_compiler::schema::FieldDefinition;

use super::super::ValidationContext;
use super::super::assignability::HydrationArgumentAssignability;
use super::super::assignability::HydrationArgumentMismatch;
use super::super::field::FieldScope;
use crate::definition::NadelHydrationArgumentValue;
use crate::definition::NadelHydrationDefinition;
use crate::error::NadelSchemaValidationError;
use crate::schema::NadelFieldsContainer;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::coordinates::display_path;

/// Checks every argument binding of one hydration against the actor field.
pub(super) fn validate(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
    definition: &NadelHydrationDefinition,
    actor_field: &FieldDefinition,
    actor_field_name: &str,
) -> Vec<NadelSchemaValidationError> {
    let mut errors = Vec::new();
    let mut bound: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();

    for binding in &definition.arguments {
        if !bound.insert(binding.name.as_str()) {
            if reported.insert(binding.name.as_str()) {
                errors.push(NadelSchemaValidationError::DuplicatedHydrationArgument {
                    service: scope.service.name.clone(),
                    coordinate: coordinate.clone(),
                    argument: binding.name.clone(),
                });
            }
            continue;
        }
        let Some(actor_argument) = actor_field.argument_by_name(&binding.name) else {
            errors.push(NadelSchemaValidationError::NonExistentHydrationActorFieldArgument {
                service: scope.service.name.clone(),
                coordinate: coordinate.clone(),
                actor_field: actor_field_name.to_owned(),
                argument: binding.name.clone(),
            });
            continue;
        };

        let (supplied, assignability, ignore_outer_nullability) = match &binding.value {
            NadelHydrationArgumentValue::StaticValue(_) => continue,
            NadelHydrationArgumentValue::FieldResultValue { path } => {
                let Some(supplied) = resolve_source(scope, path) else {
                    errors.push(NadelSchemaValidationError::MissingHydrationFieldValueSource {
                        service: scope.service.name.clone(),
                        coordinate: coordinate.clone(),
                        source_path: display_path(path),
                        source_type: scope.underlying.name().clone(),
                    });
                    continue;
                };
                let assignability = HydrationArgumentAssignability {
                    supplied_schema: scope.underlying_schema,
                    actor_schema: context.engine_schema,
                };
                (supplied, assignability, true)
            }
            NadelHydrationArgumentValue::ArgumentValue { name } => {
                let Some(argument) = field.argument_by_name(name) else {
                    errors.push(NadelSchemaValidationError::MissingHydrationArgumentValueSource {
                        service: scope.service.name.clone(),
                        coordinate: coordinate.clone(),
                        argument: name.clone(),
                    });
                    continue;
                };
                let assignability = HydrationArgumentAssignability {
                    supplied_schema: context.engine_schema,
                    actor_schema: context.engine_schema,
                };
                (Type::clone(&argument.ty), assignability, false)
            }
        };

        if let Err(mismatch) =
            assignability.check(&supplied, &actor_argument.ty, ignore_outer_nullability)
        {
            errors.push(mismatch_error(
                scope,
                coordinate,
                &binding.name,
                &supplied,
                &actor_argument.ty,
                mismatch,
            ));
        }
    }

    errors.extend(
        actor_field
            .arguments
            .iter()
            .filter(|argument| argument.ty.is_non_null() && argument.default_value.is_none())
            .filter(|argument| !bound.contains(argument.name.as_str()))
            .map(|argument| {
                NadelSchemaValidationError::MissingRequiredHydrationActorFieldArgument {
                    service: scope.service.name.clone(),
                    coordinate: coordinate.clone(),
                    actor_field: actor_field_name.to_owned(),
                    argument: argument.name.clone(),
                }
            }),
    );
    errors
}

/// The type of a `$source` value. Lists along the path collect their items into a list.
fn resolve_source(scope: &FieldScope<'_>, path: &[Name]) -> Option<Type> {
    let (last, parents) = path.split_last()?;
    let mut container = scope.underlying;
    let mut is_collected = false;
    for step in parents {
        let parent = container.field(step)?;
        is_collected |= parent.ty.is_list();
        container =
            NadelFieldsContainer::lookup(scope.underlying_schema, parent.ty.inner_named_type())?;
    }
    let ty = container.field(last)?.ty.clone();
    Some(if is_collected {
        Type::List(Box::new(ty))
    } else {
        ty
    })
}

fn mismatch_error(
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    argument: &Name,
    supplied: &Type,
    required: &Type,
    mismatch: HydrationArgumentMismatch,
) -> NadelSchemaValidationError {
    match mismatch {
        HydrationArgumentMismatch::Type => {
            NadelSchemaValidationError::IncompatibleHydrationArgumentType {
                service: scope.service.name.clone(),
                coordinate: coordinate.clone(),
                argument: argument.clone(),
                supplied_type: supplied.to_string(),
                actor_argument_type: required.to_string(),
            }
        }
        HydrationArgumentMismatch::MissingInputField {
            input_type,
            input_field,
        } => NadelSchemaValidationError::MissingFieldInHydratedInputObject {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            argument: argument.clone(),
            input_type,
            input_field,
        },
        HydrationArgumentMismatch::IncompatibleInputField {
            input_type,
            input_field,
        } => NadelSchemaValidationError::IncompatibleFieldInHydratedInputObject {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            argument: argument.clone(),
            input_type,
            input_field,
        },
    }
}
