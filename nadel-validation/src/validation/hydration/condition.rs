use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast::Type;
use regex::Regex;

use super::super::ValidationContext;
use super::super::field::FieldScope;
use crate::definition::NadelHydrationCondition;
use crate::definition::NadelHydrationConditionPredicate;
use crate::definition::NadelHydrationDefinition;
use crate::error::NadelSchemaValidationError;
use crate::schema::NadelFieldsContainer;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::coordinates::display_path;

/// Checks a `when:` condition of a hydration.
///
/// The source field is read from the underlying object when it is also a `$source` value of the
/// hydration, otherwise from the overall object.
pub(super) fn validate(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    definition: &NadelHydrationDefinition,
    condition: &NadelHydrationCondition,
) -> Vec<NadelSchemaValidationError> {
    let source_field = display_path(&condition.source_field);
    let is_source_value = definition
        .source_paths()
        .any(|path| path == condition.source_field.as_slice());
    let (container, schema) = if is_source_value {
        (scope.underlying, scope.underlying_schema)
    } else {
        (scope.overall, context.engine_schema)
    };

    let Some(ty) = resolve(container, schema, &condition.source_field) else {
        return vec![
            NadelSchemaValidationError::HydrationConditionSourceFieldDoesNotExist {
                service: scope.service.name.clone(),
                coordinate: coordinate.clone(),
                source_field,
            },
        ];
    };
    let scalar = ty.inner_named_type().as_str();
    if ty.is_list() || !matches!(scalar, "String" | "Int" | "ID") {
        return vec![
            NadelSchemaValidationError::HydrationConditionUnsupportedFieldType {
                service: scope.service.name.clone(),
                coordinate: coordinate.clone(),
                source_field,
                source_field_type: ty.to_string(),
            },
        ];
    }

    let predicate = &condition.predicate;
    let mut errors = Vec::new();
    match predicate {
        NadelHydrationConditionPredicate::Equals(value) => {
            let is_match = match scalar {
                "String" => value.is_string(),
                "Int" => value.is_i64() || value.is_u64(),
                _ => value.is_string() || value.is_i64() || value.is_u64(),
            };
            if !is_match {
                errors.push(
                    NadelSchemaValidationError::HydrationConditionPredicateDoesNotMatchSourceFieldType {
                        service: scope.service.name.clone(),
                        coordinate: coordinate.clone(),
                        source_field: source_field.clone(),
                        source_field_type: ty.to_string(),
                        predicate: predicate.name(),
                    },
                );
            }
        }
        NadelHydrationConditionPredicate::StartsWith(_)
        | NadelHydrationConditionPredicate::Matches(_) => {
            if scalar == "Int" {
                errors.push(
                    NadelSchemaValidationError::HydrationConditionPredicateRequiresStringSourceField {
                        service: scope.service.name.clone(),
                        coordinate: coordinate.clone(),
                        source_field: source_field.clone(),
                        source_field_type: ty.to_string(),
                        predicate: predicate.name(),
                    },
                );
            }
        }
    }
    if let NadelHydrationConditionPredicate::Matches(pattern) = predicate
        && let Err(error) = Regex::new(pattern)
    {
        errors.push(NadelSchemaValidationError::HydrationConditionInvalidRegex {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            pattern: pattern.clone(),
            message: error.to_string(),
        });
    }
    errors
}

fn resolve<'a>(
    mut container: NadelFieldsContainer<'a>,
    schema: &'a Schema,
    path: &[Name],
) -> Option<Type> {
    let (last, parents) = path.split_last()?;
    for step in parents {
        let parent = container.field(step)?;
        if parent.ty.is_list() {
            return None;
        }
        container = NadelFieldsContainer::lookup(schema, parent.ty.inner_named_type())?;
    }
    Some(container.field(last)?.ty.clone())
}
