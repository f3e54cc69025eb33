use apollo_compiler::Name;
use apollo_compiler::schema::FieldDefinition;

use super::ValidationContext;
use super::assignability::is_output_type_assignable;
use super::field::FieldScope;
use super::field::validate_arguments;
use super::field::validate_field_pair;
use crate::error::NadelSchemaValidationError;
use crate::instructions::NadelInstruction;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelFieldsContainer;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::coordinates::display_path;

/// `@renamed(from:)` on a field: a plain rename reads a sibling field, a deep rename reads a field
/// nested below the underlying parent.
pub(crate) fn validate(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
    path: &[Name],
) -> NadelSchemaValidationResult {
    let missing_rename = || -> NadelSchemaValidationResult {
        NadelSchemaValidationError::MissingRename {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            rename: display_path(path),
        }
        .into()
    };

    if let [from] = path {
        let Some(underlying) = scope.underlying.field(from) else {
            return missing_rename();
        };
        let result = validate_field_pair(context, scope, coordinate, field, underlying);
        return result.and(NadelInstruction::FieldRename {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            underlying_name: from.clone(),
        });
    }

    let Some((target, is_nullable_on_the_way)) = resolve_deep(scope, path) else {
        return missing_rename();
    };
    // Any null parent along the path makes the renamed value null.
    let underlying_type = if is_nullable_on_the_way {
        target.ty.clone().nullable()
    } else {
        target.ty.clone()
    };
    // Arguments are passed to the field at the end of the path.
    let arguments = validate_arguments(context, scope, coordinate, field, target);
    let expected = context.underlying_type_name(field.ty.inner_named_type());
    let output = (!is_output_type_assignable(&field.ty, &underlying_type, expected)).then(|| {
        NadelSchemaValidationError::IncompatibleFieldOutputType {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            overall_type: field.ty.to_string(),
            underlying_type: underlying_type.to_string(),
        }
    });
    let errors = arguments.into_iter().chain(output).collect::<Vec<_>>();
    if !errors.is_empty() {
        return errors.into();
    }
    NadelInstruction::DeepRename {
        service: scope.service.name.clone(),
        coordinate: coordinate.clone(),
        path: path.to_vec(),
    }
    .into()
}

/// Walks a path through underlying fields, returning the last field and whether any field
/// before it was nullable.
fn resolve_deep<'a>(scope: &FieldScope<'a>, path: &[Name]) -> Option<(&'a FieldDefinition, bool)> {
    let (last, parents) = path.split_last()?;
    let mut container = scope.underlying;
    let mut is_nullable = false;
    for step in parents {
        let parent = container.field(step)?;
        if parent.ty.is_list() {
            return None;
        }
        is_nullable |= !parent.ty.is_non_null();
        container = NadelFieldsContainer::lookup(scope.underlying_schema, parent.ty.inner_named_type())?;
    }
    let target: &FieldDefinition = container.field(last)?;
    Some((target, is_nullable))
}
