use apollo_compiler::Name;
use apollo_compiler::ast::OperationType;
use apollo_compiler::ast::Type;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;

use super::ValidationContext;
use super::field::FieldScope;
use crate::error::NadelSchemaValidationError;
use crate::instructions::NadelInstruction;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::coordinates::display_path;

const MUTATION_PAYLOAD_SUCCESS_FIELD: &str = "success";

/// `@partition(pathToPartitionArg:)` splits a request by the items of a list argument, so it only
/// applies to operation and namespace fields whose results can be merged back together.
pub(crate) fn validate(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
    path: &[Name],
) -> NadelSchemaValidationResult {
    let parent = scope.overall.name();
    if context.operation_type(parent) == Some(OperationType::Subscription) {
        return NadelSchemaValidationError::PartitionAppliedToSubscriptionField {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
        }
        .into();
    }
    if !context.is_shared_root(parent) {
        return NadelSchemaValidationError::PartitionAppliedToUnsupportedField {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
        }
        .into();
    }

    let mut errors = Vec::new();
    if !is_supported_output_type(context, &field.ty) {
        errors.push(
            NadelSchemaValidationError::PartitionAppliedToFieldWithUnsupportedOutputType {
                service: scope.service.name.clone(),
                coordinate: coordinate.clone(),
                output_type: field.ty.to_string(),
            },
        );
    }
    if !resolves_to_list(context, field, path) {
        errors.push(NadelSchemaValidationError::InvalidPartitionArgument {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            path: display_path(path),
        });
    }
    if !errors.is_empty() {
        return errors.into();
    }

    NadelInstruction::Partition {
        service: scope.service.name.clone(),
        coordinate: coordinate.clone(),
        path_to_partition_arg: path.to_vec(),
    }
    .into()
}

/// Lists concatenate. Mutation payloads carry a single `success: Boolean` and otherwise lists.
fn is_supported_output_type(context: &ValidationContext<'_>, ty: &Type) -> bool {
    if ty.is_list() {
        return true;
    }
    let Some(payload) = context.engine_schema.get_object(ty.inner_named_type()) else {
        return false;
    };
    let mut success_fields = 0;
    for field in payload.fields.values() {
        if field.name.as_str() == MUTATION_PAYLOAD_SUCCESS_FIELD {
            if field.ty.is_list() || field.ty.inner_named_type().as_str() != "Boolean" {
                return false;
            }
            success_fields += 1;
        } else if !field.ty.is_list() {
            return false;
        }
    }
    success_fields == 1
}

/// Walks from a field argument through input object fields and checks the last step is a list.
fn resolves_to_list(context: &ValidationContext<'_>, field: &FieldDefinition, path: &[Name]) -> bool {
    let Some((argument, rest)) = path.split_first() else {
        return false;
    };
    let Some(argument) = field.argument_by_name(argument) else {
        return false;
    };
    let mut ty: &Type = &argument.ty;
    for step in rest {
        if ty.is_list() {
            return false;
        }
        let Some(ExtendedType::InputObject(input)) =
            context.engine_schema.types.get(ty.inner_named_type())
        else {
            return false;
        };
        let Some(input_field) = input.fields.get(step) else {
            return false;
        };
        ty = &input_field.ty;
    }
    ty.is_list()
}
