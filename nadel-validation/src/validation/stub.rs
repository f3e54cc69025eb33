use apollo_compiler::schema::FieldDefinition;

use super::field::FieldScope;
use crate::error::NadelSchemaValidationError;
use crate::instructions::NadelInstruction;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelSchemaCoordinate;

/// A `@stubbed` field always resolves to null, so it has no underlying counterpart but must be
/// nullable.
pub(crate) fn validate(
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
) -> NadelSchemaValidationResult {
    if field.ty.is_non_null() {
        return NadelSchemaValidationError::StubbedFieldMustBeNullable {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            output_type: field.ty.to_string(),
        }
        .into();
    }
    NadelInstruction::Stub {
        service: scope.service.name.clone(),
        coordinate: coordinate.clone(),
    }
    .into()
}
