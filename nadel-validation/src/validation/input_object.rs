use apollo_compiler::schema::InputObjectType;

use super::ValidationContext;
use super::assignability::is_input_type_assignable;
use crate::error::NadelSchemaValidationError;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelElementPair;
use crate::schema::NadelSchemaCoordinate;

/// Overall input values are forwarded to the service, so every overall input field must exist
/// there and be at least as strict.
pub(crate) fn validate(
    context: &ValidationContext<'_>,
    pair: NadelElementPair<'_, InputObjectType>,
) -> NadelSchemaValidationResult {
    pair.overall
        .fields
        .values()
        .map(|field| -> NadelSchemaValidationResult {
            let coordinate =
                NadelSchemaCoordinate::for_field(pair.overall.name.clone(), field.name.clone());
            let Some(underlying) = pair.underlying.fields.get(&field.name) else {
                return NadelSchemaValidationError::MissingUnderlyingInputField {
                    service: pair.service.name.clone(),
                    coordinate,
                    underlying_type: pair.underlying.name.clone(),
                }
                .into();
            };
            let expected = context.underlying_type_name(field.ty.inner_named_type());
            if is_input_type_assignable(&field.ty, &underlying.ty, expected) {
                return NadelSchemaValidationResult::ok();
            }
            NadelSchemaValidationError::IncompatibleInputFieldType {
                service: pair.service.name.clone(),
                coordinate,
                overall_type: field.ty.to_string(),
                underlying_type: underlying.ty.to_string(),
            }
            .into()
        })
        .collect()
}
