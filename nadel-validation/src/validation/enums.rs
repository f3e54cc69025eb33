use apollo_compiler::schema::EnumType;

use crate::error::NadelSchemaValidationError;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelElementPair;

/// Every overall enum value must exist in the service. The service may have more.
pub(crate) fn validate(pair: NadelElementPair<'_, EnumType>) -> NadelSchemaValidationResult {
    pair.overall
        .values
        .keys()
        .filter(|value| !pair.underlying.values.contains_key(*value))
        .map(|value| {
            NadelSchemaValidationResult::from(NadelSchemaValidationError::MissingUnderlyingEnumValue {
                service: pair.service.name.clone(),
                overall_type: pair.overall.name.clone(),
                underlying_type: pair.underlying.name.clone(),
                value: value.clone(),
            })
        })
        .collect()
}
