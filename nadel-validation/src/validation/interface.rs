use apollo_compiler::schema::InterfaceType;

use super::ValidationContext;
use super::field::FieldScope;
use super::field::validate_fields;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelElementPair;
use crate::schema::NadelFieldsContainer;

pub(crate) fn validate(
    context: &ValidationContext<'_>,
    pair: NadelElementPair<'_, InterfaceType>,
) -> NadelSchemaValidationResult {
    validate_fields(
        context,
        &FieldScope {
            service: pair.service,
            overall: NadelFieldsContainer::Interface(pair.overall),
            underlying: NadelFieldsContainer::Interface(pair.underlying),
            underlying_schema: &pair.service.underlying_schema,
        },
    )
}
