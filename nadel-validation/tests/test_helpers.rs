use itertools::Itertools;
use nadel_validation::NadelSchemaValidation;
use nadel_validation::NadelSchemaValidationResult;
use nadel_validation::NadelSchemas;

/// `(name, overall SDL, underlying SDL)`
pub(crate) type Service<'a> = (&'a str, &'a str, &'a str);

pub(crate) fn schemas(services: &[Service<'_>]) -> NadelSchemas {
    services
        .iter()
        .fold(NadelSchemas::builder(), |builder, (name, overall, underlying)| {
            builder.service(*name, *overall, *underlying)
        })
        .build()
        .unwrap()
}

pub(crate) fn validate(services: &[Service<'_>]) -> NadelSchemaValidationResult {
    NadelSchemaValidation::new(&schemas(services)).validate()
}

pub(crate) fn error_codes(result: &NadelSchemaValidationResult) -> Vec<&'static str> {
    result.errors().map(|error| error.code()).collect()
}

pub(crate) fn error_messages(result: &NadelSchemaValidationResult) -> String {
    result.errors().map(ToString::to_string).join("\n")
}

pub(crate) fn instructions(result: &NadelSchemaValidationResult) -> String {
    result.instructions().map(ToString::to_string).join("\n")
}
