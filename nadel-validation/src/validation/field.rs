//! Per-field dispatch.

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::schema::FieldDefinition;

use super::ValidationContext;
use super::assignability::is_input_type_assignable;
use super::assignability::is_output_type_assignable;
use super::hydration;
use super::is_hidden;
use super::partition;
use super::rename;
use super::stub;
use crate::definition::NadelHydrationDefinition;
use crate::directives::HYDRATED_DIRECTIVE_NAME;
use crate::directives::NAMESPACED_DIRECTIVE_NAME;
use crate::directives::PARTITION_DIRECTIVE_NAME;
use crate::directives::RENAMED_DIRECTIVE_NAME;
use crate::error::NadelSchemaValidationError;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelFieldsContainer;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::NadelService;

/// The fields being validated and where their values come from.
///
/// For regular types `underlying` is the service's type. For virtual types it is the backing
/// type and `underlying_schema` is the overall schema.
#[derive(Clone, Copy)]
pub(crate) struct FieldScope<'a> {
    pub(crate) service: &'a NadelService,
    pub(crate) overall: NadelFieldsContainer<'a>,
    pub(crate) underlying: NadelFieldsContainer<'a>,
    pub(crate) underlying_schema: &'a Schema,
}

impl FieldScope<'_> {
    pub(crate) fn coordinate(&self, field: &FieldDefinition) -> NadelSchemaCoordinate {
        NadelSchemaCoordinate::for_field(self.overall.name().clone(), field.name.clone())
    }
}

/// The hydrations of a field. Never empty.
pub(crate) struct Hydrations<'a> {
    first: &'a NadelHydrationDefinition,
    rest: Vec<&'a NadelHydrationDefinition>,
}

impl<'a> Hydrations<'a> {
    fn new(mut definitions: impl Iterator<Item = &'a NadelHydrationDefinition>) -> Option<Self> {
        let first = definitions.next()?;
        Some(Self {
            first,
            rest: definitions.collect(),
        })
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &'a NadelHydrationDefinition> + '_ {
        std::iter::once(self.first).chain(self.rest.iter().copied())
    }

    pub(crate) fn len(&self) -> usize {
        1 + self.rest.len()
    }
}

/// The single behaviour a field's directives ask for.
pub(crate) enum FieldClassification<'a> {
    Renamed(&'a [Name]),
    Hydrated(Hydrations<'a>),
    Stubbed,
    Plain { partition: Option<&'a [Name]> },
}

/// Classifies a field, or reports the directive combinations that cannot be honoured together.
pub(crate) fn classify<'a>(
    context: &'a ValidationContext<'_>,
    service: &NadelService,
    coordinate: &NadelSchemaCoordinate,
) -> Result<FieldClassification<'a>, Vec<NadelSchemaValidationError>> {
    let definitions = context.definitions;
    let renamed = definitions.renamed(coordinate);
    let hydrations = Hydrations::new(definitions.hydrations(coordinate));
    let partition = definitions.partition(coordinate);
    let is_stubbed = definitions.is_stubbed(coordinate);

    let mut errors = Vec::new();
    if renamed.is_some() && hydrations.is_some() {
        errors.push(NadelSchemaValidationError::CannotRenameHydratedField {
            service: service.name.clone(),
            coordinate: coordinate.clone(),
        });
    }
    if renamed.is_some() && partition.is_some() {
        errors.push(NadelSchemaValidationError::CannotRenamePartitionedField {
            service: service.name.clone(),
            coordinate: coordinate.clone(),
        });
    }
    if hydrations.is_some() && partition.is_some() {
        errors.push(NadelSchemaValidationError::CannotPartitionHydratedField {
            service: service.name.clone(),
            coordinate: coordinate.clone(),
        });
    }
    if is_stubbed {
        let others = [
            (renamed.is_some(), RENAMED_DIRECTIVE_NAME),
            (hydrations.is_some(), HYDRATED_DIRECTIVE_NAME),
            (partition.is_some(), PARTITION_DIRECTIVE_NAME),
        ];
        errors.extend(others.into_iter().filter(|(present, _)| *present).map(
            |(_, directive)| NadelSchemaValidationError::CannotStubField {
                service: service.name.clone(),
                coordinate: coordinate.clone(),
                directive,
            },
        ));
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(match (renamed, hydrations) {
        (Some(path), _) => FieldClassification::Renamed(path),
        (None, Some(hydrations)) => FieldClassification::Hydrated(hydrations),
        (None, None) if is_stubbed => FieldClassification::Stubbed,
        (None, None) => FieldClassification::Plain { partition },
    })
}

/// Validates the fields of an object or interface type.
pub(crate) fn validate_fields(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
) -> NadelSchemaValidationResult {
    let overall_name = scope.overall.name();
    let mut fields = scope.overall.fields().peekable();
    if context.config.reject_all_hidden_types
        && fields.peek().is_some()
        && scope.overall.fields().all(|field| is_hidden(field))
    {
        return NadelSchemaValidationError::AllFieldsUsingHiddenDirective {
            service: scope.service.name.clone(),
            overall_type: overall_name.clone(),
        }
        .into();
    }

    // Operation and namespace types are split between services.
    let owned_fields = context
        .is_shared_root(overall_name)
        .then(|| scope.service.declared_fields(overall_name));
    fields
        .filter(|field| {
            owned_fields
                .as_ref()
                .is_none_or(|owned| owned.contains(&field.name))
        })
        .map(|field| validate_field(context, scope, field))
        .collect()
}

fn validate_field(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    field: &FieldDefinition,
) -> NadelSchemaValidationResult {
    let coordinate = scope.coordinate(field);
    let namespace = validate_namespaced(context, scope, &coordinate, field);
    let result = match classify(context, scope.service, &coordinate) {
        Err(errors) => errors.into(),
        Ok(FieldClassification::Renamed(path)) => {
            rename::validate(context, scope, &coordinate, field, path)
        }
        Ok(FieldClassification::Hydrated(hydrations)) => {
            hydration::validate(context, scope, &coordinate, field, &hydrations)
        }
        Ok(FieldClassification::Stubbed) => stub::validate(scope, &coordinate, field),
        Ok(FieldClassification::Plain { partition }) => {
            let plain = match scope.underlying.field(&field.name) {
                Some(underlying) => {
                    validate_field_pair(context, scope, &coordinate, field, underlying)
                }
                None => NadelSchemaValidationError::MissingUnderlyingField {
                    service: scope.service.name.clone(),
                    coordinate: coordinate.clone(),
                    underlying_type: scope.underlying.name().clone(),
                }
                .into(),
            };
            let partition = partition.map(|path| {
                partition::validate(context, scope, &coordinate, field, path)
            });
            plain.and(partition)
        }
    };
    namespace.and(result)
}

/// Checks the arguments and output of an overall field against the underlying field it reads.
pub(crate) fn validate_field_pair(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    overall: &FieldDefinition,
    underlying: &FieldDefinition,
) -> NadelSchemaValidationResult {
    let arguments = validate_arguments(context, scope, coordinate, overall, underlying);

    let expected = context.underlying_type_name(overall.ty.inner_named_type());
    let output = (!is_output_type_assignable(&overall.ty, &underlying.ty, expected)).then(|| {
        NadelSchemaValidationError::IncompatibleFieldOutputType {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            overall_type: overall.ty.to_string(),
            underlying_type: underlying.ty.to_string(),
        }
    });

    arguments
        .into_iter()
        .chain(output)
        .map(NadelSchemaValidationResult::from)
        .collect()
}

/// Every overall argument must be accepted by the underlying field it is passed to.
pub(crate) fn validate_arguments(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    overall: &FieldDefinition,
    underlying: &FieldDefinition,
) -> Vec<NadelSchemaValidationError> {
    overall
        .arguments
        .iter()
        .filter_map(|argument| {
            let Some(underlying_argument) = underlying.argument_by_name(&argument.name) else {
                return Some(NadelSchemaValidationError::MissingArgumentOnUnderlying {
                    service: scope.service.name.clone(),
                    coordinate: coordinate.clone(),
                    argument: argument.name.clone(),
                });
            };
            let expected = context.underlying_type_name(argument.ty.inner_named_type());
            (!is_input_type_assignable(&argument.ty, &underlying_argument.ty, expected)).then(|| {
                NadelSchemaValidationError::IncompatibleArgumentInputType {
                    service: scope.service.name.clone(),
                    coordinate: coordinate.clone(),
                    argument: argument.name.clone(),
                    overall_type: argument.ty.to_string(),
                    underlying_type: underlying_argument.ty.to_string(),
                }
            })
        })
        .collect()
}

fn validate_namespaced(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
) -> NadelSchemaValidationResult {
    let is_object = context
        .engine_schema
        .get_object(field.ty.inner_named_type())
        .is_some();
    if !field.directives.has(&NAMESPACED_DIRECTIVE_NAME) || is_object {
        return NadelSchemaValidationResult::ok();
    }
    NadelSchemaValidationError::NamespacedTypeMustBeObject {
        service: scope.service.name.clone(),
        coordinate: coordinate.clone(),
        output_type: field.ty.to_string(),
    }
    .into()
}
