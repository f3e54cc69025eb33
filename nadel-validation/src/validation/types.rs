use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::schema::ObjectType;
use indexmap::IndexMap;

use super::ValidationContext;
use super::field;
use super::field::FieldScope;
use super::reachable::reachable_types;
use super::validate_element;
use crate::error::NadelSchemaValidationError;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelElementPair;
use crate::schema::NadelFieldsContainer;
use crate::schema::NadelService;
use crate::schema::NadelServiceSchemaElement;

/// Pairs every type the service is responsible for with its underlying type and validates the
/// pairs.
pub(crate) fn validate_service(
    context: &ValidationContext<'_>,
    service: &NadelService,
) -> NadelSchemaValidationResult {
    let reachable = reachable_types(context, service);

    let mut overall_by_underlying: IndexMap<&Name, Vec<Name>> = IndexMap::new();
    for overall_name in &reachable {
        overall_by_underlying
            .entry(context.underlying_type_name(overall_name))
            .or_default()
            .push(overall_name.clone());
    }
    let duplicates = overall_by_underlying
        .into_iter()
        .filter(|(_, overall_types)| overall_types.len() > 1)
        .map(|(underlying_type, overall_types)| {
            NadelSchemaValidationResult::from(NadelSchemaValidationError::DuplicatedUnderlyingType {
                service: service.name.clone(),
                underlying_type: underlying_type.clone(),
                overall_types,
            })
        });

    let pairs = reachable.iter().map(|overall_name| {
        let underlying_name = context.underlying_type_name(overall_name);
        let Some(overall) = context.engine_schema.types.get(overall_name) else {
            return NadelSchemaValidationResult::ok();
        };
        match service.underlying_schema.types.get(underlying_name) {
            Some(underlying) => validate_element(
                context,
                NadelServiceSchemaElement::new(service, overall, underlying),
            ),
            None => NadelSchemaValidationError::MissingUnderlyingType {
                service: service.name.clone(),
                overall_type: overall_name.clone(),
                underlying_type: underlying_name.clone(),
            }
            .into(),
        }
    });

    duplicates.chain(pairs).collect()
}

pub(crate) fn validate_object(
    context: &ValidationContext<'_>,
    pair: NadelElementPair<'_, ObjectType>,
) -> NadelSchemaValidationResult {
    let underlying_schema: &Schema = &pair.service.underlying_schema;
    let missing_interfaces = pair
        .overall
        .implements_interfaces
        .iter()
        .filter_map(|interface| {
            let underlying_interface = context.underlying_type_name(&interface.name);
            // A missing interface type is reported when the interface itself is validated.
            let is_implemented = !underlying_schema.types.contains_key(underlying_interface)
                || pair
                    .underlying
                    .implements_interfaces
                    .iter()
                    .any(|implemented| implemented.name == *underlying_interface);
            (!is_implemented).then(|| {
                NadelSchemaValidationError::MissingUnderlyingInterfaceImplementation {
                    service: pair.service.name.clone(),
                    overall_type: pair.overall.name.clone(),
                    underlying_type: pair.underlying.name.clone(),
                    interface: interface.name.clone(),
                }
            })
        })
        .collect::<Vec<_>>();

    field::validate_fields(
        context,
        &FieldScope {
            service: pair.service,
            overall: NadelFieldsContainer::Object(pair.overall),
            underlying: NadelFieldsContainer::Object(pair.underlying),
            underlying_schema,
        },
    )
    .and(missing_interfaces)
}
