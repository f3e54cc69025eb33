//! The overall types a service is responsible for.

use std::collections::VecDeque;

use apollo_compiler::Name;
use apollo_compiler::schema::Component;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use indexmap::IndexSet;

use super::ValidationContext;
use crate::directives::HYDRATED_DIRECTIVE_NAME;
use crate::schema::NadelFieldsContainer;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::NadelService;

/// Overall types reachable from the types a service's definition declares.
///
/// Extensions only count for operation and namespace types, where each service only owns the
/// fields it declares. The walk follows output, argument and input field types, implemented
/// interfaces and union members. Hydrated and stubbed fields are not followed since their types
/// are not expected in the service. Built-in types, virtual types and the unions a service only
/// declares to type its hydrations are left out.
pub(crate) fn reachable_types(context: &ValidationContext<'_>, service: &NadelService) -> IndexSet<Name> {
    let external = external_hydration_unions(context, service);
    let mut queue: VecDeque<Name> = service
        .type_definition_names()
        .filter(|(name, is_extension)| !is_extension || context.is_shared_root(name))
        .map(|(name, _)| name.clone())
        .filter(|name| !external.contains(name))
        .collect();

    let mut reachable = IndexSet::new();
    while let Some(type_name) = queue.pop_front() {
        let Some(ty) = context.engine_schema.types.get(&type_name) else {
            continue;
        };
        if !reachable.insert(type_name.clone()) || context.is_virtual_type(&type_name) {
            continue;
        }

        match ty {
            ExtendedType::Object(object) => {
                queue.extend(object.implements_interfaces.iter().map(|i| i.name.clone()));
                queue.extend(field_references(context, service, &type_name, object.fields.values()));
            }
            ExtendedType::Interface(interface) => {
                queue.extend(interface.implements_interfaces.iter().map(|i| i.name.clone()));
                queue.extend(field_references(
                    context,
                    service,
                    &type_name,
                    interface.fields.values(),
                ));
            }
            ExtendedType::Union(union) => {
                queue.extend(union.members.iter().map(|member| member.name.clone()));
            }
            ExtendedType::InputObject(input) => {
                queue.extend(
                    input
                        .fields
                        .values()
                        .map(|field| field.ty.inner_named_type().clone()),
                );
            }
            ExtendedType::Scalar(_) | ExtendedType::Enum(_) => {}
        }
    }

    reachable.retain(|name| {
        context
            .engine_schema
            .types
            .get(name)
            .is_some_and(|ty| !ty.is_built_in())
            && !context.is_virtual_type(name)
    });
    reachable
}

fn field_references<'a>(
    context: &'a ValidationContext<'_>,
    service: &'a NadelService,
    type_name: &'a Name,
    fields: impl Iterator<Item = &'a Component<FieldDefinition>> + 'a,
) -> impl Iterator<Item = Name> + 'a {
    let owned_fields = context
        .is_shared_root(type_name)
        .then(|| service.declared_fields(type_name));
    fields
        .filter(move |field| {
            owned_fields
                .as_ref()
                .is_none_or(|owned| owned.contains(&field.name))
        })
        .filter(move |field| {
            let coordinate = NadelSchemaCoordinate::for_field(type_name.clone(), field.name.clone());
            !context.definitions.is_hydrated(&coordinate) && !context.definitions.is_stubbed(&coordinate)
        })
        .flat_map(|field| {
            std::iter::once(field.ty.inner_named_type().clone()).chain(
                field
                    .arguments
                    .iter()
                    .map(|argument| argument.ty.inner_named_type().clone()),
            )
        })
}

/// Unions declared by the service that only exist to type hydrated fields.
fn external_hydration_unions(context: &ValidationContext<'_>, service: &NadelService) -> IndexSet<Name> {
    let hydration_outputs: IndexSet<&Name> = context
        .engine_schema
        .types
        .values()
        .filter_map(NadelFieldsContainer::from_type)
        .flat_map(|container| container.fields())
        .filter(|field| field.directives.has(&HYDRATED_DIRECTIVE_NAME))
        .map(|field| field.ty.inner_named_type())
        .collect();

    service
        .type_definition_names()
        .filter(|(name, _)| hydration_outputs.contains(name))
        .filter(|(name, _)| {
            matches!(context.engine_schema.types.get(*name), Some(ExtendedType::Union(_)))
                && !service
                    .underlying_schema
                    .types
                    .contains_key(context.underlying_type_name(name))
        })
        .map(|(name, _)| name.clone())
        .collect()
}
