use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use indexmap::IndexSet;

use super::super::ValidationContext;
use super::super::field::FieldScope;
use crate::error::NadelSchemaValidationError;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::NadelVirtualTypePair;

/// Every object the actor may return must be something the hydrated field can return.
///
/// A virtual type takes its values from whatever object the actor returns. Those pairs are
/// returned so they can be validated as virtual types.
pub(super) fn validate<'a>(
    context: &ValidationContext<'a>,
    scope: &FieldScope<'a>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
    actor_field: &FieldDefinition,
    actor_field_name: &str,
) -> Result<Vec<NadelVirtualTypePair<'a>>, NadelSchemaValidationError> {
    let engine_schema: &'a Schema = context.engine_schema;
    let acceptable = possible_types(engine_schema, field.ty.inner_named_type());
    let virtual_type = acceptable
        .iter()
        .find(|name| context.is_virtual_type(name))
        .and_then(|name| engine_schema.get_object(name));

    let mut virtual_types = Vec::new();
    for actor_type in possible_types(engine_schema, actor_field.ty.inner_named_type()) {
        if acceptable.contains(&actor_type) {
            continue;
        }
        match (virtual_type, engine_schema.get_object(&actor_type)) {
            (Some(virtual_type), Some(backing_type)) => {
                virtual_types.push(NadelVirtualTypePair {
                    service: scope.service,
                    virtual_type,
                    backing_type,
                });
            }
            _ => {
                return Err(NadelSchemaValidationError::HydrationIncompatibleOutputType {
                    service: scope.service.name.clone(),
                    coordinate: coordinate.clone(),
                    actor_field: actor_field_name.to_owned(),
                    actor_output_type: actor_type,
                });
            }
        }
    }
    Ok(virtual_types)
}

/// The named type itself, or the objects a union or interface stands for.
fn possible_types(schema: &Schema, type_name: &Name) -> IndexSet<Name> {
    match schema.types.get(type_name) {
        Some(ExtendedType::Union(union)) => union
            .members
            .iter()
            .map(|member| member.name.clone())
            .collect(),
        Some(ExtendedType::Interface(_)) => schema
            .types
            .values()
            .filter_map(|ty| match ty {
                ExtendedType::Object(object)
                    if object
                        .implements_interfaces
                        .iter()
                        .any(|interface| interface.name == *type_name) =>
                {
                    Some(object.name.clone())
                }
                _ => None,
            })
            .collect(),
        _ => IndexSet::from([type_name.clone()]),
    }
}
