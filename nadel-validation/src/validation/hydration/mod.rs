//! `@hydrated` fields: values fetched from an actor field, possibly in another service.

use apollo_compiler::Name;
use apollo_compiler::ast::OperationType;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use tracing::trace;

use super::ValidationContext;
use super::field::FieldScope;
use super::field::Hydrations;
use super::validate_element;
use crate::definition::NadelHydrationDefinition;
use crate::error::NadelSchemaValidationError;
use crate::instructions::NadelHydrationInstruction;
use crate::instructions::NadelInstruction;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelFieldsContainer;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::NadelServiceSchemaElement;
use crate::schema::coordinates::display_path;

mod arguments;
mod condition;
mod output;

/// What a hydration definition resolved to.
struct Actor<'a> {
    service: &'a str,
    field: &'a FieldDefinition,
    /// Actor fields returning lists are called once for many hydrated values.
    is_batched: bool,
}

pub(crate) fn validate(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
    hydrations: &Hydrations<'_>,
) -> NadelSchemaValidationResult {
    let mut result = NadelSchemaValidationResult::ok();
    if field.ty.is_non_null() {
        result = result.and(NadelSchemaValidationError::HydrationFieldMustBeNullable {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
        });
    }

    let mut batching = Vec::with_capacity(hydrations.len());
    for definition in hydrations.iter() {
        let actor = match resolve_actor(context, scope, coordinate, definition) {
            Ok(actor) => actor,
            Err(error) => {
                result = result.and(error);
                continue;
            }
        };
        batching.push(actor.is_batched);
        result = result.and(validate_definition(
            context, scope, coordinate, field, definition, &actor,
        ));
    }

    if hydrations.len() > 1 {
        result = result.and(validate_polymorphic(
            context, scope, coordinate, field, hydrations, &batching,
        ));
    }
    result
}

fn resolve_actor<'a>(
    context: &'a ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    definition: &NadelHydrationDefinition,
) -> Result<Actor<'a>, NadelSchemaValidationError> {
    let missing_field = || NadelSchemaValidationError::MissingHydrationActorField {
        service: scope.service.name.clone(),
        coordinate: coordinate.clone(),
        actor_field: display_path(&definition.actor_field_path),
    };

    let query = context
        .engine_schema
        .root_operation(OperationType::Query)
        .ok_or_else(missing_field)?;
    let declared = match &definition.service_name {
        Some(name) => Some(context.services.get(name).ok_or_else(|| {
            NadelSchemaValidationError::MissingHydrationActorService {
                service: scope.service.name.clone(),
                coordinate: coordinate.clone(),
                actor_service: name.clone(),
            }
        })?),
        None => None,
    };

    let (parent, field) = resolve_actor_field(context, query, &definition.actor_field_path)
        .ok_or_else(missing_field)?;
    // Without `service:` the actor belongs to whoever declares the leaf on its parent type.
    let service = match declared {
        Some(service) => service,
        None => context
            .services
            .values()
            .find(|service| service.declares_field(parent.as_str(), field.name.as_str()))
            .ok_or_else(missing_field)?,
    };

    Ok(Actor {
        service: &service.name,
        field,
        is_batched: field.ty.is_list(),
    })
}

/// Follows `a.b.c` from the query type through object fields, returning the leaf and the type
/// declaring it.
fn resolve_actor_field<'a>(
    context: &'a ValidationContext<'_>,
    query: &Name,
    path: &[Name],
) -> Option<(&'a Name, &'a FieldDefinition)> {
    let (last, parents) = path.split_last()?;
    let mut container = NadelFieldsContainer::lookup(context.engine_schema, query)?;
    for step in parents {
        let parent = container.field(step)?;
        container = NadelFieldsContainer::lookup(context.engine_schema, parent.ty.inner_named_type())?;
    }
    let field: &FieldDefinition = container.field(last)?;
    Some((container.name(), field))
}

fn validate_definition(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
    definition: &NadelHydrationDefinition,
    actor: &Actor<'_>,
) -> NadelSchemaValidationResult {
    let actor_field_name = display_path(&definition.actor_field_path);
    trace!(
        %coordinate,
        actor_service = actor.service,
        actor_field = %actor_field_name,
        "validating hydration"
    );

    let mut errors = arguments::validate(
        context,
        scope,
        coordinate,
        field,
        definition,
        actor.field,
        &actor_field_name,
    );
    if actor.is_batched {
        errors.extend(validate_batch(scope, coordinate, definition, &actor_field_name));
    }
    let output = output::validate(
        context,
        scope,
        coordinate,
        field,
        actor.field,
        &actor_field_name,
    );
    let virtual_types = match output {
        Ok(virtual_types) => virtual_types,
        Err(error) => {
            errors.push(error);
            Vec::new()
        }
    };
    if let Some(condition) = &definition.condition {
        errors.extend(condition::validate(context, scope, coordinate, definition, condition));
    }

    let instruction = errors.is_empty().then(|| NadelInstruction::Hydration {
        service: scope.service.name.clone(),
        coordinate: coordinate.clone(),
        hydration: NadelHydrationInstruction {
            actor_service: actor.service.to_owned(),
            actor_field_path: definition.actor_field_path.clone(),
            arguments: definition.arguments.clone(),
            identified_by: definition.identified_by.clone(),
            is_indexed: definition.is_indexed,
            is_batched: actor.is_batched,
            batch_size: definition.batch_size.unwrap_or(context.config.default_batch_size),
            timeout: definition.timeout,
            condition: definition.condition.clone(),
        },
    });

    NadelSchemaValidationResult::from(errors)
        .and(instruction)
        .and(
            virtual_types
                .into_iter()
                .map(|pair| validate_element(context, NadelServiceSchemaElement::VirtualType(pair)))
                .collect::<NadelSchemaValidationResult>(),
        )
}

/// A batch carries one `$source` value per hydrated object and must be able to match results
/// back to them.
fn validate_batch(
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    definition: &NadelHydrationDefinition,
    actor_field_name: &str,
) -> Vec<NadelSchemaValidationError> {
    let mut errors = Vec::new();
    match definition.source_paths().count() {
        0 => errors.push(NadelSchemaValidationError::NoSourceArgsInBatchHydration {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            actor_field: actor_field_name.to_owned(),
        }),
        1 => {}
        _ => errors.push(NadelSchemaValidationError::MultipleSourceArgsInBatchHydration {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            actor_field: actor_field_name.to_owned(),
        }),
    }
    if !definition.is_indexed && definition.identified_by.is_none() {
        errors.push(NadelSchemaValidationError::BatchHydrationMissingIdentifiedBy {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
            actor_field: actor_field_name.to_owned(),
        });
    }
    errors
}

/// Rules for fields with more than one `@hydrated`.
fn validate_polymorphic(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
    hydrations: &Hydrations<'_>,
    batching: &[bool],
) -> Vec<NadelSchemaValidationError> {
    let mut errors = Vec::new();
    if !matches!(
        context.engine_schema.types.get(field.ty.inner_named_type()),
        Some(ExtendedType::Union(_))
    ) {
        errors.push(NadelSchemaValidationError::FieldWithPolymorphicHydrationMustReturnAUnion {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
        });
    }
    if batching.iter().any(|batched| *batched) && batching.iter().any(|batched| !batched) {
        errors.push(NadelSchemaValidationError::HydrationsMismatch {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
        });
    }
    let conditions = hydrations
        .iter()
        .filter(|definition| definition.condition.is_some())
        .count();
    if conditions != 0 && conditions != hydrations.len() {
        errors.push(NadelSchemaValidationError::SomeHydrationsHaveMissingConditions {
            service: scope.service.name.clone(),
            coordinate: coordinate.clone(),
        });
    }
    errors
}
