//! Virtual types exist only in the overall schema and read their values from a backing type,
//! usually the output of a hydration actor.

use apollo_compiler::schema::FieldDefinition;

use super::ValidationContext;
use super::assignability::is_input_type_assignable;
use super::assignability::is_output_type_assignable;
use super::field::FieldClassification;
use super::field::FieldScope;
use super::field::classify;
use super::hydration;
use super::partition;
use super::stub;
use super::validate_element;
use super::wrapping::NadelTypeWrappingRule;
use super::wrapping::is_type_wrapping_valid;
use crate::error::NadelSchemaValidationError;
use crate::instructions::NadelInstruction;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelFieldsContainer;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::NadelServiceSchemaElement;
use crate::schema::NadelVirtualTypePair;

pub(crate) fn validate(
    context: &ValidationContext<'_>,
    pair: NadelVirtualTypePair<'_>,
) -> NadelSchemaValidationResult {
    let missing_interfaces = pair
        .virtual_type
        .implements_interfaces
        .iter()
        .filter(|interface| {
            !pair
                .backing_type
                .implements_interfaces
                .iter()
                .any(|implemented| implemented.name == interface.name)
        })
        .map(|interface| NadelSchemaValidationError::VirtualTypeMissingInterface {
            service: pair.service.name.clone(),
            virtual_type: pair.virtual_type.name.clone(),
            backing_type: pair.backing_type.name.clone(),
            interface: interface.name.clone(),
        })
        .collect::<Vec<_>>();

    let scope = FieldScope {
        service: pair.service,
        overall: NadelFieldsContainer::Object(pair.virtual_type),
        underlying: NadelFieldsContainer::Object(pair.backing_type),
        underlying_schema: context.engine_schema,
    };
    let fields = pair
        .virtual_type
        .fields
        .values()
        .map(|field| validate_field(context, &scope, field))
        .collect::<NadelSchemaValidationResult>();

    NadelSchemaValidationResult::from(missing_interfaces)
        .and(fields)
        .and(NadelInstruction::VirtualType {
            service: pair.service.name.clone(),
            virtual_type: pair.virtual_type.name.clone(),
            backing_type: pair.backing_type.name.clone(),
        })
}

fn validate_field(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    field: &FieldDefinition,
) -> NadelSchemaValidationResult {
    let coordinate = scope.coordinate(field);
    match classify(context, scope.service, &coordinate) {
        Err(errors) => errors.into(),
        Ok(FieldClassification::Renamed(_)) => NadelSchemaValidationError::VirtualTypeRenamedField {
            service: scope.service.name.clone(),
            coordinate,
        }
        .into(),
        Ok(FieldClassification::Hydrated(hydrations)) => {
            hydration::validate(context, scope, &coordinate, field, &hydrations)
        }
        Ok(FieldClassification::Stubbed) => stub::validate(scope, &coordinate, field),
        Ok(FieldClassification::Plain { partition }) => {
            let backing = match scope.underlying.field(&field.name) {
                Some(backing) => validate_backing_field(context, scope, &coordinate, field, backing),
                None => NadelSchemaValidationError::VirtualTypeMissingBackingField {
                    service: scope.service.name.clone(),
                    coordinate: coordinate.clone(),
                    backing_type: scope.underlying.name().clone(),
                }
                .into(),
            };
            backing.and(
                partition.map(|path| partition::validate(context, scope, &coordinate, field, path)),
            )
        }
    }
}

fn validate_backing_field(
    context: &ValidationContext<'_>,
    scope: &FieldScope<'_>,
    coordinate: &NadelSchemaCoordinate,
    field: &FieldDefinition,
    backing: &FieldDefinition,
) -> NadelSchemaValidationResult {
    let arguments = field
        .arguments
        .iter()
        .filter_map(|argument| {
            let Some(backing_argument) = backing.argument_by_name(&argument.name) else {
                return Some(NadelSchemaValidationError::VirtualTypeMissingBackingFieldArgument {
                    service: scope.service.name.clone(),
                    coordinate: coordinate.clone(),
                    argument: argument.name.clone(),
                });
            };
            let expected = argument.ty.inner_named_type();
            (!is_input_type_assignable(&argument.ty, &backing_argument.ty, expected)).then(|| {
                NadelSchemaValidationError::VirtualTypeIncompatibleFieldArgument {
                    service: scope.service.name.clone(),
                    coordinate: coordinate.clone(),
                    argument: argument.name.clone(),
                    virtual_type: argument.ty.to_string(),
                    backing_type: backing_argument.ty.to_string(),
                }
            })
        })
        .collect::<Vec<_>>();

    let incompatible_output = || NadelSchemaValidationError::VirtualTypeIncompatibleFieldOutputType {
        service: scope.service.name.clone(),
        coordinate: coordinate.clone(),
        virtual_type: field.ty.to_string(),
        backing_type: backing.ty.to_string(),
    };
    let output_type = field.ty.inner_named_type();
    let output = if context.is_virtual_type(output_type) {
        // Nested virtual types take their values from the backing field's object.
        let nested = context.engine_schema.get_object(output_type).zip(
            context
                .engine_schema
                .get_object(backing.ty.inner_named_type()),
        );
        match nested {
            Some((virtual_type, backing_type))
                if is_type_wrapping_valid(
                    &field.ty,
                    &backing.ty,
                    NadelTypeWrappingRule::LhsMustBeLooserOrSame,
                ) =>
            {
                validate_element(
                    context,
                    NadelServiceSchemaElement::VirtualType(NadelVirtualTypePair {
                        service: scope.service,
                        virtual_type,
                        backing_type,
                    }),
                )
            }
            _ => incompatible_output().into(),
        }
    } else if is_output_type_assignable(&field.ty, &backing.ty, output_type) {
        NadelSchemaValidationResult::ok()
    } else {
        incompatible_output().into()
    };

    NadelSchemaValidationResult::from(arguments).and(output)
}
