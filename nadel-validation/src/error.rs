use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use apollo_compiler::Name;
use itertools::Itertools;
use strum_macros::IntoStaticStr;

use crate::schema::NadelSchemaCoordinate;

/// A problem with how the overall schema maps onto the underlying schemas.
///
/// Every variant carries the coordinates needed to find the offending schema element. The
/// `Display` output is a human-readable message; it is not stable and tools should match on the
/// variant (or [`NadelSchemaValidationError::code`]) instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, IntoStaticStr)]
pub enum NadelSchemaValidationError {
    // Schema shape
    #[error(
        "Could not find underlying type `{underlying_type}` for overall type `{overall_type}` in service `{service}`"
    )]
    MissingUnderlyingType {
        service: String,
        overall_type: Name,
        underlying_type: Name,
    },
    #[error(
        "Overall types {} all map to the same underlying type `{underlying_type}` in service `{service}`",
        join_names(.overall_types)
    )]
    DuplicatedUnderlyingType {
        service: String,
        underlying_type: Name,
        overall_types: Vec<Name>,
    },
    #[error(
        "Overall {overall_kind} `{overall_type}` is backed by {underlying_kind} `{underlying_type}` in service `{service}`, the kinds must match"
    )]
    IncompatibleType {
        service: String,
        overall_type: Name,
        overall_kind: &'static str,
        underlying_type: Name,
        underlying_kind: &'static str,
    },
    #[error(
        "Field `{coordinate}` does not exist on underlying type `{underlying_type}` in service `{service}`"
    )]
    MissingUnderlyingField {
        service: String,
        coordinate: NadelSchemaCoordinate,
        underlying_type: Name,
    },
    #[error(
        "Input field `{coordinate}` does not exist on underlying input type `{underlying_type}` in service `{service}`"
    )]
    MissingUnderlyingInputField {
        service: String,
        coordinate: NadelSchemaCoordinate,
        underlying_type: Name,
    },
    #[error(
        "Enum value `{value}` of `{overall_type}` does not exist on underlying enum `{underlying_type}` in service `{service}`"
    )]
    MissingUnderlyingEnumValue {
        service: String,
        overall_type: Name,
        underlying_type: Name,
        value: Name,
    },
    #[error(
        "Type `{overall_type}` implements `{interface}` but underlying type `{underlying_type}` in service `{service}` does not"
    )]
    MissingUnderlyingInterfaceImplementation {
        service: String,
        overall_type: Name,
        underlying_type: Name,
        interface: Name,
    },
    #[error(
        "Argument `{argument}` of `{coordinate}` does not exist on the underlying field in service `{service}`"
    )]
    MissingArgumentOnUnderlying {
        service: String,
        coordinate: NadelSchemaCoordinate,
        argument: Name,
    },
    #[error(
        "Namespaced field `{coordinate}` must return an object type but returns `{output_type}`"
    )]
    NamespacedTypeMustBeObject {
        service: String,
        coordinate: NadelSchemaCoordinate,
        output_type: String,
    },
    #[error("Every field of `{overall_type}` in service `{service}` is marked @hidden")]
    AllFieldsUsingHiddenDirective { service: String, overall_type: Name },

    // Type compatibility
    #[error(
        "Field `{coordinate}` has output type `{overall_type}` which is not compatible with underlying type `{underlying_type}` in service `{service}`"
    )]
    IncompatibleFieldOutputType {
        service: String,
        coordinate: NadelSchemaCoordinate,
        overall_type: String,
        underlying_type: String,
    },
    #[error(
        "Argument `{argument}` of `{coordinate}` has type `{overall_type}` which is not compatible with underlying type `{underlying_type}` in service `{service}`"
    )]
    IncompatibleArgumentInputType {
        service: String,
        coordinate: NadelSchemaCoordinate,
        argument: Name,
        overall_type: String,
        underlying_type: String,
    },
    #[error(
        "Input field `{coordinate}` has type `{overall_type}` which is not compatible with underlying type `{underlying_type}` in service `{service}`"
    )]
    IncompatibleInputFieldType {
        service: String,
        coordinate: NadelSchemaCoordinate,
        overall_type: String,
        underlying_type: String,
    },

    // Renames
    #[error(
        "Field `{coordinate}` is renamed from `{rename}` but that field does not exist in service `{service}`"
    )]
    MissingRename {
        service: String,
        coordinate: NadelSchemaCoordinate,
        rename: String,
    },
    #[error("Field `{coordinate}` cannot be both @renamed and @hydrated")]
    CannotRenameHydratedField {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },
    #[error("Field `{coordinate}` cannot be both @renamed and @partition")]
    CannotRenamePartitionedField {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },
    #[error("Field `{coordinate}` cannot be both @hydrated and @partition")]
    CannotPartitionHydratedField {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },

    // Stubs
    #[error("Field `{coordinate}` is @stubbed so its output type `{output_type}` must be nullable")]
    StubbedFieldMustBeNullable {
        service: String,
        coordinate: NadelSchemaCoordinate,
        output_type: String,
    },
    #[error("Field `{coordinate}` is @stubbed and cannot also use @{directive}")]
    CannotStubField {
        service: String,
        coordinate: NadelSchemaCoordinate,
        directive: Name,
    },

    // Hydration
    #[error("Hydrated field `{coordinate}` references actor service `{actor_service}` which does not exist")]
    MissingHydrationActorService {
        service: String,
        coordinate: NadelSchemaCoordinate,
        actor_service: String,
    },
    #[error("Hydrated field `{coordinate}` references actor field `{actor_field}` which does not exist")]
    MissingHydrationActorField {
        service: String,
        coordinate: NadelSchemaCoordinate,
        actor_field: String,
    },
    #[error(
        "Hydrated field `{coordinate}` binds argument `{argument}` which does not exist on actor field `{actor_field}`"
    )]
    NonExistentHydrationActorFieldArgument {
        service: String,
        coordinate: NadelSchemaCoordinate,
        actor_field: String,
        argument: Name,
    },
    #[error("Hydrated field `{coordinate}` binds argument `{argument}` more than once")]
    DuplicatedHydrationArgument {
        service: String,
        coordinate: NadelSchemaCoordinate,
        argument: Name,
    },
    #[error(
        "Hydrated field `{coordinate}` does not bind required argument `{argument}` of actor field `{actor_field}`"
    )]
    MissingRequiredHydrationActorFieldArgument {
        service: String,
        coordinate: NadelSchemaCoordinate,
        actor_field: String,
        argument: Name,
    },
    #[error(
        "Hydrated field `{coordinate}` reads `$source.{source_path}` which does not exist on `{source_type}`"
    )]
    MissingHydrationFieldValueSource {
        service: String,
        coordinate: NadelSchemaCoordinate,
        source_path: String,
        source_type: Name,
    },
    #[error("Hydrated field `{coordinate}` reads `$argument.{argument}` which is not an argument of the field")]
    MissingHydrationArgumentValueSource {
        service: String,
        coordinate: NadelSchemaCoordinate,
        argument: Name,
    },
    #[error(
        "Hydrated field `{coordinate}` supplies `{supplied_type}` to actor argument `{argument}` of type `{actor_argument_type}`"
    )]
    IncompatibleHydrationArgumentType {
        service: String,
        coordinate: NadelSchemaCoordinate,
        argument: Name,
        supplied_type: String,
        actor_argument_type: String,
    },
    #[error(
        "Hydrated field `{coordinate}` supplies an object to actor argument `{argument}` but it has no field for required input field `{input_type}.{input_field}`"
    )]
    MissingFieldInHydratedInputObject {
        service: String,
        coordinate: NadelSchemaCoordinate,
        argument: Name,
        input_type: Name,
        input_field: Name,
    },
    #[error(
        "Hydrated field `{coordinate}` supplies an object to actor argument `{argument}` whose field `{input_field}` is not compatible with `{input_type}.{input_field}`"
    )]
    IncompatibleFieldInHydratedInputObject {
        service: String,
        coordinate: NadelSchemaCoordinate,
        argument: Name,
        input_type: Name,
        input_field: Name,
    },
    #[error(
        "Hydrated field `{coordinate}` cannot return `{actor_output_type}` produced by actor field `{actor_field}`"
    )]
    HydrationIncompatibleOutputType {
        service: String,
        coordinate: NadelSchemaCoordinate,
        actor_field: String,
        actor_output_type: Name,
    },
    #[error("Hydrated field `{coordinate}` must be nullable")]
    HydrationFieldMustBeNullable {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },
    #[error("Field `{coordinate}` declares multiple hydrations so it must return a union")]
    FieldWithPolymorphicHydrationMustReturnAUnion {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },
    #[error("Field `{coordinate}` mixes batched and non-batched hydrations")]
    HydrationsMismatch {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },
    #[error("Batch hydration of `{coordinate}` via `{actor_field}` does not read any `$source` value")]
    NoSourceArgsInBatchHydration {
        service: String,
        coordinate: NadelSchemaCoordinate,
        actor_field: String,
    },
    #[error("Batch hydration of `{coordinate}` via `{actor_field}` reads more than one `$source` value")]
    MultipleSourceArgsInBatchHydration {
        service: String,
        coordinate: NadelSchemaCoordinate,
        actor_field: String,
    },
    #[error(
        "Batch hydration of `{coordinate}` via `{actor_field}` must declare `identifiedBy` or be `indexed`"
    )]
    BatchHydrationMissingIdentifiedBy {
        service: String,
        coordinate: NadelSchemaCoordinate,
        actor_field: String,
    },
    #[error("Hydration condition of `{coordinate}` reads `{source_field}` which does not exist")]
    HydrationConditionSourceFieldDoesNotExist {
        service: String,
        coordinate: NadelSchemaCoordinate,
        source_field: String,
    },
    #[error(
        "Hydration condition of `{coordinate}` reads `{source_field}` of type `{source_field_type}`, only String, Int and ID are supported"
    )]
    HydrationConditionUnsupportedFieldType {
        service: String,
        coordinate: NadelSchemaCoordinate,
        source_field: String,
        source_field_type: String,
    },
    #[error(
        "Hydration condition of `{coordinate}` uses a `{predicate}` value that does not match `{source_field}` of type `{source_field_type}`"
    )]
    HydrationConditionPredicateDoesNotMatchSourceFieldType {
        service: String,
        coordinate: NadelSchemaCoordinate,
        source_field: String,
        source_field_type: String,
        predicate: &'static str,
    },
    #[error(
        "Hydration condition of `{coordinate}` uses `{predicate}` which requires a String or ID source field but `{source_field}` is `{source_field_type}`"
    )]
    HydrationConditionPredicateRequiresStringSourceField {
        service: String,
        coordinate: NadelSchemaCoordinate,
        source_field: String,
        source_field_type: String,
        predicate: &'static str,
    },
    #[error("Hydration condition of `{coordinate}` has an invalid `matches` pattern `{pattern}`: {message}")]
    HydrationConditionInvalidRegex {
        service: String,
        coordinate: NadelSchemaCoordinate,
        pattern: String,
        message: String,
    },
    #[error("Some hydrations of `{coordinate}` declare a condition and some do not")]
    SomeHydrationsHaveMissingConditions {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },

    // Partition
    #[error("Field `{coordinate}` is a subscription field and cannot use @partition")]
    PartitionAppliedToSubscriptionField {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },
    #[error(
        "Field `{coordinate}` cannot use @partition, only fields of operation or namespace types can"
    )]
    PartitionAppliedToUnsupportedField {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },
    #[error(
        "Field `{coordinate}` returns `{output_type}` which is neither a list nor a mutation payload so it cannot use @partition"
    )]
    PartitionAppliedToFieldWithUnsupportedOutputType {
        service: String,
        coordinate: NadelSchemaCoordinate,
        output_type: String,
    },
    #[error("Field `{coordinate}` declares pathToPartitionArg `{path}` which does not resolve to a list")]
    InvalidPartitionArgument {
        service: String,
        coordinate: NadelSchemaCoordinate,
        path: String,
    },

    // Virtual types
    #[error("Field `{coordinate}` of virtual type cannot be @renamed")]
    VirtualTypeRenamedField {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },
    #[error("Virtual field `{coordinate}` has no counterpart on backing type `{backing_type}`")]
    VirtualTypeMissingBackingField {
        service: String,
        coordinate: NadelSchemaCoordinate,
        backing_type: Name,
    },
    #[error(
        "Virtual field `{coordinate}` has type `{virtual_type}` which is not compatible with `{backing_type}` on the backing type"
    )]
    VirtualTypeIncompatibleFieldOutputType {
        service: String,
        coordinate: NadelSchemaCoordinate,
        virtual_type: String,
        backing_type: String,
    },
    #[error(
        "Argument `{argument}` of virtual field `{coordinate}` does not exist on the backing field"
    )]
    VirtualTypeMissingBackingFieldArgument {
        service: String,
        coordinate: NadelSchemaCoordinate,
        argument: Name,
    },
    #[error(
        "Argument `{argument}` of virtual field `{coordinate}` has type `{virtual_type}` which is not compatible with backing type `{backing_type}`"
    )]
    VirtualTypeIncompatibleFieldArgument {
        service: String,
        coordinate: NadelSchemaCoordinate,
        argument: Name,
        virtual_type: String,
        backing_type: String,
    },
    #[error(
        "Virtual type `{virtual_type}` implements `{interface}` but backing type `{backing_type}` does not"
    )]
    VirtualTypeMissingInterface {
        service: String,
        virtual_type: Name,
        backing_type: Name,
        interface: Name,
    },

    // Directive applications
    #[error("Invalid @{directive} on `{coordinate}`: {message}")]
    MalformedDirective {
        coordinate: NadelSchemaCoordinate,
        directive: Name,
        message: String,
    },
}

impl NadelSchemaValidationError {
    /// The variant name, e.g. `MissingUnderlyingType`.
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

fn join_names(names: &[Name]) -> String {
    names.iter().map(|name| format!("`{name}`")).join(", ")
}

/// Every error found by a validation run, in traversal order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NadelSchemaValidationErrors {
    pub errors: Vec<NadelSchemaValidationError>,
}

impl NadelSchemaValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &NadelSchemaValidationError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Display for NadelSchemaValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}] {error}", error.code())?;
        }
        Ok(())
    }
}

impl std::error::Error for NadelSchemaValidationErrors {}

/// Failure to assemble [`crate::NadelSchemas`] from SDL.
#[derive(Debug, thiserror::Error)]
pub enum NadelSchemasError {
    #[error("Service `{service}` is declared more than once")]
    DuplicatedService { service: String },
    #[error("Invalid overall definition for service `{service}`: {message}")]
    InvalidServiceDefinition { service: String, message: String },
    #[error("Invalid underlying schema for service `{service}`: {message}")]
    InvalidUnderlyingSchema { service: String, message: String },
    #[error("Invalid overall schema: {message}")]
    InvalidOverallSchema { message: String },
}
