//! Walks every service's types against the overall schema.

use std::cell::RefCell;

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast::OperationType;
use apollo_compiler::schema::FieldDefinition;
use indexmap::IndexMap;
use indexmap::IndexSet;
use tracing::debug;
use tracing::trace;

use crate::config::NadelValidationConfig;
use crate::definition::NadelInstructionDefinitionRegistry;
use crate::directives::HIDDEN_DIRECTIVE_NAME;
use crate::directives::NAMESPACED_DIRECTIVE_NAME;
use crate::error::NadelSchemaValidationError;
use crate::instructions::NadelInstruction;
use crate::result::NadelSchemaValidationResult;
use crate::schema::NadelSchemas;
use crate::schema::NadelService;
use crate::schema::NadelServiceSchemaElement;
use crate::schema::NadelServiceSchemaElementRef;
use crate::schema::kind_name;

mod assignability;
mod enums;
mod field;
mod hydration;
mod input_object;
mod interface;
mod partition;
mod reachable;
mod rename;
mod stub;
mod types;
mod union;
mod virtual_type;
mod wrapping;

/// Validates [`NadelSchemas`] and derives the instructions of the execution engine.
pub struct NadelSchemaValidation<'a> {
    schemas: &'a NadelSchemas,
    config: NadelValidationConfig,
}

/// The outcome of [`NadelSchemaValidation::run`].
#[derive(Debug)]
pub struct NadelSchemaValidationRun {
    pub result: NadelSchemaValidationResult,
    /// Every element pair validated, in validation order. Each appears once.
    pub visited: Vec<NadelServiceSchemaElementRef>,
}

impl<'a> NadelSchemaValidation<'a> {
    pub fn new(schemas: &'a NadelSchemas) -> Self {
        Self {
            schemas,
            config: NadelValidationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: NadelValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validate(&self) -> NadelSchemaValidationResult {
        self.run().result
    }

    #[tracing::instrument(level = "debug", skip_all, name = "NadelSchemaValidation::run")]
    pub fn run(&self) -> NadelSchemaValidationRun {
        let engine_schema: &Schema = &self.schemas.engine_schema;
        let (definitions, malformed) = NadelInstructionDefinitionRegistry::build(engine_schema);
        let context = ValidationContext::new(
            engine_schema,
            &self.schemas.services,
            &definitions,
            &self.config,
        );

        let mut result = NadelSchemaValidationResult::from(malformed);
        for service in self.schemas.services.values() {
            if service.name == self.config.shared_service_name {
                debug!(service = %service.name, "skipping shared service");
                continue;
            }
            let service_result = types::validate_service(&context, service);
            debug!(
                service = %service.name,
                errors = service_result.errors().count(),
                instructions = service_result.instructions().count(),
                "validated service"
            );
            result.extend([service_result]);
        }

        NadelSchemaValidationRun {
            result,
            visited: context.visited.into_inner().into_iter().collect(),
        }
    }
}

/// State shared by every validator of one run.
pub(crate) struct ValidationContext<'a> {
    pub(crate) engine_schema: &'a Schema,
    pub(crate) services: &'a IndexMap<String, NadelService>,
    pub(crate) definitions: &'a NadelInstructionDefinitionRegistry,
    pub(crate) config: &'a NadelValidationConfig,
    /// Output types of `@namespaced` operation fields.
    namespace_types: IndexSet<Name>,
    visited: RefCell<IndexSet<NadelServiceSchemaElementRef>>,
}

impl<'a> ValidationContext<'a> {
    fn new(
        engine_schema: &'a Schema,
        services: &'a IndexMap<String, NadelService>,
        definitions: &'a NadelInstructionDefinitionRegistry,
        config: &'a NadelValidationConfig,
    ) -> Self {
        let namespace_types = [
            OperationType::Query,
            OperationType::Mutation,
            OperationType::Subscription,
        ]
        .into_iter()
        .filter_map(|operation| engine_schema.root_operation(operation))
        .filter_map(|root| engine_schema.get_object(root.as_str()))
        .flat_map(|root| root.fields.values())
        .filter(|field| field.directives.has(&NAMESPACED_DIRECTIVE_NAME))
        .map(|field| field.ty.inner_named_type().clone())
        .collect();

        Self {
            engine_schema,
            services,
            definitions,
            config,
            namespace_types,
            visited: RefCell::default(),
        }
    }

    pub(crate) fn is_operation_type(&self, type_name: &str) -> bool {
        self.operation_type(type_name).is_some()
    }

    pub(crate) fn operation_type(&self, type_name: &str) -> Option<OperationType> {
        [
            OperationType::Query,
            OperationType::Mutation,
            OperationType::Subscription,
        ]
        .into_iter()
        .find(|operation| {
            self.engine_schema
                .root_operation(*operation)
                .is_some_and(|root| root.as_str() == type_name)
        })
    }

    pub(crate) fn is_namespace_type(&self, type_name: &str) -> bool {
        self.namespace_types.contains(type_name)
    }

    /// Operation and namespace types are shared by every service, each owning some fields.
    pub(crate) fn is_shared_root(&self, type_name: &str) -> bool {
        self.is_operation_type(type_name) || self.is_namespace_type(type_name)
    }

    pub(crate) fn underlying_type_name<'n>(&'n self, overall_type_name: &'n Name) -> &'n Name {
        self.definitions.underlying_type_name(overall_type_name)
    }

    pub(crate) fn is_virtual_type(&self, type_name: &Name) -> bool {
        self.definitions.is_virtual_type(type_name)
    }

    /// Returns `false` if the pair was already validated.
    fn mark_visited(&self, element: &NadelServiceSchemaElement<'_>) -> bool {
        self.visited.borrow_mut().insert(element.to_ref())
    }
}

pub(crate) fn is_hidden(field: &FieldDefinition) -> bool {
    field.directives.has(&HIDDEN_DIRECTIVE_NAME)
}

/// Validates a pair of elements once per run. Later calls for the same pair are no-ops.
pub(crate) fn validate_element(
    context: &ValidationContext<'_>,
    element: NadelServiceSchemaElement<'_>,
) -> NadelSchemaValidationResult {
    if !context.mark_visited(&element) {
        return NadelSchemaValidationResult::ok();
    }
    trace!(
        service = %element.service().name,
        overall = %element.overall_name(),
        underlying = %element.underlying_name(),
        "validating element"
    );

    let type_rename = (element.overall_name() != element.underlying_name()
        && !matches!(
            element,
            NadelServiceSchemaElement::VirtualType(_) | NadelServiceSchemaElement::Incompatible { .. }
        ))
    .then(|| NadelInstruction::TypeRename {
        service: element.service().name.clone(),
        overall_name: element.overall_name().clone(),
        underlying_name: element.underlying_name().clone(),
    });

    let result = match element {
        NadelServiceSchemaElement::Object(pair) => types::validate_object(context, pair),
        NadelServiceSchemaElement::Interface(pair) => interface::validate(context, pair),
        NadelServiceSchemaElement::Union(pair) => union::validate(pair),
        NadelServiceSchemaElement::Enum(pair) => enums::validate(pair),
        NadelServiceSchemaElement::InputObject(pair) => input_object::validate(context, pair),
        NadelServiceSchemaElement::Scalar(_) => NadelSchemaValidationResult::ok(),
        NadelServiceSchemaElement::VirtualType(pair) => virtual_type::validate(context, pair),
        NadelServiceSchemaElement::Incompatible {
            service,
            overall,
            underlying,
        } => NadelSchemaValidationError::IncompatibleType {
            service: service.name.clone(),
            overall_type: overall.name().clone(),
            overall_kind: kind_name(overall),
            underlying_type: underlying.name().clone(),
            underlying_kind: kind_name(underlying),
        }
        .into(),
    };
    result.and(type_rename)
}
