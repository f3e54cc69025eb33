//! The schemas being validated: the overall schema, every service and pairs of their elements.

use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use apollo_compiler::schema::Component;
use apollo_compiler::schema::EnumType;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::FieldDefinition;
use apollo_compiler::schema::InputObjectType;
use apollo_compiler::schema::InterfaceType;
use apollo_compiler::schema::ObjectType;
use apollo_compiler::schema::ScalarType;
use apollo_compiler::schema::UnionType;
use apollo_compiler::validation::Valid;
use indexmap::IndexMap;
use indexmap::IndexSet;

use crate::directives::NADEL_DIRECTIVE_DEFINITIONS;
use crate::error::NadelSchemasError;

pub(crate) mod coordinates;

pub use coordinates::NadelSchemaCoordinate;

/// One backing service: its contribution to the overall schema and its own schema.
pub struct NadelService {
    pub name: String,
    /// The SDL this service contributes to the overall schema.
    pub definition: ast::Document,
    pub underlying_schema: Valid<Schema>,
}

impl Debug for NadelService {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "NadelService {{ name: {} }}", self.name)
    }
}

impl NadelService {
    pub fn new(
        name: impl Into<String>,
        definition: ast::Document,
        underlying_schema: Valid<Schema>,
    ) -> Self {
        Self {
            name: name.into(),
            definition,
            underlying_schema,
        }
    }

    /// Names of the types this service's definition declares, with whether the declaration is
    /// an extension.
    pub(crate) fn type_definition_names(&self) -> impl Iterator<Item = (&Name, bool)> {
        self.definition
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                ast::Definition::ObjectTypeDefinition(def) => Some((&def.name, false)),
                ast::Definition::InterfaceTypeDefinition(def) => Some((&def.name, false)),
                ast::Definition::UnionTypeDefinition(def) => Some((&def.name, false)),
                ast::Definition::EnumTypeDefinition(def) => Some((&def.name, false)),
                ast::Definition::InputObjectTypeDefinition(def) => Some((&def.name, false)),
                ast::Definition::ScalarTypeDefinition(def) => Some((&def.name, false)),
                ast::Definition::ObjectTypeExtension(ext) => Some((&ext.name, true)),
                ast::Definition::InterfaceTypeExtension(ext) => Some((&ext.name, true)),
                ast::Definition::UnionTypeExtension(ext) => Some((&ext.name, true)),
                ast::Definition::EnumTypeExtension(ext) => Some((&ext.name, true)),
                ast::Definition::InputObjectTypeExtension(ext) => Some((&ext.name, true)),
                ast::Definition::ScalarTypeExtension(ext) => Some((&ext.name, true)),
                _ => None,
            })
    }

    /// Fields this service's definition declares on the given object or interface type, across
    /// definitions and extensions.
    pub(crate) fn declared_fields(&self, type_name: &str) -> IndexSet<&Name> {
        self.definition
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                ast::Definition::ObjectTypeDefinition(def) if def.name == type_name => {
                    Some(&def.fields)
                }
                ast::Definition::ObjectTypeExtension(ext) if ext.name == type_name => {
                    Some(&ext.fields)
                }
                ast::Definition::InterfaceTypeDefinition(def) if def.name == type_name => {
                    Some(&def.fields)
                }
                ast::Definition::InterfaceTypeExtension(ext) if ext.name == type_name => {
                    Some(&ext.fields)
                }
                _ => None,
            })
            .flatten()
            .map(|field| &field.name)
            .collect()
    }

    pub(crate) fn declares_field(&self, type_name: &str, field_name: &str) -> bool {
        self.declared_fields(type_name)
            .iter()
            .any(|name| name.as_str() == field_name)
    }
}

/// The overall schema together with every service stitched into it.
#[derive(Debug)]
pub struct NadelSchemas {
    pub engine_schema: Valid<Schema>,
    pub services: IndexMap<String, NadelService>,
}

impl NadelSchemas {
    pub fn new(engine_schema: Valid<Schema>, services: impl IntoIterator<Item = NadelService>) -> Self {
        Self {
            engine_schema,
            services: services
                .into_iter()
                .map(|service| (service.name.clone(), service))
                .collect(),
        }
    }

    pub fn builder() -> NadelSchemasBuilder {
        NadelSchemasBuilder::default()
    }
}

/// Assembles [`NadelSchemas`] from SDL.
///
/// The overall schema is the union of every service's overall SDL plus
/// [`NADEL_DIRECTIVE_DEFINITIONS`].
#[derive(Default)]
pub struct NadelSchemasBuilder {
    services: Vec<ServiceSource>,
}

struct ServiceSource {
    name: String,
    overall_sdl: String,
    underlying_sdl: String,
}

impl NadelSchemasBuilder {
    pub fn service(
        mut self,
        name: impl Into<String>,
        overall_sdl: impl Into<String>,
        underlying_sdl: impl Into<String>,
    ) -> Self {
        self.services.push(ServiceSource {
            name: name.into(),
            overall_sdl: overall_sdl.into(),
            underlying_sdl: underlying_sdl.into(),
        });
        self
    }

    pub fn build(self) -> Result<NadelSchemas, NadelSchemasError> {
        let mut engine_builder = Schema::builder()
            .adopt_orphan_extensions()
            .parse(NADEL_DIRECTIVE_DEFINITIONS, "nadel_directives.graphqls");
        let mut services = IndexMap::new();

        for source in self.services {
            if services.contains_key(&source.name) {
                return Err(NadelSchemasError::DuplicatedService {
                    service: source.name,
                });
            }
            let overall_path = format!("{}/overall.graphqls", source.name);
            let underlying_path = format!("{}/underlying.graphqls", source.name);

            let definition = ast::Document::parse(source.overall_sdl.as_str(), &overall_path)
                .map_err(|e| NadelSchemasError::InvalidServiceDefinition {
                    service: source.name.clone(),
                    message: e.errors.to_string(),
                })?;
            engine_builder = engine_builder.parse(source.overall_sdl, &overall_path);

            let underlying_schema = Schema::builder()
                .adopt_orphan_extensions()
                .parse(source.underlying_sdl, &underlying_path)
                .build()
                .and_then(Schema::validate)
                .map_err(|e| NadelSchemasError::InvalidUnderlyingSchema {
                    service: source.name.clone(),
                    message: e.errors.to_string(),
                })?;

            services.insert(
                source.name.clone(),
                NadelService::new(source.name, definition, underlying_schema),
            );
        }

        let engine_schema = engine_builder
            .build()
            .and_then(Schema::validate)
            .map_err(|e| NadelSchemasError::InvalidOverallSchema {
                message: e.errors.to_string(),
            })?;

        Ok(NadelSchemas {
            engine_schema,
            services,
        })
    }
}

/// An object or interface type: anything with output fields.
#[derive(Clone, Copy)]
pub(crate) enum NadelFieldsContainer<'a> {
    Object(&'a Node<ObjectType>),
    Interface(&'a Node<InterfaceType>),
}

impl<'a> NadelFieldsContainer<'a> {
    pub(crate) fn from_type(ty: &'a ExtendedType) -> Option<Self> {
        match ty {
            ExtendedType::Object(object) => Some(Self::Object(object)),
            ExtendedType::Interface(interface) => Some(Self::Interface(interface)),
            _ => None,
        }
    }

    pub(crate) fn lookup(schema: &'a Schema, type_name: &str) -> Option<Self> {
        schema.types.get(type_name).and_then(Self::from_type)
    }

    pub(crate) fn name(&self) -> &'a Name {
        match self {
            Self::Object(object) => &object.name,
            Self::Interface(interface) => &interface.name,
        }
    }

    pub(crate) fn fields(&self) -> impl Iterator<Item = &'a Component<FieldDefinition>> + use<'a> {
        match *self {
            Self::Object(object) => object.fields.values(),
            Self::Interface(interface) => interface.fields.values(),
        }
    }

    pub(crate) fn field(&self, name: &str) -> Option<&'a Component<FieldDefinition>> {
        match *self {
            Self::Object(object) => object.fields.get(name),
            Self::Interface(interface) => interface.fields.get(name),
        }
    }
}

/// The same element in the overall schema and in a service's underlying schema.
pub struct NadelElementPair<'a, T> {
    pub service: &'a NadelService,
    pub overall: &'a Node<T>,
    pub underlying: &'a Node<T>,
}

impl<T> Clone for NadelElementPair<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NadelElementPair<'_, T> {}

/// An overall-only object type and the type it takes its values from.
#[derive(Clone, Copy)]
pub struct NadelVirtualTypePair<'a> {
    pub service: &'a NadelService,
    pub virtual_type: &'a Node<ObjectType>,
    pub backing_type: &'a Node<ObjectType>,
}

/// Pairs an overall schema element with its counterpart, tagged by the kind both share.
#[derive(Clone, Copy)]
pub enum NadelServiceSchemaElement<'a> {
    Object(NadelElementPair<'a, ObjectType>),
    Interface(NadelElementPair<'a, InterfaceType>),
    Union(NadelElementPair<'a, UnionType>),
    Enum(NadelElementPair<'a, EnumType>),
    Scalar(NadelElementPair<'a, ScalarType>),
    InputObject(NadelElementPair<'a, InputObjectType>),
    VirtualType(NadelVirtualTypePair<'a>),
    /// The overall and underlying types are of different kinds.
    Incompatible {
        service: &'a NadelService,
        overall: &'a ExtendedType,
        underlying: &'a ExtendedType,
    },
}

impl<'a> NadelServiceSchemaElement<'a> {
    pub fn new(
        service: &'a NadelService,
        overall: &'a ExtendedType,
        underlying: &'a ExtendedType,
    ) -> Self {
        match (overall, underlying) {
            (ExtendedType::Object(overall), ExtendedType::Object(underlying)) => {
                Self::Object(NadelElementPair {
                    service,
                    overall,
                    underlying,
                })
            }
            (ExtendedType::Interface(overall), ExtendedType::Interface(underlying)) => {
                Self::Interface(NadelElementPair {
                    service,
                    overall,
                    underlying,
                })
            }
            (ExtendedType::Union(overall), ExtendedType::Union(underlying)) => {
                Self::Union(NadelElementPair {
                    service,
                    overall,
                    underlying,
                })
            }
            (ExtendedType::Enum(overall), ExtendedType::Enum(underlying)) => {
                Self::Enum(NadelElementPair {
                    service,
                    overall,
                    underlying,
                })
            }
            (ExtendedType::Scalar(overall), ExtendedType::Scalar(underlying)) => {
                Self::Scalar(NadelElementPair {
                    service,
                    overall,
                    underlying,
                })
            }
            (ExtendedType::InputObject(overall), ExtendedType::InputObject(underlying)) => {
                Self::InputObject(NadelElementPair {
                    service,
                    overall,
                    underlying,
                })
            }
            _ => Self::Incompatible {
                service,
                overall,
                underlying,
            },
        }
    }

    pub fn service(&self) -> &'a NadelService {
        match self {
            Self::Object(pair) => pair.service,
            Self::Interface(pair) => pair.service,
            Self::Union(pair) => pair.service,
            Self::Enum(pair) => pair.service,
            Self::Scalar(pair) => pair.service,
            Self::InputObject(pair) => pair.service,
            Self::VirtualType(pair) => pair.service,
            Self::Incompatible { service, .. } => service,
        }
    }

    pub fn overall_name(&self) -> &'a Name {
        match self {
            Self::Object(pair) => &pair.overall.name,
            Self::Interface(pair) => &pair.overall.name,
            Self::Union(pair) => &pair.overall.name,
            Self::Enum(pair) => &pair.overall.name,
            Self::Scalar(pair) => &pair.overall.name,
            Self::InputObject(pair) => &pair.overall.name,
            Self::VirtualType(pair) => &pair.virtual_type.name,
            Self::Incompatible { overall, .. } => overall.name(),
        }
    }

    /// The name of the underlying type, or of the backing type for virtual types.
    pub fn underlying_name(&self) -> &'a Name {
        match self {
            Self::Object(pair) => &pair.underlying.name,
            Self::Interface(pair) => &pair.underlying.name,
            Self::Union(pair) => &pair.underlying.name,
            Self::Enum(pair) => &pair.underlying.name,
            Self::Scalar(pair) => &pair.underlying.name,
            Self::InputObject(pair) => &pair.underlying.name,
            Self::VirtualType(pair) => &pair.backing_type.name,
            Self::Incompatible { underlying, .. } => underlying.name(),
        }
    }

    pub fn to_ref(&self) -> NadelServiceSchemaElementRef {
        NadelServiceSchemaElementRef {
            service: self.service().name.clone(),
            overall: self.overall_name().clone(),
            underlying: self.underlying_name().clone(),
        }
    }
}

/// Value identity of a [`NadelServiceSchemaElement`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NadelServiceSchemaElementRef {
    pub service: String,
    pub overall: Name,
    pub underlying: Name,
}

pub(crate) fn kind_name(ty: &ExtendedType) -> &'static str {
    match ty {
        ExtendedType::Scalar(_) => "scalar",
        ExtendedType::Object(_) => "object",
        ExtendedType::Interface(_) => "interface",
        ExtendedType::Union(_) => "union",
        ExtendedType::Enum(_) => "enum",
        ExtendedType::InputObject(_) => "input object",
    }
}
