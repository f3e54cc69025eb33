//! Instructions derived from a valid overall schema, consumed by the execution engine.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use apollo_compiler::Name;
use indexmap::IndexMap;
use itertools::Itertools;

use crate::definition::NadelHydrationArgumentDefinition;
use crate::definition::NadelHydrationCondition;
use crate::schema::NadelSchemaCoordinate;
use crate::schema::coordinates::display_path;

#[derive(Clone, Debug, PartialEq)]
pub enum NadelInstruction {
    /// The overall type is called something else in the service.
    TypeRename {
        service: String,
        overall_name: Name,
        underlying_name: Name,
    },
    /// The overall field reads a differently named underlying field.
    FieldRename {
        service: String,
        coordinate: NadelSchemaCoordinate,
        underlying_name: Name,
    },
    /// The overall field reads a field nested below the underlying parent.
    DeepRename {
        service: String,
        coordinate: NadelSchemaCoordinate,
        path: Vec<Name>,
    },
    Stub {
        service: String,
        coordinate: NadelSchemaCoordinate,
    },
    Hydration {
        service: String,
        coordinate: NadelSchemaCoordinate,
        hydration: NadelHydrationInstruction,
    },
    Partition {
        service: String,
        coordinate: NadelSchemaCoordinate,
        path_to_partition_arg: Vec<Name>,
    },
    VirtualType {
        service: String,
        virtual_type: Name,
        backing_type: Name,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct NadelHydrationInstruction {
    pub actor_service: String,
    pub actor_field_path: Vec<Name>,
    pub arguments: Vec<NadelHydrationArgumentDefinition>,
    pub identified_by: Option<String>,
    pub is_indexed: bool,
    pub is_batched: bool,
    pub batch_size: u32,
    /// Passed through to the execution engine, never enforced here.
    pub timeout: Option<i32>,
    pub condition: Option<NadelHydrationCondition>,
}

impl NadelInstruction {
    pub fn service(&self) -> &str {
        match self {
            Self::TypeRename { service, .. }
            | Self::FieldRename { service, .. }
            | Self::DeepRename { service, .. }
            | Self::Stub { service, .. }
            | Self::Hydration { service, .. }
            | Self::Partition { service, .. }
            | Self::VirtualType { service, .. } => service,
        }
    }

    /// The overall schema element the instruction applies to.
    pub fn coordinate(&self) -> NadelSchemaCoordinate {
        match self {
            Self::TypeRename { overall_name, .. } => {
                NadelSchemaCoordinate::for_type(overall_name.clone())
            }
            Self::VirtualType { virtual_type, .. } => {
                NadelSchemaCoordinate::for_type(virtual_type.clone())
            }
            Self::FieldRename { coordinate, .. }
            | Self::DeepRename { coordinate, .. }
            | Self::Stub { coordinate, .. }
            | Self::Hydration { coordinate, .. }
            | Self::Partition { coordinate, .. } => coordinate.clone(),
        }
    }
}

impl Display for NadelInstruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeRename {
                service,
                overall_name,
                underlying_name,
            } => write!(f, "[{service}] rename type {overall_name} <- {underlying_name}"),
            Self::FieldRename {
                service,
                coordinate,
                underlying_name,
            } => write!(f, "[{service}] rename field {coordinate} <- {underlying_name}"),
            Self::DeepRename {
                service,
                coordinate,
                path,
            } => write!(
                f,
                "[{service}] deep rename field {coordinate} <- {}",
                display_path(path)
            ),
            Self::Stub {
                service,
                coordinate,
            } => write!(f, "[{service}] stub field {coordinate}"),
            Self::Hydration {
                service,
                coordinate,
                hydration,
            } => write!(
                f,
                "[{service}] hydrate field {coordinate} from {}:{}({}){}",
                hydration.actor_service,
                display_path(&hydration.actor_field_path),
                hydration
                    .arguments
                    .iter()
                    .map(|argument| argument.to_string())
                    .join(", "),
                if hydration.is_batched {
                    format!(" batched by {}", hydration.batch_size)
                } else {
                    String::new()
                }
            ),
            Self::Partition {
                service,
                coordinate,
                path_to_partition_arg,
            } => write!(
                f,
                "[{service}] partition field {coordinate} by {}",
                display_path(path_to_partition_arg)
            ),
            Self::VirtualType {
                service,
                virtual_type,
                backing_type,
            } => write!(f, "[{service}] virtual type {virtual_type} backed by {backing_type}"),
        }
    }
}

/// The instructions of a valid schema, grouped by the overall schema element they apply to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NadelInstructions {
    by_coordinate: IndexMap<NadelSchemaCoordinate, Vec<NadelInstruction>>,
}

impl NadelInstructions {
    pub fn get(&self, coordinate: &NadelSchemaCoordinate) -> &[NadelInstruction] {
        self.by_coordinate
            .get(coordinate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NadelInstruction> {
        self.by_coordinate.values().flatten()
    }

    pub fn for_service<'a>(
        &'a self,
        service: &'a str,
    ) -> impl Iterator<Item = &'a NadelInstruction> + 'a {
        self.iter()
            .filter(move |instruction| instruction.service() == service)
    }

    pub fn len(&self) -> usize {
        self.by_coordinate.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_coordinate.is_empty()
    }
}

impl FromIterator<NadelInstruction> for NadelInstructions {
    fn from_iter<T: IntoIterator<Item = NadelInstruction>>(iter: T) -> Self {
        let mut by_coordinate: IndexMap<NadelSchemaCoordinate, Vec<NadelInstruction>> =
            IndexMap::new();
        for instruction in iter {
            by_coordinate
                .entry(instruction.coordinate())
                .or_default()
                .push(instruction);
        }
        Self { by_coordinate }
    }
}
