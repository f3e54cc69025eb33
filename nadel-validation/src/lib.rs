//! Validation of Nadel overall schemas.
//!
//! Nadel serves one overall GraphQL schema stitched together from many services. Each service
//! contributes part of the overall schema and exposes its own underlying schema. This crate
//! checks that every part of the overall schema can be served from the underlying schemas, and
//! derives the instructions the execution engine needs to do so: type and field renames,
//! hydrations, stubs, partitions and virtual types.
//!
//! ## Usage
//!
//! Build [`NadelSchemas`] with [`NadelSchemas::builder`], then run
//! [`NadelSchemaValidation::validate`]. The result holds every error found, or when there are
//! none, the instructions. [`NadelSchemaValidationResult::into_blueprint`] splits the two.

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]

pub mod config;
pub mod definition;
pub mod directives;
pub mod error;
pub mod instructions;
pub mod result;
pub mod schema;
mod validation;

pub use crate::config::NadelValidationConfig;
pub use crate::error::NadelSchemaValidationError;
pub use crate::error::NadelSchemaValidationErrors;
pub use crate::error::NadelSchemasError;
pub use crate::instructions::NadelInstruction;
pub use crate::instructions::NadelInstructions;
pub use crate::result::NadelSchemaValidationResult;
pub use crate::schema::NadelSchemaCoordinate;
pub use crate::schema::NadelSchemas;
pub use crate::schema::NadelService;
pub use crate::validation::NadelSchemaValidation;
pub use crate::validation::NadelSchemaValidationRun;
