//! Error types emitted by the catchment CLI.
//!
//! Many helpers return `Result<_, CliError>`, so large payloads stay behind
//! their source errors rather than being copied into variants.

use std::sync::Arc;

use catchment_core::{BoundingBoxError, PipelineError};
use catchment_data::{CategoryFilterError, ClientBuildError, TileSetError};
use thiserror::Error;

/// Errors emitted by the catchment CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The bounding box could not be parsed or validated.
    #[error("invalid --bbox: {0}")]
    InvalidBoundingBox(#[source] BoundingBoxError),
    /// The travel profile is not one the routing service offers.
    #[error("invalid --profile: {message}")]
    InvalidProfile { message: String },
    /// The tile set name is unknown.
    #[error("invalid --tiles: {0}")]
    InvalidTiles(#[source] TileSetError),
    /// The category filter is malformed.
    #[error("invalid --category: {0}")]
    InvalidCategory(#[source] CategoryFilterError),
    /// A numeric option was zero or too large.
    #[error("--{field} must be between 1 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
    /// Constructing the Overpass client failed.
    #[error("failed to build Overpass client for {endpoint:?}: {source}")]
    BuildOverpassClient {
        endpoint: String,
        #[source]
        source: ClientBuildError,
    },
    /// Constructing the openrouteservice client failed.
    #[error("failed to build openrouteservice client for {base_url:?}: {source}")]
    BuildIsochroneProvider {
        base_url: String,
        #[source]
        source: ClientBuildError,
    },
    /// The pipeline aborted.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
