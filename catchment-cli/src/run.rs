//! `run` command implementation: configuration, service wiring and the
//! pipeline invocation.

use std::num::NonZeroUsize;
use std::time::Duration;

use camino::Utf8PathBuf;
use catchment_core::{
    BorderNodeLookup, BoundingBox, DEFAULT_BATCH_SIZE, ElementSource, IsochroneProvider, Pipeline,
    PipelineConfig, RenderSink, RunReport, Throttle, TravelProfile,
};
use catchment_data::{
    CategoryFilter, ChainPalette, DEFAULT_ORS_URL, DEFAULT_OVERPASS_URL, LeafletMap,
    LeafletMapConfig, OrsConfig, OrsIsochroneProvider, OverpassClient, OverpassConfig, TileSet,
};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BATCH_SIZE, ARG_BBOX, ARG_CATEGORY, ARG_CHAIN, ARG_COLOUR, ARG_MINUTES, ARG_NO_THROTTLE,
    ARG_ORS_API_KEY, ARG_ORS_BASE_URL, ARG_OUTPUT, ARG_OVERPASS_URL, ARG_PROFILE, ARG_TILES,
    CliError, ENV_BBOX, ENV_CHAIN, ENV_ORS_API_KEY,
};

pub(crate) const DEFAULT_MINUTES: u64 = 3;
pub(crate) const MAX_MINUTES: u64 = 24 * 60;
pub(crate) const MAX_BATCH_SIZE: u64 = 1_000;
pub(crate) const DEFAULT_OUTPUT: &str = "catchment.html";

/// CLI arguments for the `run` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "run",
    long_about = "Fetch every outlet of the named chains inside a bounding \
                 box from OpenStreetMap, compute a travel-time isochrone for \
                 each through openrouteservice and write a Leaflet map. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Map outlet catchments inside a bounding box"
)]
#[ortho_config(prefix = "CATCHMENT")]
pub(crate) struct RunArgs {
    /// Search region as `south,west,north,east` in degrees.
    #[arg(long = ARG_BBOX, value_name = "s,w,n,e", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) bbox: Option<String>,
    /// Chain name to match (case-insensitive substring); repeatable.
    #[arg(long = ARG_CHAIN, value_name = "name")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) chain: Vec<String>,
    /// Display colour, paired with `--chain` by position; repeatable.
    #[arg(long = ARG_COLOUR, value_name = "colour")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) colour: Vec<String>,
    /// Travel profile (driving-car, foot-walking, cycling-regular, wheelchair).
    #[arg(long = ARG_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Travel-time budget in minutes.
    #[arg(long = ARG_MINUTES, value_name = "minutes")]
    #[serde(default)]
    pub(crate) minutes: Option<u64>,
    /// Send isochrone requests back to back.
    #[arg(long = ARG_NO_THROTTLE)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) no_throttle: bool,
    /// Border nodes per Overpass lookup.
    #[arg(long = ARG_BATCH_SIZE, value_name = "count")]
    #[serde(default)]
    pub(crate) batch_size: Option<u64>,
    /// openrouteservice API key.
    #[arg(long = ARG_ORS_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) ors_api_key: Option<String>,
    /// openrouteservice API root.
    #[arg(long = ARG_ORS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) ors_base_url: Option<String>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Element category as `key=value`.
    #[arg(long = ARG_CATEGORY, value_name = "key=value")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Background tiles (openstreetmap, toner).
    #[arg(long = ARG_TILES, value_name = "tiles")]
    #[serde(default)]
    pub(crate) tiles: Option<String>,
    /// Destination HTML file.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl RunArgs {
    pub(crate) fn into_config(self) -> Result<RunConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RunConfig::try_from(merged)
    }
}

/// Resolved `run` command configuration.
#[derive(Clone, PartialEq)]
pub(crate) struct RunConfig {
    pub(crate) bbox: BoundingBox,
    pub(crate) pipeline: PipelineConfig,
    pub(crate) palette: ChainPalette,
    pub(crate) tiles: TileSet,
    pub(crate) output: Utf8PathBuf,
    pub(crate) category: CategoryFilter,
    pub(crate) overpass_url: String,
    pub(crate) ors_base_url: String,
    pub(crate) ors_api_key: String,
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("bbox", &self.bbox)
            .field("pipeline", &self.pipeline)
            .field("palette", &self.palette)
            .field("tiles", &self.tiles)
            .field("output", &self.output)
            .field("category", &self.category)
            .field("overpass_url", &self.overpass_url)
            .field("ors_base_url", &self.ors_base_url)
            .field("ors_api_key", &"<redacted>")
            .finish()
    }
}

impl TryFrom<RunArgs> for RunConfig {
    type Error = CliError;

    fn try_from(args: RunArgs) -> Result<Self, Self::Error> {
        let bbox = args
            .bbox
            .ok_or(CliError::MissingArgument {
                field: ARG_BBOX,
                env: ENV_BBOX,
            })?
            .parse::<BoundingBox>()
            .map_err(CliError::InvalidBoundingBox)?;

        let chains: Vec<String> = args
            .chain
            .into_iter()
            .filter(|chain| !chain.is_empty())
            .collect();
        if chains.is_empty() {
            return Err(CliError::MissingArgument {
                field: ARG_CHAIN,
                env: ENV_CHAIN,
            });
        }

        let ors_api_key = args
            .ors_api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_ORS_API_KEY,
                env: ENV_ORS_API_KEY,
            })?;

        let profile = match args.profile {
            Some(profile) => profile
                .parse::<TravelProfile>()
                .map_err(|message| CliError::InvalidProfile { message })?,
            None => TravelProfile::default(),
        };
        let tiles = match args.tiles {
            Some(tiles) => tiles.parse::<TileSet>().map_err(CliError::InvalidTiles)?,
            None => TileSet::default(),
        };
        let category = match args.category {
            Some(category) => category
                .parse::<CategoryFilter>()
                .map_err(CliError::InvalidCategory)?,
            None => CategoryFilter::default(),
        };

        let minutes = bounded(
            ARG_MINUTES,
            args.minutes.unwrap_or(DEFAULT_MINUTES),
            MAX_MINUTES,
        )?;
        let batch_size = match args.batch_size {
            None => DEFAULT_BATCH_SIZE,
            Some(value) => bounded(ARG_BATCH_SIZE, value, MAX_BATCH_SIZE)
                .ok()
                .and_then(|value| usize::try_from(value).ok())
                .and_then(NonZeroUsize::new)
                .ok_or(CliError::OutOfRange {
                    field: ARG_BATCH_SIZE,
                    value,
                    max: MAX_BATCH_SIZE,
                })?,
        };
        let throttle = if args.no_throttle {
            Throttle::Disabled
        } else {
            Throttle::default()
        };

        let palette = ChainPalette::new(&chains, args.colour);
        let pipeline = PipelineConfig::new(chains)
            .with_profile(profile)
            .with_travel_time(Duration::from_secs(minutes * 60))
            .with_throttle(throttle)
            .with_batch_size(batch_size);

        Ok(Self {
            bbox,
            pipeline,
            palette,
            tiles,
            output: args
                .output
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT)),
            category,
            overpass_url: args
                .overpass_url
                .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_owned()),
            ors_base_url: args
                .ors_base_url
                .unwrap_or_else(|| DEFAULT_ORS_URL.to_owned()),
            ors_api_key,
        })
    }
}

fn bounded(field: &'static str, value: u64, max: u64) -> Result<u64, CliError> {
    if (1..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CliError::OutOfRange { field, value, max })
    }
}

/// A map-data service answering both element and border-node queries.
pub(crate) trait MapDataService: ElementSource + BorderNodeLookup {}

impl<T: ElementSource + BorderNodeLookup> MapDataService for T {}

/// Collaborators for one run.
pub(crate) struct RunServices {
    pub(crate) map_data: Box<dyn MapDataService>,
    pub(crate) isochrones: Box<dyn IsochroneProvider>,
    pub(crate) sink: Box<dyn RenderSink>,
}

/// Builds the collaborators for the current run invocation.
pub(crate) trait RunServicesBuilder {
    fn build(&self, config: &RunConfig) -> Result<RunServices, CliError>;
}

pub(crate) struct DefaultRunServicesBuilder;

impl RunServicesBuilder for DefaultRunServicesBuilder {
    fn build(&self, config: &RunConfig) -> Result<RunServices, CliError> {
        let overpass = OverpassClient::with_config(
            OverpassConfig::new(config.category.clone()).with_endpoint(&config.overpass_url),
        )
        .map_err(|source| CliError::BuildOverpassClient {
            endpoint: config.overpass_url.clone(),
            source,
        })?;
        let isochrones = OrsIsochroneProvider::with_config(
            OrsConfig::new(config.ors_api_key.clone()).with_base_url(&config.ors_base_url),
        )
        .map_err(|source| CliError::BuildIsochroneProvider {
            base_url: config.ors_base_url.clone(),
            source,
        })?;
        Ok(RunServices {
            map_data: Box::new(overpass),
            isochrones: Box::new(isochrones),
            sink: Box::new(leaflet_sink(config)),
        })
    }
}

/// The Leaflet map described by `config`.
pub(crate) fn leaflet_sink(config: &RunConfig) -> LeafletMap {
    LeafletMap::new(
        LeafletMapConfig::new(config.output.clone(), &config.bbox)
            .with_tiles(config.tiles)
            .with_palette(config.palette.clone()),
    )
}

pub(crate) fn run_catchments(args: RunArgs) -> Result<(), CliError> {
    run_with(args, &DefaultRunServicesBuilder).map(|_| ())
}

pub(crate) fn run_with(
    args: RunArgs,
    builder: &dyn RunServicesBuilder,
) -> Result<RunReport, CliError> {
    let config = args.into_config()?;
    execute_run(&config, builder)
}

fn execute_run(config: &RunConfig, builder: &dyn RunServicesBuilder) -> Result<RunReport, CliError> {
    let RunServices {
        map_data,
        isochrones,
        mut sink,
    } = builder.build(config)?;
    let pipeline = Pipeline::new(
        config.pipeline.clone(),
        &*map_data,
        &*map_data,
        &*isochrones,
    );
    let report = pipeline.run(&config.bbox, &mut *sink)?;
    info!(
        "Mapped {} of {} matched outlets ({} elements fetched, {} diagnostics) to {}",
        report.rendered,
        report.matched,
        report.fetched,
        report.diagnostics.len(),
        config.output
    );
    Ok(report)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RunConfig, CliError> {
    let merged = RunArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RunConfig::try_from(merged)
}
