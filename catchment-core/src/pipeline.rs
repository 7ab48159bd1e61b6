//! End-to-end run: fetch, filter, resolve, enrich, render.
//!
//! Every external call is made in sequence on the calling thread. Entities
//! are enriched and rendered in the order the filter produced them.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;

use log::{debug, info};
use thiserror::Error;

use crate::bbox::BoundingBox;
use crate::diagnostic::Diagnostic;
use crate::element::ElementId;
use crate::entity::ResolvedEntity;
use crate::filter::{ChainMatcher, FilterOutcome, filter_entities};
use crate::isochrone::{
    Isochrone, IsochroneAttribute, IsochroneProvider, IsochroneRequest, TravelProfile,
};
use crate::render::{MapFeature, RenderError, RenderSink};
use crate::resolve::{DEFAULT_BATCH_SIZE, ResolveError, resolve_entities};
use crate::service::{BorderNodeLookup, ElementSource, ServiceError};

/// Delay before each isochrone request against a shared, rate-limited
/// routing service (20 requests per minute).
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(3);

/// Default travel-time budget.
pub const DEFAULT_TRAVEL_TIME: Duration = Duration::from_secs(3 * 60);

/// Entities between progress log lines.
const PROGRESS_INTERVAL: usize = 20;

/// Pause inserted before every isochrone request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    /// Issue requests back to back (private routing instance).
    Disabled,
    /// Sleep for the given duration before each request.
    Fixed(Duration),
}

impl Default for Throttle {
    fn default() -> Self {
        Self::Fixed(DEFAULT_THROTTLE)
    }
}

impl Throttle {
    /// Block the calling thread for the configured delay.
    pub fn wait(self) {
        if let Self::Fixed(delay) = self
            && !delay.is_zero()
        {
            thread::sleep(delay);
        }
    }
}

/// Settings for one pipeline run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use catchment_core::{PipelineConfig, Throttle, TravelProfile};
///
/// let config = PipelineConfig::new(["Countdown", "New World"])
///     .with_profile(TravelProfile::FootWalking)
///     .with_travel_time(Duration::from_secs(600))
///     .with_throttle(Throttle::Disabled);
/// assert_eq!(config.targets.len(), 2);
/// assert_eq!(config.batch_size.get(), 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Chain names to match, in priority order.
    pub targets: Vec<String>,
    /// Means of travel for isochrones.
    pub profile: TravelProfile,
    /// Travel-time budget for isochrones.
    pub travel_time: Duration,
    /// Attributes requested with each isochrone.
    pub attributes: Vec<IsochroneAttribute>,
    /// Delay before each isochrone request.
    pub throttle: Throttle,
    /// Maximum border nodes per lookup request.
    pub batch_size: NonZeroUsize,
}

impl PipelineConfig {
    /// Default configuration for the given chain names.
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            profile: TravelProfile::default(),
            travel_time: DEFAULT_TRAVEL_TIME,
            attributes: vec![IsochroneAttribute::TotalPop],
            throttle: Throttle::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the travel profile.
    #[must_use]
    pub const fn with_profile(mut self, profile: TravelProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the travel-time budget.
    #[must_use]
    pub const fn with_travel_time(mut self, travel_time: Duration) -> Self {
        self.travel_time = travel_time;
        self
    }

    /// Set the requested isochrone attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<IsochroneAttribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the request throttle.
    #[must_use]
    pub const fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Set the border-node batch size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Raw elements returned by the element source.
    pub fetched: usize,
    /// Entities produced by the filter.
    pub matched: usize,
    /// Features handed to the render sink.
    pub rendered: usize,
    /// Non-fatal issues, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

/// Fatal run failures, naming the collaborator that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No usable chain name was configured.
    #[error("at least one non-empty chain name is required")]
    NoTargets,
    /// The element source failed.
    #[error("failed to fetch map elements: {0}")]
    FetchElements(#[source] ServiceError),
    /// A border-node batch lookup failed.
    #[error("failed to resolve border nodes: {0}")]
    ResolveBorderNodes(#[from] ResolveError),
    /// The routing service failed for one entity.
    #[error("isochrone request for {entity} failed: {source}")]
    Isochrone {
        /// Entity being enriched.
        entity: ElementId,
        /// Service failure.
        #[source]
        source: ServiceError,
    },
    /// The render sink failed.
    #[error("failed to render map: {0}")]
    Render(#[from] RenderError),
}

/// Orchestrates one run against borrowed collaborators.
///
/// # Examples
///
/// ```
/// use catchment_core::{BoundingBox, Pipeline, PipelineConfig, RawElement, Throttle};
/// use catchment_core::test_support::{
///     RecordingBorderNodeLookup, RecordingSink, SquareIsochroneProvider, StubElementSource,
/// };
///
/// let source = StubElementSource::with_elements(vec![
///     RawElement::point(1, -36.88, 174.76).with_name("Countdown Mt Eden"),
/// ]);
/// let lookup = RecordingBorderNodeLookup::default();
/// let isochrones = SquareIsochroneProvider::default();
/// let config = PipelineConfig::new(["Countdown"]).with_throttle(Throttle::Disabled);
/// let pipeline = Pipeline::new(config, &source, &lookup, &isochrones);
///
/// let bbox = BoundingBox::new(-37.0, 174.0, -36.0, 175.0)?;
/// let mut sink = RecordingSink::default();
/// let report = pipeline.run(&bbox, &mut sink)?;
/// assert_eq!(report.rendered, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Pipeline<'a> {
    config: PipelineConfig,
    matcher: ChainMatcher,
    source: &'a dyn ElementSource,
    lookup: &'a dyn BorderNodeLookup,
    isochrones: &'a dyn IsochroneProvider,
}

impl std::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl<'a> Pipeline<'a> {
    /// Wire a pipeline to its collaborators.
    pub fn new(
        config: PipelineConfig,
        source: &'a dyn ElementSource,
        lookup: &'a dyn BorderNodeLookup,
        isochrones: &'a dyn IsochroneProvider,
    ) -> Self {
        let matcher = ChainMatcher::new(&config.targets);
        Self {
            config,
            matcher,
            source,
            lookup,
            isochrones,
        }
    }

    /// Run the pipeline over `bbox`, handing each outlet to `sink`.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] naming the failing collaborator. Skipped
    /// elements and unresolved entities are not errors; they are listed in
    /// [`RunReport::diagnostics`].
    pub fn run(
        &self,
        bbox: &BoundingBox,
        sink: &mut dyn RenderSink,
    ) -> Result<RunReport, PipelineError> {
        if self.matcher.is_empty() {
            return Err(PipelineError::NoTargets);
        }

        let elements = self
            .source
            .fetch_elements(bbox)
            .map_err(PipelineError::FetchElements)?;
        info!("Fetched {} map elements inside {bbox}", elements.len());

        let FilterOutcome {
            entities,
            diagnostics,
        } = filter_entities(&elements, &self.matcher);
        info!(
            "Matched {} entities for {}",
            entities.len(),
            self.matcher.targets().join(", ")
        );
        let mut report = RunReport {
            fetched: elements.len(),
            matched: entities.len(),
            rendered: 0,
            diagnostics,
        };

        let resolution = resolve_entities(entities, self.lookup, self.config.batch_size)?;
        report
            .diagnostics
            .extend(resolution.unresolved.into_iter().map(Diagnostic::from));

        let total = resolution.entities.len();
        for (index, entity) in resolution.entities.into_iter().enumerate() {
            if index % PROGRESS_INTERVAL == 0 {
                info!("Processing entity {} of {total}", index + 1);
            }
            let isochrone = self.enrich(&entity)?;
            sink.render(&MapFeature::new(entity, isochrone))?;
            report.rendered += 1;
        }
        sink.finish()?;
        Ok(report)
    }

    fn enrich(&self, entity: &ResolvedEntity) -> Result<Isochrone, PipelineError> {
        let request = IsochroneRequest {
            location: entity.location,
            profile: self.config.profile,
            range: self.config.travel_time,
            attributes: self.config.attributes.clone(),
        };
        self.config.throttle.wait();
        debug!("Requesting {} isochrone for {}", request.profile, entity.id);
        self.isochrones
            .isochrone(&request)
            .map_err(|source| PipelineError::Isochrone {
                entity: entity.id,
                source,
            })
    }
}
