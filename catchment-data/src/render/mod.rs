//! Leaflet HTML rendering sink.
//!
//! [`LeafletMap`] collects one layer per outlet (isochrone polygon plus a
//! marker with a popup) and writes a single self-contained HTML page when the
//! pipeline finishes.

mod document;
mod output;
mod palette;
mod tiles;

use camino::Utf8PathBuf;
use catchment_core::{BoundingBox, MapFeature, RenderError, RenderSink};
use geo::Coord;
use log::info;

use document::{Page, encode_layer, html_document};
pub use palette::{ChainPalette, DEFAULT_COLOURS};
pub use tiles::{TileSet, TileSetError};

/// Zoom level the map opens at.
pub const DEFAULT_ZOOM: u8 = 11;

/// Settings for [`LeafletMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct LeafletMapConfig {
    /// Destination HTML file.
    pub output: Utf8PathBuf,
    /// Map centre (`x = longitude`, `y = latitude`).
    pub centre: Coord<f64>,
    /// Initial zoom level.
    pub zoom: u8,
    /// Background tiles.
    pub tiles: TileSet,
    /// Per-chain colours.
    pub palette: ChainPalette,
    /// Page title.
    pub title: String,
}

impl LeafletMapConfig {
    /// Configuration centred on `bbox` at the default zoom.
    pub fn new(output: impl Into<Utf8PathBuf>, bbox: &BoundingBox) -> Self {
        Self {
            output: output.into(),
            centre: bbox.centre(),
            zoom: DEFAULT_ZOOM,
            tiles: TileSet::default(),
            palette: ChainPalette::default(),
            title: "Catchments".to_owned(),
        }
    }

    /// Set the background tiles.
    #[must_use]
    pub const fn with_tiles(mut self, tiles: TileSet) -> Self {
        self.tiles = tiles;
        self
    }

    /// Set the chain colours.
    #[must_use]
    pub fn with_palette(mut self, palette: ChainPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the page title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Render sink producing a Leaflet HTML map.
///
/// # Examples
///
/// ```
/// use catchment_core::{BoundingBox, ElementId, Isochrone, MapFeature, RenderSink};
/// use catchment_core::test_support::square_around;
/// use catchment_data::{LeafletMap, LeafletMapConfig};
/// use geo::Coord;
///
/// let dir = tempfile::tempdir()?;
/// let output = camino::Utf8PathBuf::try_from(dir.path().join("map.html"))?;
/// let bbox = BoundingBox::new(-37.0, 174.0, -36.0, 175.0)?;
/// let mut map = LeafletMap::new(LeafletMapConfig::new(output.clone(), &bbox));
///
/// let location = Coord { x: 174.76, y: -36.88 };
/// map.render(&MapFeature {
///     id: ElementId::node(1),
///     location,
///     display_name: "Countdown Mt Eden".to_owned(),
///     chain: "countdown".to_owned(),
///     isochrone: Isochrone::new(square_around(location)),
/// })?;
/// map.finish()?;
/// assert!(output.as_std_path().is_file());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct LeafletMap {
    config: LeafletMapConfig,
    layers: Vec<String>,
}

impl LeafletMap {
    /// Create an empty map.
    pub const fn new(config: LeafletMapConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
        }
    }

    /// Number of outlets rendered so far.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether no outlet has been rendered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Assemble the HTML page for the layers rendered so far.
    pub fn to_html(&self) -> String {
        let page = Page {
            title: &self.config.title,
            centre: self.config.centre,
            zoom: self.config.zoom,
            tiles: self.config.tiles,
        };
        html_document(&page, &self.layers)
    }
}

impl RenderSink for LeafletMap {
    fn render(&mut self, feature: &MapFeature) -> Result<(), RenderError> {
        let colour = self.config.palette.colour_for(&feature.chain);
        let layer = encode_layer(feature, colour)?;
        self.layers.push(layer);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        let html = self.to_html();
        output::write_document(&self.config.output, &html).map_err(|source| {
            RenderError::Write {
                path: self.config.output.to_string(),
                source,
            }
        })?;
        info!(
            "Wrote {} outlets to {}",
            self.layers.len(),
            self.config.output
        );
        Ok(())
    }
}
