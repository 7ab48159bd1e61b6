//! Background tile sets.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a tile set name is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown tile set '{input}' (expected one of: openstreetmap, toner)")]
pub struct TileSetError {
    /// Input as supplied.
    pub input: String,
}

/// Background map tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TileSet {
    /// Standard OpenStreetMap rendering.
    #[default]
    OpenStreetMap,
    /// Monochrome Stamen Toner, served by Stadia Maps.
    Toner,
}

impl TileSet {
    /// Stable name accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenStreetMap => "openstreetmap",
            Self::Toner => "toner",
        }
    }

    /// Leaflet URL template.
    pub const fn url_template(self) -> &'static str {
        match self {
            Self::OpenStreetMap => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            Self::Toner => "https://tiles.stadiamaps.com/tiles/stamen_toner/{z}/{x}/{y}{r}.png",
        }
    }

    /// Attribution HTML shown in the map corner.
    pub const fn attribution(self) -> &'static str {
        match self {
            Self::OpenStreetMap => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            }
            Self::Toner => {
                "&copy; <a href=\"https://stadiamaps.com/\">Stadia Maps</a> \
                 &copy; <a href=\"https://stamen.com/\">Stamen Design</a> \
                 &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            }
        }
    }
}

impl fmt::Display for TileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileSet {
    type Err = TileSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openstreetmap" | "osm" => Ok(Self::OpenStreetMap),
            "toner" | "stamen-toner" | "stamen toner" => Ok(Self::Toner),
            _ => Err(TileSetError {
                input: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("openstreetmap", TileSet::OpenStreetMap)]
    #[case("OSM", TileSet::OpenStreetMap)]
    #[case("Stamen Toner", TileSet::Toner)]
    #[case("toner", TileSet::Toner)]
    fn parses_tile_set_names(#[case] input: &str, #[case] expected: TileSet) {
        assert_eq!(input.parse::<TileSet>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_tile_set() {
        let err = "watercolor".parse::<TileSet>().expect_err("unknown");

        assert_eq!(err.input, "watercolor");
    }

    #[rstest]
    fn display_round_trips_through_from_str() {
        for tiles in [TileSet::OpenStreetMap, TileSet::Toner] {
            assert_eq!(tiles.to_string().parse::<TileSet>(), Ok(tiles));
        }
    }
}
