//! openrouteservice isochrone request and response types.
//!
//! See: <https://openrouteservice.org/dev/#/api-docs/v2/isochrones/{profile}/post>

use catchment_core::{Isochrone, ServiceError};
use geo::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Body of an isochrone request.
#[derive(Debug, Serialize)]
pub struct IsochroneBody {
    /// Origins as `[lon, lat]`.
    pub locations: Vec<[f64; 2]>,
    /// Range values in seconds.
    pub range: Vec<u64>,
    /// Range interpretation; always `time`.
    pub range_type: &'static str,
    /// Attribute names to attach to each polygon.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<&'static str>,
}

/// GeoJSON feature collection returned on success.
#[derive(Debug, Deserialize)]
pub struct IsochroneResponse {
    /// One feature per location and range.
    #[serde(default)]
    pub features: Vec<IsochroneFeature>,
}

/// One isochrone polygon with its attributes.
#[derive(Debug, Deserialize)]
pub struct IsochroneFeature {
    /// Requested attributes plus range metadata.
    #[serde(default)]
    pub properties: IsochroneProperties,
    /// Polygon geometry.
    pub geometry: IsochroneGeometry,
}

/// Attribute values attached to a feature.
#[derive(Debug, Default, Deserialize)]
pub struct IsochroneProperties {
    /// Population inside the polygon.
    pub total_pop: Option<f64>,
    /// Polygon area in square metres.
    pub area: Option<f64>,
}

/// GeoJSON polygon geometry.
#[derive(Debug, Deserialize)]
pub struct IsochroneGeometry {
    /// Geometry type; only `Polygon` is accepted.
    #[serde(rename = "type")]
    pub kind: String,
    /// Rings of `[lon, lat, ...]` positions, exterior first.
    pub coordinates: Vec<Vec<Vec<f64>>>,
}

/// Error document returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Error detail.
    pub error: ErrorDetail,
}

/// Either a structured routing error or a bare gateway message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Routing engine error with a numeric code.
    Coded {
        /// Internal error code.
        code: i64,
        /// Error detail.
        message: String,
    },
    /// Gateway message, such as a quota or key error.
    Message(String),
}

impl ErrorDetail {
    /// Map the error document onto [`ServiceError::Rejected`].
    pub fn into_service_error(self) -> ServiceError {
        match self {
            Self::Coded { code, message } => ServiceError::Rejected {
                code: code.to_string(),
                message,
            },
            Self::Message(message) => ServiceError::Rejected {
                code: "gateway".to_owned(),
                message,
            },
        }
    }
}

impl IsochroneResponse {
    /// Convert the first feature into an [`Isochrone`].
    pub fn into_isochrone(self) -> Result<Isochrone, ServiceError> {
        let feature = self
            .features
            .into_iter()
            .next()
            .ok_or_else(|| parse_error("isochrone response contains no features"))?;
        if feature.geometry.kind != "Polygon" {
            return Err(parse_error(&format!(
                "unsupported isochrone geometry '{}'",
                feature.geometry.kind
            )));
        }
        let mut rings = feature
            .geometry
            .coordinates
            .into_iter()
            .map(ring_from_positions);
        let exterior = rings
            .next()
            .ok_or_else(|| parse_error("isochrone polygon has no exterior ring"))??;
        let interiors = rings.collect::<Result<Vec<_>, _>>()?;

        let mut isochrone = Isochrone::new(Polygon::new(exterior, interiors));
        isochrone.total_population = feature.properties.total_pop;
        isochrone.area = feature.properties.area;
        Ok(isochrone)
    }
}

fn ring_from_positions(positions: Vec<Vec<f64>>) -> Result<LineString<f64>, ServiceError> {
    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(Coord { x: *lon, y: *lat }),
            _ => Err(parse_error("isochrone position has fewer than two values")),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

fn parse_error(message: &str) -> ServiceError {
    ServiceError::Parse {
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SUCCESS: &str = r#"{
        "type": "FeatureCollection",
        "bbox": [174.74, -36.9, 174.78, -36.86],
        "features": [{
            "type": "Feature",
            "properties": {
                "group_index": 0,
                "value": 180.0,
                "center": [174.76, -36.88],
                "total_pop": 5231.0
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [174.74, -36.90], [174.78, -36.90], [174.78, -36.86], [174.74, -36.90]
                ]]
            }
        }],
        "metadata": {"service": "isochrones"}
    }"#;

    #[rstest]
    fn decodes_polygon_and_population() {
        let response: IsochroneResponse = serde_json::from_str(SUCCESS).expect("should deserialise");

        let isochrone = response.into_isochrone().expect("should convert");

        assert_eq!(isochrone.total_population, Some(5231.0));
        assert!(isochrone.area.is_none());
        let exterior: Vec<Coord<f64>> = isochrone.polygon.exterior().coords().copied().collect();
        assert_eq!(exterior[0], Coord { x: 174.74, y: -36.90 });
        assert_eq!(exterior.len(), 4);
        assert!(isochrone.polygon.interiors().is_empty());
    }

    #[rstest]
    fn empty_feature_collection_is_a_parse_error() {
        let response: IsochroneResponse =
            serde_json::from_str(r#"{"type": "FeatureCollection", "features": []}"#)
                .expect("should deserialise");

        let err = response.into_isochrone().expect_err("no features");

        assert!(matches!(err, ServiceError::Parse { .. }));
    }

    #[rstest]
    fn short_positions_are_rejected() {
        let json = r#"{"features": [{"geometry": {"type": "Polygon", "coordinates": [[[174.7]]]}}]}"#;
        let response: IsochroneResponse = serde_json::from_str(json).expect("should deserialise");

        let err = response.into_isochrone().expect_err("short position");

        assert!(matches!(err, ServiceError::Parse { .. }));
    }

    #[rstest]
    #[case(
        r#"{"error": {"code": 3004, "message": "Parameter 'range' is out of range"}}"#,
        "3004"
    )]
    #[case(r#"{"error": "Quota exceeded"}"#, "gateway")]
    fn error_documents_map_to_rejections(#[case] json: &str, #[case] expected_code: &str) {
        let response: ErrorResponse = serde_json::from_str(json).expect("should deserialise");

        match response.error.into_service_error() {
            ServiceError::Rejected { code, .. } => assert_eq!(code, expected_code),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[rstest]
    fn body_serialises_lon_lat_and_seconds() {
        let body = IsochroneBody {
            locations: vec![[174.76, -36.88]],
            range: vec![180],
            range_type: "time",
            attributes: vec!["total_pop"],
        };

        let json = serde_json::to_value(&body).expect("should serialise");

        assert_eq!(
            json,
            serde_json::json!({
                "locations": [[174.76, -36.88]],
                "range": [180],
                "range_type": "time",
                "attributes": ["total_pop"]
            })
        );
    }
}
