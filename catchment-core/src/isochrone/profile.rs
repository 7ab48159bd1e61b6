//! Travel profiles and the optional attributes a routing service can attach
//! to an isochrone.

use std::fmt;
use std::str::FromStr;

/// Means of travel used to compute reachability.
///
/// # Examples
/// ```
/// use catchment_core::TravelProfile;
///
/// assert_eq!(TravelProfile::FootWalking.as_str(), "foot-walking");
/// assert_eq!("wheelchair".parse(), Ok(TravelProfile::Wheelchair));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TravelProfile {
    /// Private car.
    #[default]
    DrivingCar,
    /// Walking.
    FootWalking,
    /// Regular bicycle.
    CyclingRegular,
    /// Wheelchair.
    Wheelchair,
}

impl TravelProfile {
    /// Every profile, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::DrivingCar,
        Self::FootWalking,
        Self::CyclingRegular,
        Self::Wheelchair,
    ];

    /// Return the routing-service slug.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DrivingCar => "driving-car",
            Self::FootWalking => "foot-walking",
            Self::CyclingRegular => "cycling-regular",
            Self::Wheelchair => "wheelchair",
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|profile| profile.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                format!("unknown travel profile '{s}' (expected one of {})", known.join(", "))
            })
    }
}

/// Extra information requested alongside an isochrone polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsochroneAttribute {
    /// Polygon area.
    Area,
    /// Ratio between reachable area and the theoretical maximum.
    ReachFactor,
    /// Population living inside the polygon.
    TotalPop,
}

impl IsochroneAttribute {
    /// Return the routing-service attribute name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::ReachFactor => "reachfactor",
            Self::TotalPop => "total_pop",
        }
    }
}

impl fmt::Display for IsochroneAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TravelProfile::DrivingCar)]
    #[case(TravelProfile::FootWalking)]
    #[case(TravelProfile::CyclingRegular)]
    #[case(TravelProfile::Wheelchair)]
    fn profile_round_trips_through_its_slug(#[case] profile: TravelProfile) {
        assert_eq!(profile.to_string().parse(), Ok(profile));
    }

    #[rstest]
    fn profile_parsing_ignores_case() {
        assert_eq!("Driving-Car".parse(), Ok(TravelProfile::DrivingCar));
    }

    #[rstest]
    fn unknown_profile_lists_alternatives() {
        let err = "hovercraft".parse::<TravelProfile>().expect_err("unknown");
        assert!(err.contains("foot-walking"), "{err}");
    }

    #[rstest]
    fn attribute_names_match_service_vocabulary() {
        assert_eq!(IsochroneAttribute::TotalPop.as_str(), "total_pop");
        assert_eq!(IsochroneAttribute::ReachFactor.to_string(), "reachfactor");
    }
}
