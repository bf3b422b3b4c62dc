//! Coordinate Reference System identifiers
//!
//! All inputs to a mosaic run must share one CRS; no reprojection happens
//! here, so a CRS is carried as an identifier and compared for equivalence.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate reference system identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crs {
    /// EPSG code, e.g. 4326 or 5070
    Epsg(u32),
    /// Well-known text definition
    Wkt(String),
}

impl Crs {
    /// WGS 84 geographic coordinates (EPSG:4326)
    pub fn wgs84() -> Self {
        Crs::Epsg(4326)
    }

    /// EPSG code, if this CRS is EPSG-identified
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Epsg(code) => Some(*code),
            Crs::Wkt(_) => None,
        }
    }

    /// Check whether two CRS refer to the same coordinate space.
    ///
    /// EPSG codes compare numerically; WKT strings compare textually. An
    /// EPSG-identified CRS never matches a WKT-identified one, mirroring the
    /// strict projection-string comparison of the upstream tooling.
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        match (self, other) {
            (Crs::Epsg(a), Crs::Epsg(b)) => a == b,
            (Crs::Wkt(a), Crs::Wkt(b)) => a == b,
            _ => false,
        }
    }

    /// Short identifier for error messages and logs
    pub fn identifier(&self) -> String {
        match self {
            Crs::Epsg(code) => format!("EPSG:{code}"),
            Crs::Wkt(wkt) => format!("WKT:{}", wkt.chars().take(50).collect::<String>()),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsg_equivalence() {
        assert!(Crs::Epsg(4326).is_equivalent(&Crs::wgs84()));
        assert!(!Crs::Epsg(4326).is_equivalent(&Crs::Epsg(5070)));
    }

    #[test]
    fn wkt_never_matches_epsg() {
        let wkt = Crs::Wkt("GEOGCS[\"WGS 84\"]".to_string());
        assert!(!wkt.is_equivalent(&Crs::Epsg(4326)));
        assert!(wkt.is_equivalent(&wkt.clone()));
    }

    #[test]
    fn identifier_truncates_long_wkt() {
        let wkt = Crs::Wkt("G".repeat(200));
        assert_eq!(wkt.identifier(), format!("WKT:{}", "G".repeat(50)));
        assert_eq!(Crs::Epsg(5070).identifier(), "EPSG:5070");
    }

    #[test]
    fn identifier_truncates_on_char_boundaries() {
        // A multi-byte character straddling the cut must not split
        let wkt = Crs::Wkt(format!("{}é suivi d'unités localisées", "G".repeat(49)));
        let id = wkt.identifier();
        assert_eq!(id, format!("WKT:{}é", "G".repeat(49)));
        assert_eq!(id.chars().count(), 54);
    }
}
