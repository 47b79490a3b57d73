use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic query region in WGS-84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Result<Self> {
        let bbox = Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    pub fn validate(&self) -> Result<()> {
        let values = [self.min_lat, self.min_lon, self.max_lat, self.max_lon];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ProviderError::InvalidBoundingBox(format!(
                "{} contains a non-finite coordinate",
                self
            )));
        }
        if !(-90.0..=90.0).contains(&self.min_lat) || !(-90.0..=90.0).contains(&self.max_lat) {
            return Err(ProviderError::InvalidBoundingBox(format!(
                "latitude out of range [-90, 90] in {}",
                self
            )));
        }
        if !(-180.0..=180.0).contains(&self.min_lon) || !(-180.0..=180.0).contains(&self.max_lon) {
            return Err(ProviderError::InvalidBoundingBox(format!(
                "longitude out of range [-180, 180] in {}",
                self
            )));
        }
        if self.min_lat >= self.max_lat || self.min_lon >= self.max_lon {
            return Err(ProviderError::InvalidBoundingBox(format!(
                "min must be below max in {}",
                self
            )));
        }
        Ok(())
    }

    /// Inclusive on every edge
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    /// Overpass `(south,west,north,east)` filter
    pub fn to_overpass(&self) -> String {
        format!(
            "({},{},{},{})",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

impl Default for BoundingBox {
    /// Central Athens demo region
    fn default() -> Self {
        Self {
            min_lat: 37.97636572397411,
            min_lon: 23.729946182088714,
            max_lat: 37.98530275447799,
            max_lon: 23.741572180231984,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

/// Parses `min_lat,min_lon,max_lat,max_lon`
impl FromStr for BoundingBox {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
        if parts.len() != 4 {
            return Err(ProviderError::InvalidBoundingBox(format!(
                "expected 4 comma-separated values, got {}",
                parts.len()
            )));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse::<f64>().map_err(|e| {
                ProviderError::InvalidBoundingBox(format!("'{}' is not a number: {}", part, e))
            })?;
        }

        Self::new(values[0], values[1], values[2], values[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        let bbox: BoundingBox = "37.9, 23.7, 38.0, 23.8".parse().unwrap();
        assert_eq!(bbox.min_lat, 37.9);
        assert_eq!(bbox.min_lon, 23.7);
        assert_eq!(bbox.max_lat, 38.0);
        assert_eq!(bbox.max_lon, 23.8);
    }

    #[test]
    fn test_parse_bbox_wrong_arity() {
        let result = "1,2,3".parse::<BoundingBox>();
        assert!(matches!(result, Err(ProviderError::InvalidBoundingBox(_))));
    }

    #[test]
    fn test_parse_bbox_not_a_number() {
        let result = "a,2,3,4".parse::<BoundingBox>();
        assert!(result.is_err());
    }

    #[test]
    fn test_bbox_inverted_rejected() {
        assert!(BoundingBox::new(38.0, 23.7, 37.9, 23.8).is_err());
        assert!(BoundingBox::new(37.9, 23.8, 38.0, 23.7).is_err());
    }

    #[test]
    fn test_bbox_out_of_range_rejected() {
        assert!(BoundingBox::new(-91.0, 0.0, 10.0, 1.0).is_err());
        assert!(BoundingBox::new(0.0, -181.0, 10.0, 1.0).is_err());
        assert!(BoundingBox::new(f64::NAN, 0.0, 10.0, 1.0).is_err());
    }

    #[test]
    fn test_default_bbox_is_valid_and_round_trips_display() {
        let bbox = BoundingBox::default();
        assert!(bbox.validate().is_ok());
        let reparsed: BoundingBox = bbox.to_string().parse().unwrap();
        assert_eq!(reparsed, bbox);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0).unwrap();
        assert!(bbox.contains(2.0, 3.0));
        assert!(bbox.contains(1.0, 2.0));
        assert!(bbox.contains(3.0, 4.0));
        assert!(!bbox.contains(3.5, 3.0));
        assert!(!bbox.contains(2.0, 1.9));
    }

    #[test]
    fn test_to_overpass() {
        let bbox = BoundingBox::new(1.5, 2.5, 3.5, 4.5).unwrap();
        assert_eq!(bbox.to_overpass(), "(1.5,2.5,3.5,4.5)");
    }
}
