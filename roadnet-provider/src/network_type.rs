use crate::error::ProviderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which ways count as part of the road network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    /// Public drivable streets, excluding service roads
    #[default]
    Drive,
    /// Drivable streets including service roads
    DriveService,
    Walk,
    Bike,
    /// Every non-private highway
    All,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Drive => "drive",
            NetworkType::DriveService => "drive_service",
            NetworkType::Walk => "walk",
            NetworkType::Bike => "bike",
            NetworkType::All => "all",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["drive", "drive_service", "walk", "bike", "all"]
    }

    /// Overpass QL tag filter appended to `way`
    pub fn overpass_filter(&self) -> &'static str {
        match self {
            NetworkType::Drive => concat!(
                r#"["highway"]["area"!~"yes"]"#,
                r#"["highway"!~"abandoned|bridleway|bus_guideway|construction|corridor|cycleway|elevator|escalator|footway|no|path|pedestrian|planned|platform|proposed|raceway|razed|service|steps|track"]"#,
                r#"["motor_vehicle"!~"no"]["motorcar"!~"no"]"#,
                r#"["service"!~"alley|driveway|emergency_access|parking|parking_aisle|private"]"#,
            ),
            NetworkType::DriveService => concat!(
                r#"["highway"]["area"!~"yes"]"#,
                r#"["highway"!~"abandoned|bridleway|bus_guideway|construction|corridor|cycleway|elevator|escalator|footway|no|path|pedestrian|planned|platform|proposed|raceway|razed|steps|track"]"#,
                r#"["motor_vehicle"!~"no"]["motorcar"!~"no"]"#,
                r#"["service"!~"emergency_access|parking|parking_aisle|private"]"#,
            ),
            NetworkType::Walk => concat!(
                r#"["highway"]["area"!~"yes"]"#,
                r#"["highway"!~"abandoned|bus_guideway|construction|cycleway|motor|no|planned|platform|proposed|raceway|razed"]"#,
                r#"["foot"!~"no"]["service"!~"private"]"#,
            ),
            NetworkType::Bike => concat!(
                r#"["highway"]["area"!~"yes"]"#,
                r#"["highway"!~"abandoned|bus_guideway|construction|corridor|elevator|escalator|footway|motor|no|planned|platform|proposed|raceway|razed|steps"]"#,
                r#"["bicycle"!~"no"]["service"!~"private"]"#,
            ),
            NetworkType::All => concat!(
                r#"["highway"]["area"!~"yes"]"#,
                r#"["highway"!~"abandoned|construction|no|planned|platform|proposed|raceway|razed"]"#,
                r#"["service"!~"private"]"#,
            ),
        }
    }

    /// Whether `oneway` tags constrain travel direction for this network
    pub fn honours_oneway(&self) -> bool {
        matches!(self, NetworkType::Drive | NetworkType::DriveService)
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drive" => Ok(NetworkType::Drive),
            "drive_service" | "drive-service" => Ok(NetworkType::DriveService),
            "walk" => Ok(NetworkType::Walk),
            "bike" => Ok(NetworkType::Bike),
            "all" => Ok(NetworkType::All),
            other => Err(ProviderError::InvalidNetworkType(format!(
                "'{}' (expected one of: {})",
                other,
                Self::variants().join(", ")
            ))),
        }
    }
}
