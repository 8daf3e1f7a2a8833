use crate::error::{SpatialError, SpatialResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Coordinate system of a feature set, in Esri JSON form.
///
/// Nothing is checked at construction time. [`SpatialReference::validate`] runs when geometries
/// are built from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkid: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
}

impl SpatialReference {
    pub fn from_wkid(wkid: i32) -> Self {
        Self {
            wkid: Some(wkid),
            latest_wkid: None,
            wkt: None,
        }
    }

    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkid: None,
            latest_wkid: None,
            wkt: Some(wkt.into()),
        }
    }

    /// WGS 84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_wkid(4326)
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::from_wkid(3857)
    }

    pub fn validate(&self) -> SpatialResult<()> {
        if self.wkid.is_none() && self.latest_wkid.is_none() && self.wkt.is_none() {
            return Err(SpatialError::InvalidSpatialReference(
                "must specify wkid, latestWkid or wkt".to_string(),
            ));
        }
        for (name, id) in [("wkid", self.wkid), ("latestWkid", self.latest_wkid)] {
            if let Some(id) = id {
                if id <= 0 {
                    return Err(SpatialError::InvalidSpatialReference(format!(
                        "{} must be positive, got {}",
                        name, id
                    )));
                }
            }
        }
        if let Some(wkt) = &self.wkt {
            if wkt.trim().is_empty() {
                return Err(SpatialError::InvalidSpatialReference(
                    "wkt must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Display for SpatialReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.wkid, self.latest_wkid, &self.wkt) {
            (Some(wkid), _, _) | (None, Some(wkid), _) => write!(f, "wkid {}", wkid),
            (None, None, Some(wkt)) => write!(f, "wkt {}", wkt),
            (None, None, None) => f.write_str("unknown"),
        }
    }
}

impl From<i32> for SpatialReference {
    fn from(value: i32) -> Self {
        Self::from_wkid(value)
    }
}

impl From<&SpatialReference> for SpatialReference {
    fn from(value: &SpatialReference) -> Self {
        value.clone()
    }
}

impl TryFrom<&Value> for SpatialReference {
    type Error = SpatialError;

    /// Accepts a bare wkid, an Esri spatial reference object, or an object wrapping one under
    /// `spatialReference`.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(SpatialReference::from_wkid)
                .ok_or_else(|| {
                    SpatialError::InvalidSpatialReference(format!("{} is not a wkid", n))
                }),
            Value::Object(map) => {
                if let Some(inner) = map.get("spatialReference") {
                    return SpatialReference::try_from(inner);
                }
                if !["wkid", "latestWkid", "wkt"]
                    .iter()
                    .any(|k| map.contains_key(*k))
                {
                    return Err(SpatialError::InvalidSpatialReference(
                        "spatial reference must specify 'wkid', 'latestWkid' or 'wkt'"
                            .to_string(),
                    ));
                }
                serde_json::from_value(value.clone()).map_err(|e| {
                    SpatialError::InvalidSpatialReference(format!("{}: {}", value, e))
                })
            }
            Value::String(s) => s.parse(),
            _ => Err(SpatialError::InvalidSpatialReference(format!(
                "cannot interpret {} as a spatial reference, pass a wkid or an object with 'wkid'",
                value
            ))),
        }
    }
}

impl FromStr for SpatialReference {
    type Err = SpatialError;

    /// Parses `3857`, `EPSG:3857` or a JSON object.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('{') {
            let value: Value = serde_json::from_str(s)
                .map_err(|e| SpatialError::InvalidSpatialReference(format!("{}: {}", s, e)))?;
            return SpatialReference::try_from(&value);
        }
        let code = s
            .strip_prefix("EPSG:")
            .or_else(|| s.strip_prefix("epsg:"))
            .unwrap_or(s);
        code.parse::<i32>()
            .map(SpatialReference::from_wkid)
            .map_err(|_| {
                SpatialError::InvalidSpatialReference(format!(
                    "cannot interpret {:?}, pass an EPSG code or a spatial reference object",
                    s
                ))
            })
    }
}
