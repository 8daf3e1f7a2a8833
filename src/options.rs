use crate::error::SpatialResult;
use crate::geometry_type::GeometryType;
use serde::{Deserialize, Serialize};

/// What to do with a row whose geometry cannot be built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRowPolicy {
    /// Abort the conversion with the offending row index.
    #[default]
    Fail,
    /// Drop the row and log a warning.
    Skip,
}

/// Spelling of the top-level `geometryType` member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryTypeNaming {
    /// `Point`
    #[default]
    Short,
    /// `esriGeometryPoint`
    Esri,
}

impl GeometryTypeNaming {
    pub fn name(&self, geometry_type: GeometryType) -> &'static str {
        match self {
            GeometryTypeNaming::Short => geometry_type.name(),
            GeometryTypeNaming::Esri => geometry_type.esri_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    pub invalid_rows: InvalidRowPolicy,
    /// Column holding whole geometries. Takes precedence over `SHAPE` and x/y discovery.
    pub geometry_column: Option<String>,
    pub x_column: String,
    pub y_column: String,
    pub geometry_type_naming: GeometryTypeNaming,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            invalid_rows: InvalidRowPolicy::Fail,
            geometry_column: None,
            x_column: "x".to_string(),
            y_column: "y".to_string(),
            geometry_type_naming: GeometryTypeNaming::Short,
        }
    }
}

impl ConversionOptions {
    pub fn from_json(json: &str) -> SpatialResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_invalid_rows(mut self, policy: InvalidRowPolicy) -> Self {
        self.invalid_rows = policy;
        self
    }

    pub fn with_geometry_column(mut self, column: impl Into<String>) -> Self {
        self.geometry_column = Some(column.into());
        self
    }

    pub fn with_xy_columns(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_column = x.into();
        self.y_column = y.into();
        self
    }

    pub fn with_geometry_type_naming(mut self, naming: GeometryTypeNaming) -> Self {
        self.geometry_type_naming = naming;
        self
    }
}
