//! Esri JSON feature set model.
//!
//! Mirrors the layout consumed by ArcGIS clients and services: a top-level geometry type and
//! spatial reference, field descriptors, and `{geometry, attributes}` feature records.

use crate::error::{SpatialError, SpatialResult};
use crate::spatial_ref::SpatialReference;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    pub object_id_field_name: String,
    pub global_id_field_name: String,
    pub display_field_name: String,
    pub geometry_type: String,
    pub spatial_reference: SpatialReference,
    pub fields: Vec<Field>,
    pub features: Vec<Feature>,
}

impl FeatureSet {
    pub fn to_dict(&self) -> SpatialResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(SpatialError::InvalidArray(format!(
                "feature set serialized to {} instead of an object",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: EsriGeometry,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EsriGeometry {
    Point(EsriPoint),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriPoint {
    pub x: f64,
    pub y: f64,
    pub spatial_reference: SpatialReference,
}

impl EsriPoint {
    /// Builds a point, rejecting non-finite coordinates and invalid spatial references.
    pub fn try_new(x: f64, y: f64, spatial_reference: SpatialReference) -> SpatialResult<Self> {
        spatial_reference.validate()?;
        check_coordinate("x", x).map_err(SpatialError::InvalidGeometry)?;
        check_coordinate("y", y).map_err(SpatialError::InvalidGeometry)?;
        Ok(Self {
            x,
            y,
            spatial_reference,
        })
    }

    /// Like [`EsriPoint::try_new`] for a spatial reference that was validated up front, returning
    /// the reason a coordinate was rejected.
    pub(crate) fn from_geo(
        point: geo::Point,
        spatial_reference: &SpatialReference,
    ) -> Result<Self, String> {
        check_coordinate("x", point.x())?;
        check_coordinate("y", point.y())?;
        Ok(Self {
            x: point.x(),
            y: point.y(),
            spatial_reference: spatial_reference.clone(),
        })
    }
}

impl From<&EsriPoint> for geo::Point {
    fn from(value: &EsriPoint) -> Self {
        geo::Point::new(value.x, value.y)
    }
}

fn check_coordinate(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{} coordinate {} is not finite", name, value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub alias: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "esriFieldTypeSmallInteger")]
    SmallInteger,
    #[serde(rename = "esriFieldTypeInteger")]
    Integer,
    #[serde(rename = "esriFieldTypeBigInteger")]
    BigInteger,
    #[serde(rename = "esriFieldTypeSingle")]
    Single,
    #[serde(rename = "esriFieldTypeDouble")]
    Double,
    #[serde(rename = "esriFieldTypeString")]
    String,
    #[serde(rename = "esriFieldTypeDate")]
    Date,
}
