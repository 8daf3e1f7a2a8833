use crate::capability::Capability;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Esri geometry classifiers a dataframe can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    Multipoint,
    Polyline,
    Polygon,
}

impl GeometryType {
    pub const ALL: [GeometryType; 4] = [
        GeometryType::Point,
        GeometryType::Multipoint,
        GeometryType::Polyline,
        GeometryType::Polygon,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::Multipoint => "Multipoint",
            GeometryType::Polyline => "Polyline",
            GeometryType::Polygon => "Polygon",
        }
    }

    pub fn esri_name(&self) -> &'static str {
        match self {
            GeometryType::Point => "esriGeometryPoint",
            GeometryType::Multipoint => "esriGeometryMultipoint",
            GeometryType::Polyline => "esriGeometryPolyline",
            GeometryType::Polygon => "esriGeometryPolygon",
        }
    }

    /// The conversion capability backing this geometry type.
    pub fn capability(&self) -> Capability {
        match self {
            GeometryType::Point => Capability::PointConversion,
            GeometryType::Multipoint => Capability::MultipointConversion,
            GeometryType::Polyline => Capability::PolylineConversion,
            GeometryType::Polygon => Capability::PolygonConversion,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.capability().is_implemented()
    }

    /// Esri classifier of a decoded geometry, `None` for collections.
    pub fn from_geo(geom: &geo::Geometry) -> Option<GeometryType> {
        match geom {
            geo::Geometry::Point(_) => Some(GeometryType::Point),
            geo::Geometry::MultiPoint(_) => Some(GeometryType::Multipoint),
            geo::Geometry::Line(_)
            | geo::Geometry::LineString(_)
            | geo::Geometry::MultiLineString(_) => Some(GeometryType::Polyline),
            geo::Geometry::Polygon(_)
            | geo::Geometry::MultiPolygon(_)
            | geo::Geometry::Rect(_)
            | geo::Geometry::Triangle(_) => Some(GeometryType::Polygon),
            geo::Geometry::GeometryCollection(_) => None,
        }
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryType {
    type Err = String;

    /// Accepts both the short and the `esriGeometry*` names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized
            .strip_prefix("esrigeometry")
            .unwrap_or(&normalized);
        GeometryType::ALL
            .into_iter()
            .find(|t| t.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| {
                format!(
                    "Geometry type must be one of Point, Multipoint, Polyline, Polygon, not {}",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry_type::GeometryType;
    use geo::{line_string, point};

    #[test]
    fn parse() {
        assert_eq!("Point".parse::<GeometryType>().unwrap(), GeometryType::Point);
        assert_eq!(
            "esriGeometryPolygon".parse::<GeometryType>().unwrap(),
            GeometryType::Polygon
        );
        assert_eq!(
            " multipoint ".parse::<GeometryType>().unwrap(),
            GeometryType::Multipoint
        );
        assert!("circle".parse::<GeometryType>().is_err());
    }

    #[test]
    fn supported() {
        assert!(GeometryType::Point.is_supported());
        assert!(!GeometryType::Multipoint.is_supported());
        assert!(!GeometryType::Polyline.is_supported());
        assert!(!GeometryType::Polygon.is_supported());
    }

    #[test]
    fn from_geo() {
        let p = geo::Geometry::Point(point!(x: 1f64, y: 2f64));
        assert_eq!(GeometryType::from_geo(&p), Some(GeometryType::Point));
        let ls = geo::Geometry::LineString(line_string![(x: 0., y: 0.), (x: 1., y: 1.)]);
        assert_eq!(GeometryType::from_geo(&ls), Some(GeometryType::Polyline));
        let gc = geo::Geometry::GeometryCollection(geo::GeometryCollection::new_from(vec![p]));
        assert_eq!(GeometryType::from_geo(&gc), None);
    }
}
