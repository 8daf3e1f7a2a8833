use crate::error::{SpatialError, SpatialResult};
use std::fmt::{Display, Formatter};

/// Every operation the accessor knows about, implemented or not.
///
/// New capabilities are added here first so that exhaustive matches flag every place that needs
/// to handle them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    PointConversion,
    MultipointConversion,
    PolylineConversion,
    PolygonConversion,
    FromLayer,
    ToFeatureLayer,
    ToFeatureCollection,
    SpatialAggregation,
    SpatialJoin,
    SpatialIndex,
}

impl Capability {
    pub fn is_implemented(&self) -> bool {
        match self {
            Capability::PointConversion => true,
            Capability::MultipointConversion
            | Capability::PolylineConversion
            | Capability::PolygonConversion
            | Capability::FromLayer
            | Capability::ToFeatureLayer
            | Capability::ToFeatureCollection
            | Capability::SpatialAggregation
            | Capability::SpatialJoin
            | Capability::SpatialIndex => false,
        }
    }

    pub fn ensure(self) -> SpatialResult<()> {
        if self.is_implemented() {
            Ok(())
        } else {
            Err(SpatialError::NotImplemented(self))
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Capability::PointConversion => "point conversion",
            Capability::MultipointConversion => "multipoint conversion",
            Capability::PolylineConversion => "polyline conversion",
            Capability::PolygonConversion => "polygon conversion",
            Capability::FromLayer => "reading from a feature layer",
            Capability::ToFeatureLayer => "publishing to a feature layer",
            Capability::ToFeatureCollection => "feature collection export",
            Capability::SpatialAggregation => "spatial aggregation",
            Capability::SpatialJoin => "spatial join",
            Capability::SpatialIndex => "spatial indexing",
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use crate::capability::Capability;
    use crate::error::ErrorKind;

    #[test]
    fn only_point_conversion_is_implemented() {
        assert!(Capability::PointConversion.ensure().is_ok());
        for capability in [
            Capability::MultipointConversion,
            Capability::PolylineConversion,
            Capability::PolygonConversion,
            Capability::FromLayer,
            Capability::ToFeatureLayer,
            Capability::ToFeatureCollection,
            Capability::SpatialAggregation,
            Capability::SpatialJoin,
            Capability::SpatialIndex,
        ] {
            let err = capability.ensure().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotImplemented);
        }
    }
}
