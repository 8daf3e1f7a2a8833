use crate::error::{SpatialError, SpatialResult};
use arrow::array::{Array, GenericBinaryArray, OffsetSizeTrait};
use geozero::wkb::{FromWkb, WkbDialect};

/// Binary column holding one WKB geometry per row.
pub trait WkbArray {
    fn wkb(&self, index: usize) -> Option<&[u8]>;

    fn geo_value(&self, index: usize) -> SpatialResult<Option<geo::Geometry>> {
        if let Some(wkb) = self.wkb(index) {
            let mut rdr = std::io::Cursor::new(wkb);
            let value = geo::Geometry::from_wkb(&mut rdr, WkbDialect::Wkb).map_err(|e| {
                SpatialError::InvalidGeometry(format!("Failed to parse wkb, error: {}", e))
            })?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }
}

impl<O: OffsetSizeTrait> WkbArray for GenericBinaryArray<O> {
    fn wkb(&self, index: usize) -> Option<&[u8]> {
        if index >= self.len() {
            return None;
        }
        if self.is_null(index) {
            return None;
        }
        Some(self.value(index))
    }
}
