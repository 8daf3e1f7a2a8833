use crate::array::util::check_nulls;
use crate::buffer::CoordBuffer;
use crate::error::{SpatialError, SpatialResult};
use crate::scalar::Point;
use arrow::array::{Array, FixedSizeListArray};
use arrow_buffer::NullBuffer;
use arrow::datatypes::DataType;
use std::borrow::Cow;
use std::sync::Arc;

/// Point column stored as `FixedSizeList<Float64, 2>`.
#[derive(Debug, Clone)]
pub struct PointArray {
    pub(crate) coords: CoordBuffer,
    pub(crate) nulls: Option<NullBuffer>,
    /// Validity of the interleaved child values, two slots per point.
    pub(crate) coord_nulls: Option<NullBuffer>,
}

impl PointArray {
    pub fn try_new(coords: CoordBuffer, nulls: Option<NullBuffer>) -> SpatialResult<Self> {
        check_nulls(&nulls, coords.len())?;
        Ok(Self {
            coords,
            nulls,
            coord_nulls: None,
        })
    }

    pub fn with_coord_nulls(mut self, coord_nulls: Option<NullBuffer>) -> SpatialResult<Self> {
        check_nulls(&coord_nulls, self.coords.len() * 2)?;
        self.coord_nulls = coord_nulls;
        Ok(self)
    }

    pub fn data_type() -> DataType {
        DataType::FixedSizeList(Arc::new(CoordBuffer::values_field()), 2)
    }

    pub fn nulls(&self) -> Option<&NullBuffer> {
        self.nulls.as_ref()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[inline]
    pub fn is_null(&self, i: usize) -> bool {
        self.nulls().map(|x| x.is_null(i)).unwrap_or(false)
    }

    pub fn is_x_null(&self, i: usize) -> bool {
        self.coord_nulls
            .as_ref()
            .map(|x| x.is_null(i * 2))
            .unwrap_or(false)
    }

    pub fn is_y_null(&self, i: usize) -> bool {
        self.coord_nulls
            .as_ref()
            .map(|x| x.is_null(i * 2 + 1))
            .unwrap_or(false)
    }

    pub fn value(&self, index: usize) -> SpatialResult<Option<Point<'_>>> {
        if self.is_null(index) {
            Ok(None)
        } else {
            let point = Point::try_new(Cow::Borrowed(&self.coords), index)?;
            Ok(Some(point))
        }
    }

    pub fn value_as_geo(&self, index: usize) -> SpatialResult<Option<geo::Point>> {
        Ok(self.value(index)?.map(|p| p.into()))
    }
}

impl TryFrom<&FixedSizeListArray> for PointArray {
    type Error = SpatialError;

    fn try_from(value: &FixedSizeListArray) -> Result<Self, Self::Error> {
        let coords: CoordBuffer = value.try_into()?;

        Self::try_new(coords, value.nulls().cloned())?
            .with_coord_nulls(value.values().nulls().cloned())
    }
}

impl TryFrom<&dyn Array> for PointArray {
    type Error = SpatialError;

    fn try_from(value: &dyn Array) -> Result<Self, Self::Error> {
        match value.as_any().downcast_ref::<FixedSizeListArray>() {
            Some(arr) => arr.try_into(),
            None => Err(SpatialError::InvalidArray(format!(
                "Invalid data type {} for PointArray",
                value.data_type()
            ))),
        }
    }
}
