use crate::buffer::CoordBuffer;
use crate::error::{SpatialError, SpatialResult};
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct Point<'a> {
    coords: Cow<'a, CoordBuffer>,
    geom_index: usize,
}

impl<'a> Point<'a> {
    pub fn try_new(coords: Cow<'a, CoordBuffer>, geom_index: usize) -> SpatialResult<Self> {
        if geom_index >= coords.len() {
            return Err(SpatialError::InvalidArray(format!(
                "geom_index {} is out of range of coords {}",
                geom_index,
                coords.len()
            )));
        }
        Ok(Self { coords, geom_index })
    }

    pub fn x(&self) -> f64 {
        self.coords
            .x(self.geom_index)
            .expect("geom_index has been checked")
    }

    pub fn y(&self) -> f64 {
        self.coords
            .y(self.geom_index)
            .expect("geom_index has been checked")
    }
}

impl From<Point<'_>> for geo::Point {
    fn from(value: Point<'_>) -> Self {
        (&value).into()
    }
}

impl From<&Point<'_>> for geo::Point {
    fn from(value: &Point<'_>) -> Self {
        geo::Point::new(value.x(), value.y())
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::CoordBuffer;
    use crate::scalar::Point;
    use std::borrow::Cow;

    #[test]
    fn point() {
        let buffer = CoordBuffer::try_from(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let p = Point::try_new(Cow::Borrowed(&buffer), 1).unwrap();
        assert_eq!(geo::Point::from(&p), geo::Point::new(3.0, 4.0));
        assert!(Point::try_new(Cow::Borrowed(&buffer), 2).is_err());
    }
}
