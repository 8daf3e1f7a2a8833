mod point;
pub mod util;
mod wkb;

pub use point::*;
pub use wkb::*;

use crate::error::{PreconditionError, SpatialResult};
use crate::options::ConversionOptions;
use arrow::array::{Array, ArrayRef, Float64Array, StructArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use arrow_array::cast::AsArray;
use arrow_buffer::NullBuffer;

/// Column name looked up when no geometry column is configured.
pub const SHAPE_COLUMN: &str = "SHAPE";

/// How a single geometry column stores its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointEncoding {
    /// `Binary`/`LargeBinary` WKB
    Wkb,
    /// `FixedSizeList<Float64, 2>`
    Coords,
    /// `Struct` with numeric x and y children
    Struct,
}

/// Where the point of every row comes from, resolved once against the dataframe schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometrySource {
    Xy {
        x: usize,
        y: usize,
    },
    Column {
        index: usize,
        encoding: PointEncoding,
        x_field: String,
        y_field: String,
    },
}

impl GeometrySource {
    /// Explicit geometry column first, then `SHAPE`, then the x/y column pair.
    pub fn resolve(schema: &Schema, options: &ConversionOptions) -> SpatialResult<Self> {
        if let Some(name) = &options.geometry_column {
            let index = find_column(schema, name)
                .ok_or_else(|| PreconditionError::ColumnNotFound(name.clone()))?;
            return Self::single_column(schema, index, options);
        }

        if let Some(index) = find_column(schema, SHAPE_COLUMN) {
            if point_encoding(schema.field(index).data_type(), options).is_some() {
                return Self::single_column(schema, index, options);
            }
        }

        match (
            find_column(schema, &options.x_column),
            find_column(schema, &options.y_column),
        ) {
            (Some(x), Some(y)) => {
                for index in [x, y] {
                    let field = schema.field(index);
                    if !field.data_type().is_numeric() {
                        return Err(PreconditionError::InvalidGeometryColumn {
                            column: field.name().clone(),
                            data_type: field.data_type().to_string(),
                        }
                        .into());
                    }
                }
                Ok(GeometrySource::Xy { x, y })
            }
            _ => Err(PreconditionError::MissingGeometryColumns {
                x: options.x_column.clone(),
                y: options.y_column.clone(),
                available: schema.fields().iter().map(|f| f.name().clone()).collect(),
            }
            .into()),
        }
    }

    fn single_column(
        schema: &Schema,
        index: usize,
        options: &ConversionOptions,
    ) -> SpatialResult<Self> {
        let field = schema.field(index);
        let encoding = point_encoding(field.data_type(), options).ok_or_else(|| {
            PreconditionError::InvalidGeometryColumn {
                column: field.name().clone(),
                data_type: field.data_type().to_string(),
            }
        })?;
        Ok(GeometrySource::Column {
            index,
            encoding,
            x_field: options.x_column.clone(),
            y_field: options.y_column.clone(),
        })
    }

    /// Column indices consumed by the geometry, excluded from attributes.
    pub fn columns(&self) -> Vec<usize> {
        match self {
            GeometrySource::Xy { x, y } => vec![*x, *y],
            GeometrySource::Column { index, .. } => vec![*index],
        }
    }

    pub fn describe(&self, schema: &Schema) -> String {
        match self {
            GeometrySource::Xy { x, y } => format!(
                "columns {}/{}",
                schema.field(*x).name(),
                schema.field(*y).name()
            ),
            GeometrySource::Column {
                index, encoding, ..
            } => format!("{:?} column {}", encoding, schema.field(*index).name()),
        }
    }

    pub fn reader(&self, batch: &RecordBatch) -> SpatialResult<PointReader> {
        match self {
            GeometrySource::Xy { x, y } => Ok(PointReader::Xy {
                x: to_f64(batch.column(*x))?,
                y: to_f64(batch.column(*y))?,
            }),
            GeometrySource::Column {
                index,
                encoding,
                x_field,
                y_field,
            } => {
                let column = batch.column(*index);
                match encoding {
                    PointEncoding::Wkb => Ok(PointReader::Wkb(column.clone())),
                    PointEncoding::Coords => Ok(PointReader::Coords(PointArray::try_from(
                        column.as_ref(),
                    )?)),
                    PointEncoding::Struct => {
                        let arr: &StructArray = column.as_struct();
                        let child = |name: &str| {
                            arr.column_by_name(name).cloned().ok_or_else(|| {
                                PreconditionError::ColumnNotFound(format!(
                                    "{}.{}",
                                    batch.schema().field(*index).name(),
                                    name
                                ))
                            })
                        };
                        Ok(PointReader::Struct {
                            x: to_f64(&child(x_field.as_str())?)?,
                            y: to_f64(&child(y_field.as_str())?)?,
                            nulls: arr.nulls().cloned(),
                        })
                    }
                }
            }
        }
    }
}

/// Per-batch view producing one point per row.
#[derive(Debug)]
pub enum PointReader {
    Xy {
        x: Float64Array,
        y: Float64Array,
    },
    Coords(PointArray),
    Struct {
        x: Float64Array,
        y: Float64Array,
        nulls: Option<NullBuffer>,
    },
    Wkb(ArrayRef),
}

impl PointReader {
    /// The point at `row`, or why none could be read.
    pub fn point(&self, row: usize) -> Result<geo::Point, String> {
        match self {
            PointReader::Xy { x, y } => xy_point(x, y, row),
            PointReader::Struct { x, y, nulls } => {
                if nulls.as_ref().map(|n| n.is_null(row)).unwrap_or(false) {
                    return Err("geometry is null".to_string());
                }
                xy_point(x, y, row)
            }
            PointReader::Coords(arr) if arr.is_null(row) => Err("geometry is null".to_string()),
            PointReader::Coords(arr) if arr.is_x_null(row) => {
                Err("x coordinate is null".to_string())
            }
            PointReader::Coords(arr) if arr.is_y_null(row) => {
                Err("y coordinate is null".to_string())
            }
            PointReader::Coords(arr) => match arr.value_as_geo(row) {
                Ok(Some(p)) => Ok(p),
                Ok(None) => Err("geometry is null".to_string()),
                Err(e) => Err(e.to_string()),
            },
            PointReader::Wkb(arr) => match arr.data_type() {
                DataType::Binary => wkb_point(arr.as_binary::<i32>(), row),
                DataType::LargeBinary => wkb_point(arr.as_binary::<i64>(), row),
                other => Err(format!("unexpected geometry column type {}", other)),
            },
        }
    }
}

fn xy_point(x: &Float64Array, y: &Float64Array, row: usize) -> Result<geo::Point, String> {
    if x.is_null(row) {
        return Err("x coordinate is null".to_string());
    }
    if y.is_null(row) {
        return Err("y coordinate is null".to_string());
    }
    Ok(geo::Point::new(x.value(row), y.value(row)))
}

fn wkb_point<A: WkbArray>(arr: &A, row: usize) -> Result<geo::Point, String> {
    match arr.geo_value(row) {
        Ok(Some(geo::Geometry::Point(p))) => Ok(p),
        Ok(Some(other)) => Err(format!(
            "expected a point geometry, found {}",
            geo_type_name(&other)
        )),
        Ok(None) => Err("geometry is null".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn geo_type_name(geom: &geo::Geometry) -> &'static str {
    match geom {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

fn to_f64(array: &ArrayRef) -> SpatialResult<Float64Array> {
    let casted = cast(array, &DataType::Float64)?;
    Ok(casted.as_primitive::<Float64Type>().clone())
}

/// Exact name match first, then case-insensitive.
pub(crate) fn find_column(schema: &Schema, name: &str) -> Option<usize> {
    schema.index_of(name).ok().or_else(|| {
        schema
            .fields()
            .iter()
            .position(|f| f.name().eq_ignore_ascii_case(name))
    })
}

fn point_encoding(data_type: &DataType, options: &ConversionOptions) -> Option<PointEncoding> {
    match data_type {
        DataType::Binary | DataType::LargeBinary => Some(PointEncoding::Wkb),
        DataType::FixedSizeList(field, 2) if field.data_type() == &DataType::Float64 => {
            Some(PointEncoding::Coords)
        }
        DataType::Struct(fields) => {
            let numeric = |name: &str| {
                fields
                    .iter()
                    .any(|f| f.name() == name && f.data_type().is_numeric())
            };
            if numeric(options.x_column.as_str()) && numeric(options.y_column.as_str()) {
                Some(PointEncoding::Struct)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::array::{GeometrySource, PointEncoding};
    use crate::buffer::CoordBuffer;
    use crate::error::{PreconditionError, SpatialError};
    use crate::options::ConversionOptions;
    use arrow::array::{
        Array, ArrayRef, BinaryArray, FixedSizeListArray, Float64Array, Int32Array, StringArray,
        StructArray,
    };
    use arrow::datatypes::{DataType, Field, Fields, Schema};
    use arrow::record_batch::RecordBatch;
    use geozero::{CoordDimensions, ToWkb};
    use std::sync::Arc;

    fn schema(fields: Vec<(&str, DataType)>) -> Schema {
        Schema::new(
            fields
                .into_iter()
                .map(|(name, dt)| Field::new(name, dt, true))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn resolve_xy() {
        let schema = schema(vec![
            ("name", DataType::Utf8),
            ("X", DataType::Float64),
            ("y", DataType::Int32),
        ]);
        let source = GeometrySource::resolve(&schema, &ConversionOptions::default()).unwrap();
        assert_eq!(source, GeometrySource::Xy { x: 1, y: 2 });
        assert_eq!(source.columns(), vec![1, 2]);
    }

    #[test]
    fn resolve_prefers_shape() {
        let schema = schema(vec![
            ("x", DataType::Float64),
            ("y", DataType::Float64),
            ("shape", DataType::Binary),
        ]);
        let source = GeometrySource::resolve(&schema, &ConversionOptions::default()).unwrap();
        assert!(matches!(
            source,
            GeometrySource::Column {
                index: 2,
                encoding: PointEncoding::Wkb,
                ..
            }
        ));
    }

    #[test]
    fn resolve_ignores_non_geometry_shape() {
        let schema = schema(vec![
            ("SHAPE", DataType::Utf8),
            ("x", DataType::Float64),
            ("y", DataType::Float64),
        ]);
        let source = GeometrySource::resolve(&schema, &ConversionOptions::default()).unwrap();
        assert_eq!(source, GeometrySource::Xy { x: 1, y: 2 });
    }

    #[test]
    fn resolve_errors() {
        let schema = schema(vec![("name", DataType::Utf8), ("x", DataType::Float64)]);
        let err = GeometrySource::resolve(&schema, &ConversionOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::Precondition(PreconditionError::MissingGeometryColumns { .. })
        ));

        let options = ConversionOptions::default().with_geometry_column("geom");
        let err = GeometrySource::resolve(&schema, &options).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::Precondition(PreconditionError::ColumnNotFound(_))
        ));

        let options = ConversionOptions::default().with_geometry_column("name");
        let err = GeometrySource::resolve(&schema, &options).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::Precondition(PreconditionError::InvalidGeometryColumn { .. })
        ));

        let schema = self::schema(vec![("x", DataType::Utf8), ("y", DataType::Float64)]);
        let err = GeometrySource::resolve(&schema, &ConversionOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::Precondition(PreconditionError::InvalidGeometryColumn { .. })
        ));
    }

    #[test]
    fn read_xy() {
        let schema = Arc::new(schema(vec![
            ("x", DataType::Int32),
            ("y", DataType::Float64),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(vec![Some(1), None])),
                Arc::new(Float64Array::from(vec![2.0, 3.0])),
            ],
        )
        .unwrap();
        let source = GeometrySource::resolve(&schema, &ConversionOptions::default()).unwrap();
        let reader = source.reader(&batch).unwrap();
        assert_eq!(reader.point(0), Ok(geo::Point::new(1.0, 2.0)));
        assert_eq!(reader.point(1), Err("x coordinate is null".to_string()));
    }

    #[test]
    fn read_coords() {
        let coords: FixedSizeListArray = CoordBuffer::try_from(vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .into();
        let schema = Arc::new(Schema::new(vec![Field::new(
            "geom",
            coords.data_type().clone(),
            true,
        )]));
        let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(coords)]).unwrap();
        let options = ConversionOptions::default().with_geometry_column("geom");
        let reader = GeometrySource::resolve(&schema, &options)
            .unwrap()
            .reader(&batch)
            .unwrap();
        assert_eq!(reader.point(1), Ok(geo::Point::new(3.0, 4.0)));
    }

    #[test]
    fn read_struct() {
        let shape = StructArray::from(vec![
            (
                Arc::new(Field::new("x", DataType::Float64, true)),
                Arc::new(Float64Array::from(vec![5.0, 6.0])) as ArrayRef,
            ),
            (
                Arc::new(Field::new("y", DataType::Float64, true)),
                Arc::new(Float64Array::from(vec![7.0, 8.0])) as ArrayRef,
            ),
        ]);
        let schema = Arc::new(Schema::new(vec![
            Field::new("SHAPE", shape.data_type().clone(), true),
            Field::new("name", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(shape), Arc::new(StringArray::from(vec!["a", "b"]))],
        )
        .unwrap();
        let source = GeometrySource::resolve(&schema, &ConversionOptions::default()).unwrap();
        assert_eq!(source.columns(), vec![0]);
        let reader = source.reader(&batch).unwrap();
        assert_eq!(reader.point(1), Ok(geo::Point::new(6.0, 8.0)));

        let other = DataType::Struct(Fields::from(vec![Field::new(
            "lon",
            DataType::Float64,
            true,
        )]));
        let schema = self::schema(vec![("SHAPE", other)]);
        assert!(GeometrySource::resolve(&schema, &ConversionOptions::default()).is_err());
    }

    #[test]
    fn read_wkb() {
        let point = geo::Geometry::Point(geo::Point::new(1.0, 2.0));
        let line =
            geo::Geometry::LineString(geo::LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]));
        let point_wkb = point.to_wkb(CoordDimensions::xy()).unwrap();
        let line_wkb = line.to_wkb(CoordDimensions::xy()).unwrap();
        let geom = BinaryArray::from(vec![
            Some(point_wkb.as_slice()),
            None,
            Some(line_wkb.as_slice()),
        ]);
        let schema = Arc::new(schema(vec![("SHAPE", DataType::Binary)]));
        let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(geom)]).unwrap();
        let reader = GeometrySource::resolve(&schema, &ConversionOptions::default())
            .unwrap()
            .reader(&batch)
            .unwrap();
        assert_eq!(reader.point(0), Ok(geo::Point::new(1.0, 2.0)));
        assert_eq!(reader.point(1), Err("geometry is null".to_string()));
        assert_eq!(
            reader.point(2),
            Err("expected a point geometry, found LineString".to_string())
        );
    }
}
