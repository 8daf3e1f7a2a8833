use crate::array::WkbArray;
use crate::geometry_type::GeometryType;
use arrow_array::cast::AsArray;
use arrow_array::{Array, GenericBinaryArray, OffsetSizeTrait, StringArray};
use arrow_schema::DataType;
use datafusion_expr::{ColumnarValue, ScalarUDFImpl, Signature, Volatility};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
pub struct EsriGeometryTypeUdf {
    signature: Signature,
    aliases: Vec<String>,
}

impl EsriGeometryTypeUdf {
    pub fn new() -> Self {
        Self {
            signature: Signature::uniform(
                1,
                vec![DataType::Binary, DataType::LargeBinary],
                Volatility::Immutable,
            ),
            aliases: vec!["st_esrigeometrytype".to_string()],
        }
    }
}

impl ScalarUDFImpl for EsriGeometryTypeUdf {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        "ST_EsriGeometryType"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn return_type(&self, _arg_types: &[DataType]) -> datafusion_common::Result<DataType> {
        Ok(DataType::Utf8)
    }

    fn invoke(&self, args: &[ColumnarValue]) -> datafusion_common::Result<ColumnarValue> {
        let arr = args[0].clone().into_array(1)?;
        match arr.data_type() {
            DataType::Binary => esri_geometry_types(arr.as_binary::<i32>()),
            DataType::LargeBinary => esri_geometry_types(arr.as_binary::<i64>()),
            _ => unreachable!(),
        }
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }
}

impl Default for EsriGeometryTypeUdf {
    fn default() -> Self {
        Self::new()
    }
}

fn esri_geometry_types<O: OffsetSizeTrait>(
    wkb_arr: &GenericBinaryArray<O>,
) -> datafusion_common::Result<ColumnarValue> {
    let mut type_vec = vec![];
    for i in 0..wkb_arr.len() {
        type_vec.push(
            wkb_arr
                .geo_value(i)?
                .and_then(|geom| GeometryType::from_geo(&geom))
                .map(|t| t.esri_name()),
        );
    }
    Ok(ColumnarValue::Array(Arc::new(StringArray::from(type_vec))))
}

#[cfg(test)]
mod tests {
    use crate::function::register_udfs;
    use arrow::array::{Array, LargeBinaryArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use arrow_array::cast::AsArray;
    use datafusion::datasource::MemTable;
    use datafusion::prelude::SessionContext;
    use geo::{line_string, point, polygon};
    use geozero::{CoordDimensions, ToWkb};
    use std::sync::Arc;

    #[tokio::test]
    async fn esri_geometry_type() {
        let geoms = vec![
            geo::Geometry::Point(point!(x: 1f64, y: 1f64)),
            geo::Geometry::LineString(line_string![(x: 0., y: 0.), (x: 1., y: 1.)]),
            geo::Geometry::Polygon(polygon![(x: 0., y: 0.), (x: 1., y: 0.), (x: 1., y: 1.)]),
        ];
        let wkbs = geoms
            .iter()
            .map(|g| g.to_wkb(CoordDimensions::xy()).unwrap())
            .collect::<Vec<_>>();
        let mut values = wkbs.iter().map(|w| Some(w.as_slice())).collect::<Vec<_>>();
        values.push(None);

        let schema = Arc::new(Schema::new(vec![Field::new(
            "geom",
            DataType::LargeBinary,
            true,
        )]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(LargeBinaryArray::from(values))],
        )
        .unwrap();
        let mem_table = MemTable::try_new(schema, vec![vec![batch]]).unwrap();

        let ctx = SessionContext::new();
        ctx.register_table("geom_table", Arc::new(mem_table))
            .unwrap();
        register_udfs(&ctx);
        let batches = ctx
            .sql("select ST_EsriGeometryType(geom) from geom_table")
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        let arr = batches[0].column(0).as_string::<i32>();
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.value(0), "esriGeometryPoint");
        assert_eq!(arr.value(1), "esriGeometryPolyline");
        assert_eq!(arr.value(2), "esriGeometryPolygon");
        assert!(arr.is_null(3));
    }
}
