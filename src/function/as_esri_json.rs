use crate::esri::EsriPoint;
use crate::spatial_ref::SpatialReference;
use arrow_array::cast::AsArray;
use arrow_array::types::Float64Type;
use arrow_array::{Array, StringArray};
use arrow_schema::DataType;
use datafusion_common::{internal_err, DataFusionError, ScalarValue};
use datafusion_expr::{ColumnarValue, ScalarUDFImpl, Signature, TypeSignature, Volatility};
use rayon::prelude::*;
use std::any::Any;
use std::sync::Arc;

/// WKID used when `ST_AsEsriJSON` is called without one.
pub const DEFAULT_WKID: i32 = 4326;

#[derive(Debug)]
pub struct AsEsriJsonUdf {
    signature: Signature,
    aliases: Vec<String>,
}

impl AsEsriJsonUdf {
    pub fn new() -> Self {
        Self {
            signature: Signature::one_of(
                vec![
                    TypeSignature::Exact(vec![DataType::Float64, DataType::Float64]),
                    TypeSignature::Exact(vec![
                        DataType::Float64,
                        DataType::Float64,
                        DataType::Int64,
                    ]),
                ],
                Volatility::Immutable,
            ),
            aliases: vec!["st_asesrijson".to_string()],
        }
    }
}

impl ScalarUDFImpl for AsEsriJsonUdf {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        "ST_AsEsriJSON"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn return_type(&self, _arg_types: &[DataType]) -> datafusion_common::Result<DataType> {
        Ok(DataType::Utf8)
    }

    fn invoke(&self, args: &[ColumnarValue]) -> datafusion_common::Result<ColumnarValue> {
        let wkid = if args.len() == 3 {
            let ColumnarValue::Scalar(ScalarValue::Int64(Some(wkid))) = &args[2] else {
                return internal_err!("The third arg should be int64 scalar");
            };
            i32::try_from(*wkid).map_err(|_| {
                DataFusionError::Execution(format!("wkid {} is out of range", wkid))
            })?
        } else {
            DEFAULT_WKID
        };
        let spatial_reference = SpatialReference::from_wkid(wkid);
        spatial_reference.validate()?;

        let len = match (&args[0], &args[1]) {
            (ColumnarValue::Array(arr), _) | (_, ColumnarValue::Array(arr)) => arr.len(),
            _ => 1,
        };
        let x_arr = args[0].clone().into_array(len)?;
        let y_arr = args[1].clone().into_array(len)?;
        let x_arr = x_arr.as_primitive::<Float64Type>();
        let y_arr = y_arr.as_primitive::<Float64Type>();

        let json_vec = (0..len)
            .into_par_iter()
            .map(|i| {
                if x_arr.is_null(i) || y_arr.is_null(i) {
                    return Ok(None);
                }
                let point = geo::Point::new(x_arr.value(i), y_arr.value(i));
                match EsriPoint::from_geo(point, &spatial_reference) {
                    Ok(p) => serde_json::to_string(&p).map(Some),
                    Err(_) => Ok(None),
                }
            })
            .collect::<Result<Vec<Option<String>>, serde_json::Error>>()
            .map_err(|e| DataFusionError::External(Box::new(e)))?;
        Ok(ColumnarValue::Array(Arc::new(StringArray::from(json_vec))))
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }
}

impl Default for AsEsriJsonUdf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::function::register_udfs;
    use arrow::array::{Array, Float64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use arrow_array::cast::AsArray;
    use datafusion::prelude::SessionContext;
    use std::sync::Arc;

    fn context() -> SessionContext {
        let schema = Arc::new(Schema::new(vec![
            Field::new("x", DataType::Float64, true),
            Field::new("y", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![Some(1.0), None, Some(f64::NAN)])),
                Arc::new(Float64Array::from(vec![Some(2.5), Some(1.0), Some(1.0)])),
            ],
        )
        .unwrap();
        let ctx = SessionContext::new();
        ctx.register_batch("points", batch).unwrap();
        register_udfs(&ctx);
        ctx
    }

    #[tokio::test]
    async fn as_esri_json() {
        let ctx = context();
        let batches = ctx
            .sql("select ST_AsEsriJSON(x, y, 3857) from points")
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        let arr = batches[0].column(0).as_string::<i32>();
        assert_eq!(arr.len(), 3);
        assert_eq!(
            arr.value(0),
            r#"{"x":1.0,"y":2.5,"spatialReference":{"wkid":3857}}"#
        );
        assert!(arr.is_null(1));
        assert!(arr.is_null(2));
    }

    #[tokio::test]
    async fn default_wkid() {
        let ctx = context();
        let batches = ctx
            .sql("select ST_AsEsriJSON(x, y) from points")
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();
        let arr = batches[0].column(0).as_string::<i32>();
        assert_eq!(
            arr.value(0),
            r#"{"x":1.0,"y":2.5,"spatialReference":{"wkid":4326}}"#
        );
    }

    #[tokio::test]
    async fn invalid_wkid() {
        let ctx = context();
        let result = ctx
            .sql("select ST_AsEsriJSON(x, y, 0) from points")
            .await
            .unwrap()
            .collect()
            .await;
        assert!(result.is_err());
    }
}
