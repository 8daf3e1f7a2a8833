use arrow_array::{Float64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use datafusion::datasource::MemTable;
use datafusion::prelude::SessionContext;
use datafusion_featureset::function::register_udfs;
use std::sync::Arc;
use tokio::runtime::Runtime;

pub fn create_tokio_runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(8)
        .enable_all()
        .build()
        .unwrap()
}

pub fn create_session_with_data() -> SessionContext {
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Float64, true),
        Field::new("y", DataType::Float64, true),
        Field::new("name", DataType::Utf8, true),
    ]));

    let mut partitions = vec![];
    for p in 0..8 {
        let mut batches = vec![];
        for b in 0..16 {
            let start = (p * 16 + b) * 1024;
            let xs = (start..start + 1024).map(|i| i as f64).collect::<Vec<_>>();
            let ys = xs.iter().map(|x| x + 1.0).collect::<Vec<_>>();
            let names = xs.iter().map(|x| format!("point {}", x)).collect::<Vec<_>>();
            let record = RecordBatch::try_new(
                schema.clone(),
                vec![
                    Arc::new(Float64Array::from(xs)),
                    Arc::new(Float64Array::from(ys)),
                    Arc::new(StringArray::from(names)),
                ],
            )
            .unwrap();
            batches.push(record);
        }
        partitions.push(batches);
    }
    let mem_table = MemTable::try_new(schema.clone(), partitions).unwrap();

    let ctx = SessionContext::new();
    register_udfs(&ctx);
    ctx.register_table("points", Arc::new(mem_table)).unwrap();
    ctx
}
