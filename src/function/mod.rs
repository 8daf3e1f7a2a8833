mod as_esri_json;
mod esri_geometry_type;

pub use as_esri_json::*;
pub use esri_geometry_type::*;

use datafusion::prelude::SessionContext;
use datafusion_expr::ScalarUDF;

/// Registers every spatial scalar function on `ctx`.
pub fn register_udfs(ctx: &SessionContext) {
    ctx.register_udf(ScalarUDF::from(AsEsriJsonUdf::new()));
    ctx.register_udf(ScalarUDF::from(EsriGeometryTypeUdf::new()));
}
