use crate::array::GeometrySource;
use crate::capability::Capability;
use crate::error::{PreconditionError, SpatialError, SpatialResult};
use crate::esri::{EsriGeometry, EsriPoint, Feature, FeatureSet};
use crate::field::attribute_columns;
use crate::geometry_type::GeometryType;
use crate::options::{ConversionOptions, InvalidRowPolicy};
use crate::spatial_ref::SpatialReference;
use arrow::datatypes::Schema;
use datafusion::dataframe::DataFrame;
use datafusion::prelude::SessionContext;
use futures::StreamExt;
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};
use tracing::{debug, warn};

/// Gives a [`DataFrame`] a spatial view.
pub trait SpatialExt {
    fn spatial(&self) -> GeoAccessor<'_>;
}

impl SpatialExt for DataFrame {
    fn spatial(&self) -> GeoAccessor<'_> {
        GeoAccessor::new(self)
    }
}

/// Spatial metadata bound to a borrowed [`DataFrame`].
///
/// Setters mutate the accessor in place and return it for chaining:
///
/// ```ignore
/// let fset = df
///     .spatial()
///     .geometry(GeometryType::Point)?
///     .sr(3857)
///     .to_dict()
///     .await?;
/// ```
///
/// The dataframe itself is never modified. Configuration needs `&mut self`, so sharing one
/// accessor between threads while configuring it requires the caller's own synchronization.
#[derive(Clone)]
pub struct GeoAccessor<'a> {
    df: &'a DataFrame,
    geometry_type: Option<GeometryType>,
    spatial_reference: Option<SpatialReference>,
    options: ConversionOptions,
}

impl<'a> GeoAccessor<'a> {
    pub fn new(df: &'a DataFrame) -> Self {
        Self {
            df,
            geometry_type: None,
            spatial_reference: None,
            options: ConversionOptions::default(),
        }
    }

    /// Sets the spatial reference. It is validated only once geometries are built.
    pub fn sr(&mut self, spatial_reference: impl Into<SpatialReference>) -> &mut Self {
        self.spatial_reference = Some(spatial_reference.into());
        self
    }

    /// Sets the geometry type. Types without a conversion path are rejected and leave the
    /// current metadata as it was.
    pub fn geometry(&mut self, geometry_type: GeometryType) -> SpatialResult<&mut Self> {
        geometry_type.capability().ensure()?;
        self.geometry_type = Some(geometry_type);
        Ok(self)
    }

    pub fn options(&mut self, options: ConversionOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn skip_invalid_rows(&mut self, skip: bool) -> &mut Self {
        self.options.invalid_rows = if skip {
            InvalidRowPolicy::Skip
        } else {
            InvalidRowPolicy::Fail
        };
        self
    }

    pub fn geometry_column(&mut self, column: impl Into<String>) -> &mut Self {
        self.options.geometry_column = Some(column.into());
        self
    }

    pub fn geometry_type(&self) -> Option<GeometryType> {
        self.geometry_type
    }

    pub fn spatial_reference(&self) -> Option<&SpatialReference> {
        self.spatial_reference.as_ref()
    }

    pub fn conversion_options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Executes the dataframe and collects one feature per row.
    ///
    /// Partitions are read in partition order and rows in stream order, so feature order is
    /// only stable for plans with a defined output order, e.g. sorted dataframes.
    pub async fn to_featureset(&self) -> SpatialResult<FeatureSet> {
        let geometry_type = self
            .geometry_type
            .ok_or(PreconditionError::GeometryTypeUnset)?;
        let spatial_reference = self
            .spatial_reference
            .clone()
            .ok_or(PreconditionError::SpatialReferenceUnset)?;
        geometry_type.capability().ensure()?;
        spatial_reference.validate()?;

        let schema: Schema = self.df.schema().into();
        let source = GeometrySource::resolve(&schema, &self.options)?;
        let mut columns = attribute_columns(&schema, &source.columns())?;

        let partitions = self.df.clone().execute_stream_partitioned().await?;
        debug!(
            geometry = %source.describe(&schema),
            partitions = partitions.len(),
            "Converting dataframe to feature set"
        );

        let mut features = vec![];
        let mut row_index = 0u64;
        let mut skipped = 0usize;
        for (partition, mut stream) in partitions.into_iter().enumerate() {
            let mut partition_rows = 0usize;
            while let Some(batch) = stream.next().await {
                let batch = batch?;
                let reader = source.reader(&batch)?;
                for row in 0..batch.num_rows() {
                    let current = row_index;
                    row_index += 1;

                    let point = reader
                        .point(row)
                        .and_then(|p| EsriPoint::from_geo(p, &spatial_reference));
                    let point = match (point, self.options.invalid_rows) {
                        (Ok(point), _) => point,
                        (Err(reason), InvalidRowPolicy::Fail) => {
                            return Err(SpatialError::Conversion {
                                row: current,
                                reason,
                            });
                        }
                        (Err(reason), InvalidRowPolicy::Skip) => {
                            warn!(row = current, %reason, "Skipping row with invalid geometry");
                            skipped += 1;
                            continue;
                        }
                    };

                    let mut attributes = Map::with_capacity(columns.len());
                    for column in columns.iter_mut() {
                        let array = batch.column(column.index);
                        let value = column.value(array, row);
                        attributes.insert(column.name.clone(), value);
                    }
                    features.push(Feature {
                        geometry: EsriGeometry::Point(point),
                        attributes,
                    });
                }
                partition_rows += batch.num_rows();
            }
            debug!(partition, rows = partition_rows, "Converted partition");
        }
        debug!(
            features = features.len(),
            skipped, "Converted dataframe to feature set"
        );

        Ok(FeatureSet {
            object_id_field_name: String::new(),
            global_id_field_name: String::new(),
            display_field_name: String::new(),
            geometry_type: self
                .options
                .geometry_type_naming
                .name(geometry_type)
                .to_string(),
            spatial_reference,
            fields: columns.iter().map(|c| c.to_field()).collect(),
            features,
        })
    }

    /// [`GeoAccessor::to_featureset`] as a JSON object.
    pub async fn to_dict(&self) -> SpatialResult<Map<String, Value>> {
        self.to_featureset().await?.to_dict()
    }

    pub async fn to_featurelayer(&self, _title: &str) -> SpatialResult<()> {
        Err(SpatialError::NotImplemented(Capability::ToFeatureLayer))
    }

    pub async fn to_feature_collection(&self) -> SpatialResult<Map<String, Value>> {
        Err(SpatialError::NotImplemented(Capability::ToFeatureCollection))
    }

    pub async fn from_layer(_ctx: &SessionContext, _url: &str) -> SpatialResult<DataFrame> {
        Err(SpatialError::NotImplemented(Capability::FromLayer))
    }

    pub fn aggregate(&self, _group_by: &[&str]) -> SpatialResult<DataFrame> {
        Err(SpatialError::NotImplemented(Capability::SpatialAggregation))
    }

    pub fn spatial_join(&self, _other: &DataFrame) -> SpatialResult<DataFrame> {
        Err(SpatialError::NotImplemented(Capability::SpatialJoin))
    }

    pub fn build_index(&self) -> SpatialResult<()> {
        Err(SpatialError::NotImplemented(Capability::SpatialIndex))
    }
}

impl Debug for GeoAccessor<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoAccessor")
            .field("geometry_type", &self.geometry_type)
            .field("spatial_reference", &self.spatial_reference)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
