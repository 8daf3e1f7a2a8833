//! Spatial metadata and Esri feature set export for datafusion dataframes.
//!
//! ```ignore
//! use datafusion_featureset::{GeometryType, SpatialExt};
//!
//! let fset = df
//!     .spatial()
//!     .geometry(GeometryType::Point)?
//!     .sr(4326)
//!     .to_dict()
//!     .await?;
//! ```

pub mod accessor;
pub mod array;
pub(crate) mod buffer;
pub mod capability;
pub mod error;
pub mod esri;
pub mod field;
pub mod function;
pub mod geometry_type;
pub mod options;
pub mod scalar;
pub mod spatial_ref;

pub use accessor::{GeoAccessor, SpatialExt};
pub use capability::Capability;
pub use error::{ErrorKind, PreconditionError, SpatialError, SpatialResult};
pub use esri::{EsriGeometry, EsriPoint, Feature, FeatureSet, Field, FieldType};
pub use geometry_type::GeometryType;
pub use options::{ConversionOptions, GeometryTypeNaming, InvalidRowPolicy};
pub use spatial_ref::SpatialReference;
