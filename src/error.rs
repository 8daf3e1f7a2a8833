use crate::capability::Capability;
use arrow_schema::{ArrowError, DataType};
use datafusion_common::DataFusionError;
use thiserror::Error;

pub type SpatialResult<T> = std::result::Result<T, SpatialError>;

/// Coarse classification of a [`SpatialError`].
///
/// Lets callers tell a capability that does not exist yet apart from a misconfigured accessor
/// or bad row data without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotImplemented,
    Precondition,
    Conversion,
    Execution,
}

#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("{0} is not implemented")]
    NotImplemented(Capability),

    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("Invalid spatial reference: {0}")]
    InvalidSpatialReference(String),

    #[error("Unsupported type {data_type} for attribute column {column}")]
    UnsupportedColumnType { column: String, data_type: DataType },

    #[error("Cannot build geometry for row {row}: {reason}")]
    Conversion { row: u64, reason: String },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid geometry array: {0}")]
    InvalidArray(String),

    #[error(transparent)]
    DataFusion(#[from] DataFusionError),

    #[error(transparent)]
    Arrow(#[from] ArrowError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SpatialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpatialError::NotImplemented(_) => ErrorKind::NotImplemented,
            SpatialError::Precondition(_)
            | SpatialError::InvalidSpatialReference(_)
            | SpatialError::UnsupportedColumnType { .. } => ErrorKind::Precondition,
            SpatialError::Conversion { .. } | SpatialError::InvalidGeometry(_) => {
                ErrorKind::Conversion
            }
            SpatialError::InvalidArray(_)
            | SpatialError::DataFusion(_)
            | SpatialError::Arrow(_)
            | SpatialError::Json(_) => ErrorKind::Execution,
        }
    }
}

impl From<SpatialError> for DataFusionError {
    fn from(value: SpatialError) -> Self {
        match value {
            SpatialError::DataFusion(e) => e,
            other => DataFusionError::External(Box::new(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("geometry type is not set, call geometry(..) first")]
    GeometryTypeUnset,

    #[error("spatial reference is not set, call sr(..) first")]
    SpatialReferenceUnset,

    #[error("column {0} not found")]
    ColumnNotFound(String),

    #[error("no geometry column or {x}/{y} columns found, available columns: {available:?}")]
    MissingGeometryColumns {
        x: String,
        y: String,
        available: Vec<String>,
    },

    #[error("column {column} of type {data_type} cannot hold point geometries")]
    InvalidGeometryColumn { column: String, data_type: String },
}
