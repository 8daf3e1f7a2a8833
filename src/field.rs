//! Attribute columns: Esri field inference and per-row value extraction.

use crate::error::{SpatialError, SpatialResult};
use crate::esri::{Field, FieldType};
use arrow::array::{Array, ArrayRef};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float16Type, Float32Type, Float64Type, Int16Type,
    Int32Type, Int64Type, Int8Type, Schema, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow_array::cast::AsArray;
use serde_json::{Number, Value};

/// Length reported for string fields that hold no values.
pub const DEFAULT_STRING_LENGTH: usize = 255;

const MILLIS_PER_DAY: i64 = 86_400_000;

pub fn field_type(data_type: &DataType) -> Option<FieldType> {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 => Some(FieldType::String),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => Some(FieldType::Date),
        DataType::Boolean | DataType::Int8 | DataType::Int16 | DataType::UInt8 => {
            Some(FieldType::SmallInteger)
        }
        DataType::Int32 | DataType::UInt16 => Some(FieldType::Integer),
        DataType::Int64 | DataType::UInt32 | DataType::UInt64 => Some(FieldType::BigInteger),
        DataType::Float16 | DataType::Float32 => Some(FieldType::Single),
        DataType::Float64 => Some(FieldType::Double),
        _ => None,
    }
}

/// A non-geometry column carried into feature attributes.
#[derive(Debug, Clone)]
pub struct AttributeColumn {
    pub index: usize,
    pub name: String,
    pub field_type: FieldType,
    max_length: Option<usize>,
}

impl AttributeColumn {
    pub fn try_new(index: usize, name: &str, data_type: &DataType) -> SpatialResult<Self> {
        let field_type =
            field_type(data_type).ok_or_else(|| SpatialError::UnsupportedColumnType {
                column: name.to_string(),
                data_type: data_type.clone(),
            })?;
        Ok(Self {
            index,
            name: name.to_string(),
            field_type,
            max_length: None,
        })
    }

    /// Extracts the value at `row`, remembering the longest string seen.
    pub fn value(&mut self, array: &ArrayRef, row: usize) -> Value {
        let value = attribute_value(array.as_ref(), row);
        if let Value::String(s) = &value {
            let len = s.chars().count();
            self.max_length = Some(self.max_length.map_or(len, |max| max.max(len)));
        }
        value
    }

    pub fn to_field(&self) -> Field {
        let length = match self.field_type {
            FieldType::String => Some(self.max_length.unwrap_or(DEFAULT_STRING_LENGTH)),
            _ => None,
        };
        Field {
            name: self.name.clone(),
            alias: self.name.clone(),
            field_type: self.field_type,
            length,
        }
    }
}

/// Every column of `schema` not listed in `exclude`, in schema order.
pub fn attribute_columns(
    schema: &Schema,
    exclude: &[usize],
) -> SpatialResult<Vec<AttributeColumn>> {
    schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(index, _)| !exclude.contains(index))
        .map(|(index, field)| AttributeColumn::try_new(index, field.name(), field.data_type()))
        .collect()
}

/// JSON value of one cell. Dates become epoch milliseconds, floored for sub-millisecond units.
/// Booleans become 0/1. Non-finite floats and timestamps outside the millisecond range are null.
pub fn attribute_value(array: &dyn Array, row: usize) -> Value {
    if array.is_null(row) {
        return Value::Null;
    }
    match array.data_type() {
        DataType::Boolean => Value::from(u8::from(array.as_boolean().value(row))),
        DataType::Int8 => Value::from(array.as_primitive::<Int8Type>().value(row)),
        DataType::Int16 => Value::from(array.as_primitive::<Int16Type>().value(row)),
        DataType::Int32 => Value::from(array.as_primitive::<Int32Type>().value(row)),
        DataType::Int64 => Value::from(array.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::from(array.as_primitive::<UInt8Type>().value(row)),
        DataType::UInt16 => Value::from(array.as_primitive::<UInt16Type>().value(row)),
        DataType::UInt32 => Value::from(array.as_primitive::<UInt32Type>().value(row)),
        DataType::UInt64 => Value::from(array.as_primitive::<UInt64Type>().value(row)),
        DataType::Float16 => {
            float_value(array.as_primitive::<Float16Type>().value(row).to_f64())
        }
        DataType::Float32 => float_value(array.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => float_value(array.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => Value::from(array.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Value::from(array.as_string::<i64>().value(row)),
        DataType::Date32 => {
            Value::from(array.as_primitive::<Date32Type>().value(row) as i64 * MILLIS_PER_DAY)
        }
        DataType::Date64 => Value::from(array.as_primitive::<Date64Type>().value(row)),
        DataType::Timestamp(unit, _) => {
            let millis = match unit {
                TimeUnit::Second => array
                    .as_primitive::<TimestampSecondType>()
                    .value(row)
                    .checked_mul(1_000),
                TimeUnit::Millisecond => {
                    Some(array.as_primitive::<TimestampMillisecondType>().value(row))
                }
                TimeUnit::Microsecond => Some(
                    array
                        .as_primitive::<TimestampMicrosecondType>()
                        .value(row)
                        .div_euclid(1_000),
                ),
                TimeUnit::Nanosecond => Some(
                    array
                        .as_primitive::<TimestampNanosecondType>()
                        .value(row)
                        .div_euclid(1_000_000),
                ),
            };
            millis.map(Value::from).unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}

fn float_value(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
