use crate::error::{SpatialError, SpatialResult};
use arrow_buffer::NullBuffer;

pub(crate) fn check_nulls(nulls: &Option<NullBuffer>, expected_len: usize) -> SpatialResult<()> {
    if let Some(nulls_buf) = &nulls {
        if nulls_buf.len() != expected_len {
            return Err(SpatialError::InvalidArray(
                "nulls mask length must match the number of values".to_string(),
            ));
        }
    }
    Ok(())
}
