// ABOUTME: Native callables injected into the root environment before execution

use crate::error::RuntimeError;
use crate::value::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Zero-argument native returning the current wall-clock time as a count of
/// seconds (with sub-second precision) since the Unix epoch (spec §4.5 only
/// specifies "an unspecified epoch").
pub fn clock(_args: &[Value]) -> Result<Value, RuntimeError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Ok(Value::Number(now.as_secs_f64()))
}
