//! Request body parsing and point-list validation.
//!
//! Bodies are parsed into an untyped [`serde_json::Value`] first so each
//! kind of malformed input gets its own error instead of a generic
//! deserialization failure.

use minspan_pipeline::Point;
use serde_json::Value;

use crate::error::ApiError;

/// Parse a raw request body and extract its validated `points` list.
///
/// # Errors
///
/// Returns [`ApiError::InvalidJson`] if the body is empty or not JSON,
/// and the matching validation error for a missing or malformed `points`
/// entry or one longer than `max_points`.
pub fn points_from_body(body: &[u8], max_points: usize) -> Result<Vec<Point>, ApiError> {
    let json: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
    let data = json.get("points").ok_or(ApiError::PointsNotFound)?;
    let points = validate_point_list(data)?;
    if points.len() > max_points {
        return Err(ApiError::TooManyPoints {
            count: points.len(),
            max: max_points,
        });
    }
    Ok(points)
}

/// Check that `data` is a list of `[x, y]` number pairs.
///
/// Points are checked in order and the first failure wins.
///
/// # Errors
///
/// Returns the [`ApiError`] describing the first malformed element.
pub fn validate_point_list(data: &Value) -> Result<Vec<Point>, ApiError> {
    let items = data.as_array().ok_or(ApiError::NotAList)?;
    items
        .iter()
        .map(|item| {
            let coords = item.as_array().ok_or(ApiError::NonListPoint)?;
            let [x, y] = coords.as_slice() else {
                return Err(ApiError::NonTwoDimensionalPoint);
            };
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => Ok(Point::new(x, y)),
                _ => Err(ApiError::NonNumericPoint),
            }
        })
        .collect()
}
