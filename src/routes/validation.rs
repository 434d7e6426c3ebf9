use crate::constants::{ERR_RENAME_FIELDS_REQUIRED, ERR_ROOM_PART_HAS_SEPARATOR, ROOM_KEY_SEPARATOR};
use crate::error::AppError;

/// A body field that was present and non-empty
pub fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Both halves of a rename request
pub fn rename_pair(old: Option<String>, new: Option<String>) -> Result<(String, String), AppError> {
    match (required(old), required(new)) {
        (Some(old), Some(new)) => Ok((old, new)),
        _ => Err(AppError::InvalidInput(ERR_RENAME_FIELDS_REQUIRED.to_string())),
    }
}

/// Building and room become the two path segments of a room lookup,
/// so neither may contain the key separator
pub fn validate_room_parts(building: &str, room: &str) -> Result<(), AppError> {
    if building.contains(ROOM_KEY_SEPARATOR) || room.contains(ROOM_KEY_SEPARATOR) {
        return Err(AppError::InvalidInput(ERR_ROOM_PART_HAS_SEPARATOR.to_string()));
    }
    Ok(())
}
