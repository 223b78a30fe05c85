//! Field rules shared by the entity kinds.

use super::ServiceError;
use sea_orm::ActiveEnum;

/// Fails when a required string field is empty. Whitespace is not trimmed,
/// so `" "` passes.
pub fn require(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.is_empty() {
        return Err(ServiceError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Parses an enumerated field from its string tag.
///
/// An empty tag yields `None` so the caller decides whether that means
/// "use the default", "leave unchanged" or "reject".
pub fn choice<E>(field: &str, value: &str) -> Result<Option<E>, ServiceError>
where
    E: ActiveEnum<Value = String>,
{
    if value.is_empty() {
        return Ok(None);
    }
    E::try_from_value(&value.to_string())
        .map(Some)
        .map_err(|_| invalid_choice::<E>(field))
}

fn invalid_choice<E>(field: &str) -> ServiceError
where
    E: ActiveEnum<Value = String>,
{
    ServiceError::validation(format!("invalid {field}: must be {}", one_of(&E::values())))
}

fn one_of(tags: &[String]) -> String {
    match tags {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    }
}
