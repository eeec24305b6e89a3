//! Input validation for lite-registration requests.

use crate::types::LiteRegistrationRequest;

const MAX_EMAIL_LEN: usize = 50;
const MAX_NAME_LEN: usize = 30;
const MAX_INVITER_LEN: usize = 50;
const MAX_LOCATION_LEN: usize = 2;

/// Basic address-format check.
///
/// Accepts addresses with exactly one `@`, a non-empty local part and a
/// dotted domain. This is a structural gate, not RFC validation; the
/// directory applies its own rules on registration.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    !email.chars().any(char::is_whitespace)
}

/// Validate the optional profile fields of a v3 request against the
/// directory's length caps. The email itself is checked separately so
/// blank and malformed addresses get their own messages.
pub fn validate_profile_fields(request: &LiteRegistrationRequest) -> Result<(), String> {
    if request.email.trim().len() > MAX_EMAIL_LEN {
        return Err(format!(
            "email exceeds the {MAX_EMAIL_LEN} character limit."
        ));
    }
    if exceeds(&request.first_name, MAX_NAME_LEN) {
        return Err(format!(
            "firstName exceeds the {MAX_NAME_LEN} character limit."
        ));
    }
    if exceeds(&request.last_name, MAX_NAME_LEN) {
        return Err(format!(
            "lastName exceeds the {MAX_NAME_LEN} character limit."
        ));
    }
    if exceeds(&request.inviter_email, MAX_INVITER_LEN) {
        return Err(format!(
            "inviterEmail exceeds the {MAX_INVITER_LEN} character limit."
        ));
    }
    if exceeds(&request.location, MAX_LOCATION_LEN) {
        return Err(format!(
            "location exceeds the {MAX_LOCATION_LEN} character limit."
        ));
    }

    Ok(())
}

fn exceeds(field: &Option<String>, limit: usize) -> bool {
    field.as_ref().is_some_and(|value| value.len() > limit)
}
