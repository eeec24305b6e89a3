//! Search query construction.
//!
//! The directory exposes a SQL-like search syntax over account fields.
//! Query templating is kept apart from the client so the transport stays
//! a plain request/response mapper.

/// Build the account lookup query used for cross-tenant dedup: matches an
/// identifier against both the profile username and the profile email.
pub fn account_lookup(identifier: &str) -> String {
    let identifier = escape(identifier);
    format!(
        "SELECT * FROM accounts WHERE profile.username CONTAINS '{identifier}' \
         OR profile.email CONTAINS '{identifier}'"
    )
}

/// Escape single quotes so an identifier cannot terminate the query
/// literal.
fn escape(identifier: &str) -> String {
    identifier.replace('\'', "\\'")
}
