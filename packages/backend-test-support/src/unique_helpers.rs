//! Test helpers for generating unique test data
//!
//! ULID-based helpers that keep test logins unique so runs never collide on
//! the `users.login` unique index.

use ulid::Ulid;

/// Generate a unique string with the given prefix, `{prefix}-{ulid}`.
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("user");
/// let b = unique_str("user");
/// assert_ne!(a, b);
/// assert!(a.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique login of a bounded length.
///
/// Logins are validated to 3..=50 characters at registration, so the helper
/// keeps the prefix short and relies on the ULID for uniqueness.
pub fn unique_login(prefix: &str) -> String {
    let login = unique_str(prefix);
    login.chars().take(50).collect()
}
