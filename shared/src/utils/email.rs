//! E-mail address helpers

/// Mask an e-mail address for logging
///
/// Keeps the first character of the local part and the whole domain so
/// log lines stay correlatable without exposing the address.
///
/// # Example
///
/// ```
/// use sf_shared::utils::email::mask_email;
///
/// assert_eq!(mask_email("alice@example.com"), "a****@example.com");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let mut chars = local.chars();
            match chars.next() {
                Some(first) => format!("{}{}@{}", first, "*".repeat(chars.count()), domain),
                None => format!("@{}", domain),
            }
        }
        None => {
            let count = email.chars().count();
            if count <= 1 {
                "*".repeat(count)
            } else {
                let first = email.chars().next().unwrap_or('*');
                format!("{}{}", first, "*".repeat(count - 1))
            }
        }
    }
}
