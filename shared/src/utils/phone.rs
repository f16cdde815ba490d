//! Phone number utilities

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Mask a phone number for logging (e.g., ***5678)
///
/// Only the last four digits survive; anything shorter is fully masked.
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() <= 4 {
        "****".to_string()
    } else {
        format!("***{}", &normalized[normalized.len() - 4..])
    }
}
