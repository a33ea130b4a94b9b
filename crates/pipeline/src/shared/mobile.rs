/// Canonical form of a raw mobile number.
///
/// Strips every non-digit character, keeps the trailing 10 digits (so a
/// leading country code like "+91" falls away), and rejects anything that
/// is shorter than 10 digits after stripping. The surviving 10-digit string
/// is parsed as an integer identifier.
///
/// # Examples
/// ```
/// assert_eq!(pipeline::shared::mobile::normalize_mobile("+91 98765-43210"), Some(9876543210));
/// assert_eq!(pipeline::shared::mobile::normalize_mobile("12345"), None);
/// ```
pub fn normalize_mobile(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 {
        return None;
    }
    let last_ten = &digits[digits.len() - 10..];
    last_ten.parse::<i64>().ok()
}
