/// Chilean RUT validation: numeric body, a literal `-`, and a mod-11
/// check character (digit or `K`).
///
/// Anything that does not match `digits-checkchar` is rejected as
/// malformed before any checksum work.
pub fn validate_rut(rut: &str) -> bool {
    let Some((body, check)) = rut.split_once('-') else {
        return false;
    };

    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let mut chars = check.chars();
    let check_char = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() || c.eq_ignore_ascii_case(&'K') => c,
        _ => return false,
    };

    compute_check_char(body).eq_ignore_ascii_case(&check_char)
}

/// Weighted mod-11 checksum over the numeric body, least significant
/// digit first, weights cycling 2..=7.
fn compute_check_char(body: &str) -> char {
    let mut sum: u32 = 0;
    let mut weight = 2;

    for c in body.chars().rev() {
        sum += c.to_digit(10).unwrap_or(0) * weight;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }

    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}
