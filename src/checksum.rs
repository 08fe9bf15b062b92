//! Check digit validation for book, serial, music and trade item numbers.
//!
//! Every validator takes a compacted code (no spaces or dashes) and answers
//! whether it is well formed and its check digit matches.

fn digits(code: &str) -> Option<Vec<u32>> {
    code.chars().map(|c| c.to_digit(10)).collect()
}

/// Mod-10 check over all digits, weights 3 and 1 alternating from the right
/// of the payload. Shared by EAN/UPC/GTIN and the 13-digit ISBN and ISMN.
fn mod10_valid(code: &str) -> bool {
    let Some(digits) = digits(code) else {
        return false;
    };
    let Some((&check, payload)) = digits.split_last() else {
        return false;
    };
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == check
}

/// Value of a trailing check character that may be `X` (ten).
fn check_value(c: char) -> Option<u32> {
    match c {
        'X' | 'x' => Some(10),
        _ => c.to_digit(10),
    }
}

/// Generic GTIN: 8, 12, 13 or 14 digits with a valid mod-10 check digit.
pub fn is_valid_gtin(code: &str) -> bool {
    matches!(code.len(), 8 | 12 | 13 | 14) && mod10_valid(code)
}

/// ISBN-10 (mod 11, check may be `X`) or ISBN-13 (978/979 EAN).
pub fn is_valid_isbn(code: &str) -> bool {
    if !code.is_ascii() {
        return false;
    }
    match code.len() {
        10 => {
            let (payload, check) = code.split_at(9);
            let (Some(payload), Some(check)) =
                (digits(payload), check.chars().next().and_then(check_value))
            else {
                return false;
            };
            let sum: u32 = payload
                .iter()
                .enumerate()
                .map(|(i, d)| (i as u32 + 1) * d)
                .sum();
            sum % 11 == check
        }
        13 => (code.starts_with("978") || code.starts_with("979")) && mod10_valid(code),
        _ => false,
    }
}

/// ISSN: 7 digits and a mod-11 check character that may be `X`.
pub fn is_valid_issn(code: &str) -> bool {
    if !code.is_ascii() || code.len() != 8 {
        return false;
    }
    let (payload, check) = code.split_at(7);
    let (Some(payload), Some(check)) =
        (digits(payload), check.chars().next().and_then(check_value))
    else {
        return false;
    };
    let sum: u32 = payload
        .iter()
        .zip((2..=8).rev())
        .map(|(d, w)| d * w)
        .sum();
    (11 - sum % 11) % 11 == check
}

/// ISMN in its 13-digit form: `9790` prefix and an EAN check digit.
pub fn is_valid_ismn(code: &str) -> bool {
    code.len() == 13 && code.starts_with("9790") && mod10_valid(code)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("40170725", true)]
    #[case("40170726", false)]
    #[case("042100005264", true)]
    #[case("042100005265", false)]
    #[case("7350053850019", true)]
    #[case("10614141543219", true)]
    #[case("10614141543218", false)]
    #[case("1234567", false)]
    #[case("4017072a", false)]
    fn test_gtin(#[case] code: &str, #[case] expected: bool) {
        assert_eq!(is_valid_gtin(code), expected);
    }

    #[rstest]
    #[case("0545010225", true)]
    #[case("186197271X", false)]
    #[case("1861972717", true)]
    #[case("080442957X", true)]
    #[case("9781933624341", true)]
    #[case("9781566199095", false)]
    #[case("7350053850019", false)]
    fn test_isbn(#[case] code: &str, #[case] expected: bool) {
        assert_eq!(is_valid_isbn(code), expected);
    }

    #[rstest]
    #[case("03178471", true)]
    #[case("00832421", true)]
    #[case("10637710", true)]
    #[case("10637711", false)]
    #[case("1000002X", true)]
    #[case("1000006X", false)]
    fn test_issn(#[case] code: &str, #[case] expected: bool) {
        assert_eq!(is_valid_issn(code), expected);
    }

    #[rstest]
    #[case("9790650012683", true)]
    #[case("9790650012684", false)]
    #[case("9781933624341", false)]
    fn test_ismn(#[case] code: &str, #[case] expected: bool) {
        assert_eq!(is_valid_ismn(code), expected);
    }
}
