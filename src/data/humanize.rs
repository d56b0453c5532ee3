//! Human-friendly number formatting.

/// Format an integer with `,` between every group of three digits.
///
/// `1234567` becomes `1,234,567`; values below 1000 are unchanged.
pub fn comma(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
