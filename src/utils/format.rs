/// 千分位格式，例如 1234567 -> "1,234,567"
pub fn with_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Whole-dollar amount, e.g. `$12,345`.
pub fn usd(value: f64) -> String {
    let rounded = value.round() as i64;
    if rounded < 0 {
        format!("-${}", with_thousands(-rounded))
    } else {
        format!("${}", with_thousands(rounded))
    }
}

/// Dollar amount with cents, e.g. `$1,234.50`.
pub fn usd_cents(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{}${}.{:02}", sign, with_thousands(cents / 100), cents % 100)
}

/// Human label for a token id: `usd-coin` -> `Usd Coin`.
pub fn token_label(token_id: &str) -> String {
    token_id
        .split(['-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short axis label, first eight characters of the id.
pub fn short_label(token_id: &str) -> String {
    token_id.chars().take(8).collect()
}
