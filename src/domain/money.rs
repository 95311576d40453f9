//! Integer-cent money helpers.
//!
//! Amounts cross every module boundary as whole cents. Formatting follows
//! the es-ES conventions used by the marketplace checkout: decimal comma,
//! `.` thousands separator from five integer digits up, euro suffix.

/// Amount in currency minor units (euro cents).
pub type Cents = i64;

const CENTS_PER_EURO: u64 = 100;

/// Formats an amount of cents as a Spanish euro string, e.g. `"19,99 €"`.
pub fn format_eur(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let units = abs / CENTS_PER_EURO;
    let fraction = abs % CENTS_PER_EURO;

    format!("{sign}{},{fraction:02} €", group_thousands(units))
}

/// Inserts `.` every three digits, but only for numbers of five or more
/// digits (es-ES minimum grouping).
fn group_thousands(units: u64) -> String {
    let digits = units.to_string();
    if digits.len() < 5 {
        return digits;
    }

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
