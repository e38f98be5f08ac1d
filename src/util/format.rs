//! Currency display helpers for breakdown rendering and exports.

/// Symbol for a currency code, or the uppercased code itself when unknown.
pub fn currency_symbol(code: &str) -> String {
    let upper = code.to_ascii_uppercase();
    match upper.as_str() {
        "INR" => "₹",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        "AUD" => "A$",
        "CAD" => "C$",
        "CHF" => "Fr",
        "SGD" => "S$",
        _ => return upper,
    }
    .to_string()
}

/// Symbol plus the amount rounded to whole units with Indian digit grouping
/// (last three digits, then pairs): 124500 INR renders as "₹1,24,500".
pub fn format_currency(amount: f64, code: &str) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_indian(&digits);
    let symbol = currency_symbol(code);
    if rounded < 0.0 {
        format!("-{symbol}{grouped}")
    } else {
        format!("{symbol}{grouped}")
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
