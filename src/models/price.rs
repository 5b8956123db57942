// ============================================================================
// Formatage des prix
// ============================================================================
// "45231.04" -> "$ 45 231"
//
// Un seul séparateur est inséré, trois chiffres avant la fin. Pour les
// nombres de moins de 4 chiffres, le point d'insertion suit les règles de
// découpage d'une chaîne par index négatif : "5" -> " 5", "42" -> "4 2",
// "123" -> " 123". Ce comportement est conservé tel quel.
// ============================================================================

/// Arrondit le montant et le formate avec symbole monétaire et séparateur
pub fn format_price(amount: f64, currency_symbol: &str, separator: &str) -> String {
    let digits = format!("{}", amount.round() as i64);
    let split = separator_index(digits.len());

    format!(
        "{} {}{}{}",
        currency_symbol,
        &digits[..split],
        separator,
        &digits[split..]
    )
}

/// Index d'insertion du séparateur : `len - 3`, et si négatif, compté depuis
/// la fin de la chaîne puis ramené à 0
fn separator_index(len: usize) -> usize {
    let index = len as isize - 3;
    if index >= 0 {
        index as usize
    } else {
        (len as isize + index).max(0) as usize
    }
}

/// Déduit le symbole monétaire des 3 derniers caractères de la paire
///
/// Les devises inconnues sont renvoyées telles quelles (ex: "XBT").
pub fn currency_symbol(pair: &str) -> String {
    let chars: Vec<char> = pair.chars().collect();
    let start = chars.len().saturating_sub(3);
    let currency: String = chars[start..].iter().collect();

    match currency.as_str() {
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "USD" | "CAD" | "AUD" => "$".to_string(),
        "JPY" => "¥".to_string(),
        _ => currency,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
