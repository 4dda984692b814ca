use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    /// ISO 4217 currency codes recognized by the FX pair rules.
    static ref CURRENCY_CODES: HashSet<&'static str> = [
        "AED", "ARS", "AUD", "BGN", "BRL", "CAD", "CHF", "CLP", "CNY", "COP",
        "CZK", "DKK", "EGP", "EUR", "GBP", "HKD", "HUF", "IDR", "ILS", "INR",
        "ISK", "JPY", "KRW", "KWD", "MAD", "MXN", "MYR", "NOK", "NZD", "PEN",
        "PHP", "PKR", "PLN", "QAR", "RON", "RSD", "RUB", "SAR", "SEK", "SGD",
        "THB", "TRY", "TWD", "UAH", "USD", "UYU", "VND", "ZAR",
    ]
    .into_iter()
    .collect();
}

/// True when `code` is a recognized ISO 4217 currency code (uppercase).
pub fn is_currency_code(code: &str) -> bool {
    CURRENCY_CODES.contains(code)
}
