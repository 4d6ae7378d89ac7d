/// Quote currency every perpetual symbol is settled in.
pub const QUOTE_ASSET: &str = "USDT";

/// Normalize a user-supplied symbol into a USDT-margined futures pair:
/// trimmed, uppercased, and suffixed with [`QUOTE_ASSET`] when missing.
pub fn normalize_symbol(symbol: &str) -> String {
    let upper = symbol.trim().to_uppercase();
    if upper.ends_with(QUOTE_ASSET) {
        upper
    } else {
        format!("{upper}{QUOTE_ASSET}")
    }
}
