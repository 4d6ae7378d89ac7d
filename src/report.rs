// =============================================================================
// Snapshot Report — plain-text rendering
// =============================================================================
//
// Renders a snapshot into the multi-paragraph text block consumed by
// downstream prompt builders. Prices use 2 decimals, indicators 3 decimals,
// the funding rate scientific notation. Empty series are left out.
//
// Labels use U+2011 (non-breaking hyphen) and the exponent is signed with at
// least two digits (`1.00e-04`); prompt consumers match on these bytes.

use std::fmt::Write;

use crate::snapshot::Snapshot;

/// Render `snapshot` as a human-readable report.
pub fn render_report(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, snapshot);
    out
}

fn write_report(out: &mut String, s: &Snapshot) -> std::fmt::Result {
    write!(
        out,
        "current_price = {:.2}, current_ema20 = {:.3}, current_macd = {:.3}, current_rsi (7 period) = {:.3}\n\n",
        s.current_price, s.current_ema20, s.current_macd, s.current_rsi7
    )?;

    write!(
        out,
        "In addition, here is the latest {} open interest and funding rate for perps:\n\n",
        s.symbol
    )?;
    write!(
        out,
        "Open Interest: Latest: {:.2} Average: {:.2}\n\n",
        s.open_interest.latest, s.open_interest.average
    )?;
    write!(out, "Funding Rate: {}\n\n", format_scientific(s.funding_rate, 2))?;

    let intraday = &s.intraday_series;
    write!(
        out,
        "Intraday series ({} intervals, oldest → latest):\n\n",
        intraday.interval
    )?;
    write_series(out, "Mid prices", &intraday.mid_prices)?;
    write_series(out, "EMA indicators (20‑period)", &intraday.ema20_values)?;
    write_series(out, "MACD indicators", &intraday.macd_values)?;
    write_series(out, "RSI indicators (7‑Period)", &intraday.rsi7_values)?;
    write_series(out, "RSI indicators (14‑Period)", &intraday.rsi14_values)?;

    let ctx = &s.longer_term_context;
    out.push_str("Longer‑term context (4‑hour timeframe):\n\n");
    write!(
        out,
        "20‑Period EMA: {:.3} vs. 50‑Period EMA: {:.3}\n\n",
        ctx.ema20, ctx.ema50
    )?;
    write!(
        out,
        "3‑Period ATR: {:.3} vs. 14‑Period ATR: {:.3}\n\n",
        ctx.atr3, ctx.atr14
    )?;
    write!(
        out,
        "Current Volume: {:.3} vs. Average Volume: {:.3}\n\n",
        ctx.current_volume, ctx.average_volume
    )?;
    write_series(out, "MACD indicators", &ctx.macd_values)?;
    write_series(out, "RSI indicators (14‑Period)", &ctx.rsi14_values)?;

    Ok(())
}

fn write_series(out: &mut String, label: &str, values: &[f64]) -> std::fmt::Result {
    if values.is_empty() {
        return Ok(());
    }
    write!(out, "{label}: {}\n\n", format_values(values))
}

/// Scientific notation with a signed, two-digit-minimum exponent:
/// `0.0001` at precision 2 is `1.00e-04`. Non-finite values pass through.
pub fn format_scientific(value: f64, precision: usize) -> String {
    let raw = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// `[a, b, c]` with every value at 3 decimals.
pub fn format_values(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("{v:.3}")).collect();
    format!("[{}]", items.join(", "))
}
