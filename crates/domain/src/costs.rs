use rust_decimal::Decimal;

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Refundable rent backing a position account (0.057 SOL).
pub const POSITION_RENT_SOL: Decimal = Decimal::from_parts(57, 0, 0, false, 3);

/// Non-refundable cost of initializing one bin array (0.075 SOL).
pub const BIN_ARRAY_CREATION_SOL: Decimal = Decimal::from_parts(75, 0, 0, false, 3);

/// Approximate rent surcharge per bin beyond the default 10-bin span (0.00125 SOL).
pub const SPAN_SURCHARGE_PER_BIN_SOL: Decimal = Decimal::from_parts(125, 0, 0, false, 5);

/// Width of the default in-range span, used as the surcharge baseline.
pub const BASE_SPAN_WIDTH: u32 = 10;

/// Network fee buffer added on top of liquidity and position costs (0.015 SOL).
pub const DEFAULT_FEE_BUFFER_SOL: Decimal = Decimal::from_parts(15, 0, 0, false, 3);

/// Converts lamports to SOL.
#[must_use]
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from(lamports) / Decimal::from(LAMPORTS_PER_SOL)
}

/// Estimated cost of a span that is not in the static table.
///
/// Position rent plus a per-bin surcharge for every bin past the default width.
/// Bin-array creation is not included.
#[must_use]
pub fn span_cost(width: u32) -> Decimal {
    let extra = width.saturating_sub(BASE_SPAN_WIDTH);
    POSITION_RENT_SOL + SPAN_SURCHARGE_PER_BIN_SOL * Decimal::from(extra)
}
