//! Safety-level heuristic
//!
//! Scores how a vault operation moved the position relative to its
//! liquidation threshold. The score is added to a running per-vault total.
//!
//! | Condition | Delta |
//! |---|---|
//! | liquidation ratio == ratio before (not after) | 0 |
//! | collateral, debt, ratio before or ratio after is zero | +1 |
//! | liquidation ratio above ratio before or ratio after | −5 |
//! | otherwise | `(after − liq) / (before − liq)`, at most 5 |

use types::numeric::Decimal;

/// Upper bound on a single delta, and the magnitude of the unsafe penalty.
pub const MAX_DELTA: i64 = 5;

/// Inputs to one heuristic evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyInput<'a> {
    pub liquidation_ratio: &'a Decimal,
    pub ratio_before: &'a Decimal,
    pub ratio_after: &'a Decimal,
    /// Vault collateral after the operation
    pub collateral: &'a Decimal,
    /// Vault normalized debt after the operation
    pub debt: &'a Decimal,
}

/// Safety-level delta for one vault operation.
pub fn safety_delta(input: &SafetyInput<'_>) -> Decimal {
    let liq = input.liquidation_ratio;
    let before = input.ratio_before;
    let after = input.ratio_after;

    // Direction is undefined when the vault sat exactly at the threshold.
    // This row looks at the ratio before the operation only: a vault moved
    // onto the threshold still scores through the rows below.
    if liq == before {
        return Decimal::zero();
    }

    if input.collateral.is_zero() || input.debt.is_zero() || before.is_zero() || after.is_zero() {
        return Decimal::one();
    }

    if liq > before || liq > after {
        return Decimal::from(-MAX_DELTA);
    }

    let cap = Decimal::from(MAX_DELTA);
    match (after - liq).checked_div(&(before - liq)) {
        Some(delta) => delta.min_with(&cap),
        None => Decimal::zero(),
    }
}

/// `collateral × price / (debt × rate)`, zero when any operand makes it
/// undefined.
pub fn collateralization_ratio(
    collateral: &Decimal,
    debt: &Decimal,
    price: Option<&Decimal>,
    rate: &Decimal,
) -> Decimal {
    let Some(price) = price else {
        return Decimal::zero();
    };
    if debt.is_zero() || rate.is_zero() {
        return Decimal::zero();
    }
    (collateral * price)
        .checked_div(&(debt * rate))
        .unwrap_or_default()
}
