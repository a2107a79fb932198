//! Scoring module - line clear points
//!
//! One lock that clears `n` rows scores `n * 100 * 2^(n-1)`:
//!
//! | Rows | Points |
//! |------|--------|
//! | 1 | 100 |
//! | 2 | 400 |
//! | 3 | 1200 |
//! | 4 | 3200 |
//!
//! There are no drop points, levels, combos or back-to-back bonuses.

use crate::types::LINE_CLEAR_BASE;

/// Points for clearing `lines` rows with a single lock.
///
/// Saturates instead of overflowing; clears of more than four rows only
/// happen when a board is set up by hand.
pub fn line_clear_score(lines: usize) -> u32 {
    if lines == 0 {
        return 0;
    }
    let lines = u32::try_from(lines).unwrap_or(u32::MAX);
    let bonus = 1u32.checked_shl(lines - 1).unwrap_or(u32::MAX);
    lines
        .saturating_mul(LINE_CLEAR_BASE)
        .saturating_mul(bonus)
}
