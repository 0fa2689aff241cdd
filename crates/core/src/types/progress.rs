//! Stamp progress toward a reward.

/// Percentage of a card's stamps collected, in `[0, 100]`.
///
/// Equals exactly `100.0` once `stamps` reaches `required` and never exceeds
/// it afterwards. A store requiring zero stamps counts as complete.
///
/// ```
/// use cartaozinho_core::progress_percentage;
///
/// assert!((progress_percentage(7, 10) - 70.0).abs() < f64::EPSILON);
/// assert!((progress_percentage(12, 10) - 100.0).abs() < f64::EPSILON);
/// ```
#[must_use]
pub fn progress_percentage(stamps: u32, required: u32) -> f64 {
    if required == 0 {
        return 100.0;
    }

    (f64::from(stamps) / f64::from(required) * 100.0).clamp(0.0, 100.0)
}

/// One slot of a stamp grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampSlot {
    /// A stamp has been collected in this slot.
    Filled,
    /// Still to be collected.
    Empty,
}

/// Layout of a card's stamp grid: `required` slots, the first `stamps` filled.
#[must_use]
pub fn stamp_slots(stamps: u32, required: u32) -> Vec<StampSlot> {
    (0..required)
        .map(|index| {
            if index < stamps {
                StampSlot::Filled
            } else {
                StampSlot::Empty
            }
        })
        .collect()
}
