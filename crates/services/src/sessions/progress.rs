/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based position of the current question, capped at `total`.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// Progress bar fill in percent.
    pub percent: u8,
    pub is_complete: bool,
}

impl SessionProgress {
    pub(crate) fn new(current: usize, total: usize, answered: usize, is_complete: bool) -> Self {
        let position = (current + 1).min(total);
        let percent = if is_complete {
            100
        } else if total == 0 {
            0
        } else {
            let rounded = (position * 200 + total) / (total * 2);
            u8::try_from(rounded.min(100)).unwrap_or(100)
        };
        Self {
            position,
            total,
            answered,
            remaining: total.saturating_sub(current),
            percent,
            is_complete,
        }
    }
}
