use std::ops::Range;

use tabula_model::ItemId;

/// Span of positions between the shift-click anchor and the clicked row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRange {
    pub lower: usize,
    pub upper: usize,
}

impl ToggleRange {
    /// Positions strictly between the endpoints. The anchor and the clicked
    /// row are set by their own toggles.
    pub fn interior(&self) -> Range<usize> {
        (self.lower + 1)..self.upper
    }
}

/// Locate `anchor` and `target` in `order` and return the span between
/// them. `None` when either id is not part of the ordering.
pub fn resolve_range(
    order: &[ItemId],
    anchor: &ItemId,
    target: &ItemId,
) -> Option<ToggleRange> {
    let anchor_idx = order.iter().position(|id| id == anchor)?;
    let target_idx = order.iter().position(|id| id == target)?;

    Some(ToggleRange {
        lower: anchor_idx.min(target_idx),
        upper: anchor_idx.max(target_idx),
    })
}
