//! Tier-2 compaction: relocate used payloads to the low end.
//!
//! Tier-1 (coalescing, see [`SegmentIndex::coalesce`]) resolves the
//! common case where releases left adjacent free runs unmerged. When
//! fragmentation is non-adjacent, relocation is the remaining option:
//! every used payload is packed to the low end of the arena in start
//! order, leaving all free space as one run at the high end. Payload
//! bytes are copied and recorded starts rewritten; handles never change.
//!
//! [`SegmentIndex::coalesce`]: crate::index::SegmentIndex::coalesce

use crate::arena::Arena;
use crate::index::SegmentIndex;
use crate::types::Segment;

/// Outcome of a relocation pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RelocationSummary {
    /// Number of payloads whose bytes were moved.
    pub(crate) moved: usize,
    /// Size of the single free run left at the high end.
    pub(crate) free_after: usize,
}

/// Pack all used payloads to the low end of the arena.
///
/// Iterates a snapshot of the used map in ascending start order, so
/// payloads keep their relative order and every destination sits at or
/// below its source; the per-segment copy is therefore always safe.
/// Zero-length entries are skipped, they occupy no arena bytes.
pub(crate) fn relocate(index: &mut SegmentIndex, arena: &mut Arena) -> RelocationSummary {
    let mut cursor = 0usize;
    let mut moved = 0usize;

    for (handle, seg) in index.used_sorted_by_start() {
        if seg.is_empty() {
            continue;
        }
        if seg.start != cursor {
            arena.shift(seg.start, cursor, seg.len);
            index.set_used_start(handle, cursor);
            moved += 1;
        }
        cursor += seg.len;
    }

    let free_after = arena.capacity() - cursor;
    let free = if free_after > 0 {
        vec![Segment::new(cursor, free_after)]
    } else {
        Vec::new()
    };
    index.reset_free(free);

    tracing::debug!(moved, free_after, "relocated used payloads to the low end");
    RelocationSummary { moved, free_after }
}
