//! Virtual-scrolling window arithmetic.
//!
//! Maps a continuous scroll position onto the bounded range of row indices
//! that must actually be materialized, padded by an overscan margin so fast
//! scrolling does not expose blank rows. All rows share one fixed height;
//! that uniformity is what keeps this O(1) — growing per-row heights here
//! would require a prefix-sum structure instead.

/// The materialized slice: inclusive index range plus the distance (in the
/// same unit as the scroll offset) from the top of the full list to the
/// first materialized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    pub top_offset: usize,
}

impl Window {
    /// Number of rows in the slice (a window is never empty).
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Compute the materialized range for the current scroll state.
///
/// Returns `None` exactly when `item_count == 0`. A negative scroll offset
/// clamps to the top; an offset past the end clamps `end` to the last row.
/// Pure and cheap enough to recompute wholesale on every scroll, resize,
/// and item-count change — incremental patching would only risk staleness.
///
/// `item_height` and `viewport_height` must be positive.
pub fn visible_range(
    item_count: usize,
    item_height: usize,
    viewport_height: usize,
    overscan: usize,
    scroll_offset: i64,
) -> Option<Window> {
    debug_assert!(item_height > 0 && viewport_height > 0);
    if item_count == 0 {
        return None;
    }
    let scroll = scroll_offset.max(0) as usize;
    // Both bounds clamp to the last row so an offset past the end of the
    // content still yields a valid (start <= end) range.
    let start = (scroll / item_height)
        .saturating_sub(overscan)
        .min(item_count - 1);
    let end = ((scroll + viewport_height).div_ceil(item_height) + overscan).min(item_count - 1);
    Some(Window {
        start,
        end,
        top_offset: start * item_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_no_window() {
        assert_eq!(visible_range(0, 2, 20, 3, 0), None);
        assert_eq!(visible_range(0, 2, 20, 3, 500), None);
    }

    #[test]
    fn top_of_list() {
        // 10 rows fit, plus 3 overscan past the fold.
        let w = visible_range(25, 50, 500, 3, 0).unwrap();
        assert_eq!(w.start, 0);
        assert_eq!(w.end, 13);
        assert_eq!(w.top_offset, 0);
    }

    #[test]
    fn mid_scroll_offsets_start() {
        let w = visible_range(100, 50, 500, 3, 1000).unwrap();
        assert_eq!(w.start, 17); // floor(1000/50) - 3
        assert_eq!(w.end, 33); // ceil(1500/50) + 3
        assert_eq!(w.top_offset, 17 * 50);
    }

    #[test]
    fn negative_offset_clamps_to_top() {
        let w = visible_range(25, 50, 500, 3, -400).unwrap();
        assert_eq!(w.start, 0);
        assert_eq!(w.top_offset, 0);
    }

    #[test]
    fn overscroll_clamps_end_to_last_row() {
        let w = visible_range(25, 50, 500, 3, 10_000).unwrap();
        assert_eq!(w.end, 24);
        assert!(w.start <= w.end);
    }

    #[test]
    fn small_list_is_fully_materialized() {
        let w = visible_range(4, 50, 500, 3, 0).unwrap();
        assert_eq!((w.start, w.end), (0, 3));
    }

    #[test]
    fn bounds_invariant_holds_across_inputs() {
        for count in [1usize, 2, 7, 25, 300] {
            for overscan in [0usize, 1, 3, 8] {
                for scroll in [-100i64, 0, 1, 49, 50, 999, 100_000] {
                    let w = visible_range(count, 50, 500, overscan, scroll).unwrap();
                    assert!(w.start <= w.end, "start>end for count={count} scroll={scroll}");
                    assert!(w.end < count, "end out of range for count={count}");
                    assert_eq!(w.top_offset, w.start * 50);
                }
            }
        }
    }

    #[test]
    fn window_is_monotonic_in_scroll() {
        let mut prev = visible_range(300, 2, 40, 3, 0).unwrap();
        for scroll in 1..700i64 {
            let w = visible_range(300, 2, 40, 3, scroll).unwrap();
            assert!(w.start >= prev.start);
            assert!(w.end >= prev.end);
            prev = w;
        }
    }

    #[test]
    fn slice_length_is_bounded_by_viewport_not_count() {
        // visible rows + 2*overscan + the partial-row allowance, never O(count)
        let w = visible_range(100_000, 2, 40, 3, 77_777).unwrap();
        assert!(w.len() <= 40 / 2 + 2 * 3 + 2);
    }
}
