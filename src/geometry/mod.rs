use wasm_bindgen::JsCast;

/// Vertical extent of one list row in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ItemBox {
    pub top: f64,
    pub height: f64,
}

impl ItemBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    fn midpoint_offset(&self, pointer_y: f64) -> f64 {
        pointer_y - self.top - self.height / 2.0
    }
}

/// Index of the row the dragged item should be inserted before, or `None` to append.
///
/// Picks the nearest row whose midpoint lies below the pointer (largest negative
/// offset). Rows are not assumed to be sorted.
pub(crate) fn drag_after_index(pointer_y: f64, boxes: &[ItemBox]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, b) in boxes.iter().enumerate() {
        let offset = b.midpoint_offset(pointer_y);
        if offset >= 0.0 {
            continue;
        }
        match best {
            Some((_, best_offset)) if offset <= best_offset => {}
            _ => best = Some((i, offset)),
        }
    }

    best.map(|(i, _)| i)
}

/// Measure the `data-key` rows under `container`, skipping the row being dragged.
pub(crate) fn measure_children(
    container: &web_sys::Element,
    selector: &str,
    skip_key: Option<&str>,
) -> Vec<(String, ItemBox)> {
    let Ok(nodes) = container.query_selector_all(selector) else {
        return vec![];
    };

    let mut out = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(el) = nodes
            .item(i)
            .and_then(|n| n.dyn_into::<web_sys::Element>().ok())
        else {
            continue;
        };

        let key = el.get_attribute("data-key").unwrap_or_default();
        if key.is_empty() || Some(key.as_str()) == skip_key {
            continue;
        }

        let rect = el.get_bounding_client_rect();
        out.push((key, ItemBox::new(rect.top(), rect.height())));
    }

    out
}

/// Resolve the key of the row the dragged item should precede.
pub(crate) fn resolve_insert_before(
    container: &web_sys::Element,
    selector: &str,
    dragged_key: &str,
    pointer_y: f64,
) -> Option<String> {
    let measured = measure_children(container, selector, Some(dragged_key));
    let boxes: Vec<ItemBox> = measured.iter().map(|(_, b)| *b).collect();
    drag_after_index(pointer_y, &boxes).map(|i| measured[i].0.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ItemBox> {
        // Three 40px rows stacked from y=100.
        vec![
            ItemBox::new(100.0, 40.0),
            ItemBox::new(140.0, 40.0),
            ItemBox::new(180.0, 40.0),
        ]
    }

    #[test]
    fn test_pointer_above_every_midpoint_returns_first() {
        for y in [-500.0, 0.0, 100.0, 119.9] {
            assert_eq!(drag_after_index(y, &rows()), Some(0), "y={y}");
        }
    }

    #[test]
    fn test_pointer_below_every_midpoint_appends() {
        for y in [200.0, 200.5, 260.0, 10_000.0] {
            assert_eq!(drag_after_index(y, &rows()), None, "y={y}");
        }
    }

    #[test]
    fn test_pointer_between_midpoints_picks_next_row() {
        assert_eq!(drag_after_index(121.0, &rows()), Some(1));
        assert_eq!(drag_after_index(159.0, &rows()), Some(1));
        assert_eq!(drag_after_index(161.0, &rows()), Some(2));
    }

    #[test]
    fn test_exact_midpoint_counts_as_below() {
        // offset == 0 is not "above the midpoint".
        assert_eq!(drag_after_index(120.0, &rows()), Some(1));
    }

    #[test]
    fn test_unsorted_rows_still_pick_nearest() {
        let boxes = vec![
            ItemBox::new(180.0, 40.0),
            ItemBox::new(100.0, 40.0),
            ItemBox::new(140.0, 40.0),
        ];
        assert_eq!(drag_after_index(130.0, &boxes), Some(2));
    }

    #[test]
    fn test_insert_point_is_monotonic_in_pointer() {
        let boxes = rows();
        let mut last = Some(0usize);
        let mut y = 90.0;
        while y < 240.0 {
            let cur = drag_after_index(y, &boxes);
            let rank = |v: Option<usize>| v.unwrap_or(usize::MAX);
            assert!(rank(cur) >= rank(last), "insert point moved backwards at y={y}");
            last = cur;
            y += 0.5;
        }
    }

    #[test]
    fn test_empty_list_appends() {
        assert_eq!(drag_after_index(10.0, &[]), None);
    }
}
