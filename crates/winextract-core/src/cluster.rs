use crate::geom::{is_separate, BBox};

/// Merges fragments until no two remaining boxes lie within `gap` of each
/// other.
///
/// Each pass greedily absorbs every later, unvisited box that touches the
/// growing accumulator; passes repeat until one performs no union.
pub fn merge_boxes(boxes: &[BBox], gap: f64) -> Vec<BBox> {
    let mut current = boxes.to_vec();
    if current.len() < 2 {
        return current;
    }

    loop {
        let mut changed = false;
        let mut merged = Vec::with_capacity(current.len());
        let mut visited = vec![false; current.len()];

        for i in 0..current.len() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            let mut acc = current[i];
            for j in (i + 1)..current.len() {
                if !visited[j] && !is_separate(&acc, &current[j], gap) {
                    acc = acc.union(&current[j]);
                    visited[j] = true;
                    changed = true;
                }
            }
            merged.push(acc);
        }

        current = merged;
        if !changed {
            return current;
        }
    }
}
