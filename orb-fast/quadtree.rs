use std::collections::HashMap;
use crate::types::{Candidate, Rect};

/// Nodes narrower and shorter than this are never split again
const MIN_NODE_EXTENT: f32 = 1e-3;

/// Retained candidates in scan order, each with the bounds of the leaf it won
#[derive(Debug, Clone, Default)]
pub struct Distribution {
    pub retained: Vec<Candidate>,
    pub leaf_bounds: Vec<Rect>,
}

impl Distribution {
    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Rect,
    /// Indices into the deduplicated candidate list, ascending
    members: Vec<usize>,
}

impl Node {
    fn can_split(&self) -> bool {
        self.members.len() >= 2
            && (self.bounds.width() > MIN_NODE_EXTENT || self.bounds.height() > MIN_NODE_EXTENT)
    }
}

/// Spatial thinning of candidates by recursive quadrant subdivision
pub struct QuadtreeDistributor;

impl QuadtreeDistributor {
    /// Keep at most `quota` candidates spread across `bounds`.
    ///
    /// Candidates must lie inside `bounds`. Exact duplicates are merged first;
    /// when no more than `quota` distinct positions remain, all of them are kept.
    pub fn distribute(candidates: &[Candidate], bounds: Rect, quota: usize) -> Distribution {
        if quota == 0 || candidates.is_empty() {
            return Distribution::default();
        }

        let unique = Self::merge_duplicates(candidates);
        if unique.len() <= quota {
            let leaf_bounds = unique.iter().map(|c| Rect::new(c.x, c.y, c.x, c.y)).collect();
            return Distribution { retained: unique, leaf_bounds };
        }

        // Arena of all nodes ever created; `active` holds the current leaves in
        // creation order
        let mut arena = Self::root_nodes(&unique, bounds);
        let mut active: Vec<usize> = (0..arena.len()).collect();

        while active.len() < quota {
            let mut splittable: Vec<usize> = active.iter().copied().filter(|&i| arena[i].can_split()).collect();
            if splittable.is_empty() {
                break;
            }
            // Most populated first; the stable sort keeps creation order on ties
            splittable.sort_by(|&a, &b| arena[b].members.len().cmp(&arena[a].members.len()));

            let mut node_count = active.len();
            let mut replaced: HashMap<usize, Vec<usize>> = HashMap::new();
            for node in splittable {
                if node_count >= quota {
                    break;
                }
                let children = Self::split(&arena[node], &unique);
                let first = arena.len();
                node_count = node_count + children.len() - 1;
                arena.extend(children);
                replaced.insert(node, (first..arena.len()).collect());
            }

            active = active
                .into_iter()
                .flat_map(|i| replaced.remove(&i).unwrap_or_else(|| vec![i]))
                .collect();
        }

        let mut winners: Vec<(usize, Rect)> = active
            .iter()
            .filter_map(|&i| {
                let node = &arena[i];
                Self::best_member(&node.members, &unique).map(|best| (best, node.bounds))
            })
            .collect();

        if winners.len() > quota {
            winners.sort_by(|a, b| {
                unique[b.0]
                    .response
                    .total_cmp(&unique[a.0].response)
                    .then(a.0.cmp(&b.0))
            });
            winners.truncate(quota);
        }
        winners.sort_by_key(|&(index, _)| index);

        Distribution {
            retained: winners.iter().map(|&(index, _)| unique[index]).collect(),
            leaf_bounds: winners.iter().map(|&(_, bounds)| bounds).collect(),
        }
    }

    /// Collapse candidates sharing a position into the strongest one, earliest
    /// on ties, keeping first-occurrence order
    fn merge_duplicates(candidates: &[Candidate]) -> Vec<Candidate> {
        let mut unique: Vec<Candidate> = Vec::with_capacity(candidates.len());
        let mut seen: HashMap<(u32, u32), usize> = HashMap::with_capacity(candidates.len());
        for c in candidates {
            match seen.get(&(c.x.to_bits(), c.y.to_bits())) {
                Some(&index) => {
                    if c.response > unique[index].response {
                        unique[index] = *c;
                    }
                }
                None => {
                    seen.insert((c.x.to_bits(), c.y.to_bits()), unique.len());
                    unique.push(*c);
                }
            }
        }
        unique
    }

    /// `round(w / h)` equal-width columns spanning `bounds`, empty ones dropped
    fn root_nodes(unique: &[Candidate], bounds: Rect) -> Vec<Node> {
        let ratio = if bounds.height() > 0.0 { bounds.width() / bounds.height() } else { 1.0 };
        let n_roots = (ratio.round() as usize).max(1);
        let step = bounds.width() / n_roots as f32;

        let mut roots: Vec<Node> = (0..n_roots)
            .map(|i| {
                let min_x = bounds.min_x + step * i as f32;
                let max_x = if i + 1 == n_roots { bounds.max_x } else { bounds.min_x + step * (i + 1) as f32 };
                Node {
                    bounds: Rect::new(min_x, bounds.min_y, max_x, bounds.max_y),
                    members: Vec::new(),
                }
            })
            .collect();

        for (index, c) in unique.iter().enumerate() {
            let mut root = if step > 0.0 {
                (((c.x - bounds.min_x) / step).max(0.0) as usize).min(n_roots - 1)
            } else {
                0
            };
            // Settle float rounding against the stored column edges
            while root > 0 && c.x < roots[root].bounds.min_x {
                root -= 1;
            }
            while root + 1 < n_roots && c.x >= roots[root + 1].bounds.min_x {
                root += 1;
            }
            roots[root].members.push(index);
        }

        roots.retain(|node| !node.members.is_empty());
        roots
    }

    /// Split at the midpoint into up to four non-empty quadrants, ordered
    /// top-left, top-right, bottom-left, bottom-right
    fn split(node: &Node, unique: &[Candidate]) -> Vec<Node> {
        let b = node.bounds;
        let mid_x = (b.min_x + b.max_x) * 0.5;
        let mid_y = (b.min_y + b.max_y) * 0.5;
        let quadrants = [
            Rect::new(b.min_x, b.min_y, mid_x, mid_y),
            Rect::new(mid_x, b.min_y, b.max_x, mid_y),
            Rect::new(b.min_x, mid_y, mid_x, b.max_y),
            Rect::new(mid_x, mid_y, b.max_x, b.max_y),
        ];

        let mut members: [Vec<usize>; 4] = Default::default();
        for &index in &node.members {
            let c = &unique[index];
            let quadrant = (c.x >= mid_x) as usize + 2 * (c.y >= mid_y) as usize;
            members[quadrant].push(index);
        }

        quadrants
            .into_iter()
            .zip(members)
            .filter(|(_, members)| !members.is_empty())
            .map(|(bounds, members)| Node { bounds, members })
            .collect()
    }

    fn best_member(members: &[usize], unique: &[Candidate]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for &index in members {
            match best {
                Some(current) if unique[index].response <= unique[current].response => {}
                _ => best = Some(index),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn candidate(x: f32, y: f32, response: f32) -> Candidate {
        Candidate { x, y, response, level: 0 }
    }

    #[test]
    fn test_empty_inputs() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(QuadtreeDistributor::distribute(&[], bounds, 10).is_empty());
        let cands = [candidate(5.0, 5.0, 10.0)];
        assert!(QuadtreeDistributor::distribute(&cands, bounds, 0).is_empty());
    }

    #[test]
    fn test_underflow_keeps_everything() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let cands = [candidate(10.0, 10.0, 1.0), candidate(11.0, 10.0, 5.0), candidate(90.0, 50.0, 2.0)];
        let dist = QuadtreeDistributor::distribute(&cands, bounds, 5);
        assert_eq!(dist.retained, cands.to_vec());
    }

    #[test]
    fn test_duplicates_are_merged() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let cands = [
            candidate(10.0, 10.0, 1.0),
            candidate(20.0, 20.0, 3.0),
            candidate(10.0, 10.0, 4.0),
            candidate(10.0, 10.0, 4.0),
        ];
        let dist = QuadtreeDistributor::distribute(&cands, bounds, 5);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.retained[0].response, 4.0);
        assert_eq!(dist.retained[1].response, 3.0);
    }

    #[test]
    fn test_strongest_candidate_per_quadrant() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let cands = [
            candidate(10.0, 10.0, 1.0),
            candidate(12.0, 12.0, 9.0),
            candidate(80.0, 10.0, 2.0),
            candidate(82.0, 14.0, 3.0),
            candidate(10.0, 80.0, 7.0),
            candidate(80.0, 80.0, 4.0),
        ];
        let dist = QuadtreeDistributor::distribute(&cands, bounds, 4);
        let responses: Vec<f32> = dist.retained.iter().map(|c| c.response).collect();
        // Output stays in scan order
        assert_eq!(responses, vec![9.0, 3.0, 7.0, 4.0]);
    }

    #[test]
    fn test_overshoot_is_trimmed_to_quota() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let cands = [
            candidate(10.0, 10.0, 1.0),
            candidate(80.0, 10.0, 2.0),
            candidate(10.0, 80.0, 5.0),
            candidate(80.0, 80.0, 4.0),
        ];
        // One split yields four leaves for a quota of two; the two strongest win
        let dist = QuadtreeDistributor::distribute(&cands, bounds, 2);
        let responses: Vec<f32> = dist.retained.iter().map(|c| c.response).collect();
        assert_eq!(responses, vec![5.0, 4.0]);
    }

    #[test]
    fn test_wide_bounds_use_several_roots() {
        // Aspect 4:1 gives four root columns, so a quota of four picks one per column
        let bounds = Rect::new(0.0, 0.0, 400.0, 100.0);
        let cands: Vec<Candidate> = (0..4)
            .flat_map(|col| {
                let x0 = col as f32 * 100.0;
                [candidate(x0 + 10.0, 50.0, 1.0), candidate(x0 + 20.0, 50.0, 2.0)]
            })
            .collect();
        let dist = QuadtreeDistributor::distribute(&cands, bounds, 4);
        assert_eq!(dist.len(), 4);
        for (i, c) in dist.retained.iter().enumerate() {
            assert_eq!(c.x, i as f32 * 100.0 + 20.0);
        }
    }

    fn arb_candidates() -> impl Strategy<Value = Vec<Candidate>> {
        prop::collection::vec((0u32..200, 0u32..120, 0u32..256), 0..300).prop_map(|points| {
            points
                .into_iter()
                .map(|(x, y, r)| candidate(x as f32, y as f32, r as f32))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn retained_count_is_min_of_unique_and_quota(cands in arb_candidates(), quota in 0usize..80) {
            let bounds = Rect::new(0.0, 0.0, 200.0, 120.0);
            let dist = QuadtreeDistributor::distribute(&cands, bounds, quota);
            let mut positions: Vec<(u32, u32)> = cands.iter().map(|c| (c.x as u32, c.y as u32)).collect();
            positions.sort_unstable();
            positions.dedup();
            prop_assert_eq!(dist.len(), positions.len().min(quota));
            prop_assert_eq!(dist.retained.len(), dist.leaf_bounds.len());
        }

        #[test]
        fn one_winner_per_leaf(cands in arb_candidates(), quota in 1usize..80) {
            let bounds = Rect::new(0.0, 0.0, 200.0, 120.0);
            let dist = QuadtreeDistributor::distribute(&cands, bounds, quota);
            for (c, leaf) in dist.retained.iter().zip(&dist.leaf_bounds) {
                prop_assert!(leaf.contains(c.x, c.y));
            }
            for i in 0..dist.len() {
                for j in i + 1..dist.len() {
                    prop_assert!(dist.leaf_bounds[i].overlap_area(&dist.leaf_bounds[j]) == 0.0);
                    let (a, b) = (dist.retained[i], dist.retained[j]);
                    prop_assert!(!(a.x == b.x && a.y == b.y));
                }
            }
        }

        #[test]
        fn distribution_is_deterministic(cands in arb_candidates(), quota in 1usize..80) {
            let bounds = Rect::new(0.0, 0.0, 200.0, 120.0);
            let a = QuadtreeDistributor::distribute(&cands, bounds, quota);
            let b = QuadtreeDistributor::distribute(&cands, bounds, quota);
            prop_assert_eq!(a.retained, b.retained);
        }
    }
}
