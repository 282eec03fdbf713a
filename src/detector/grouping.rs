/// Finder triple grouping, scoring and ordering
use std::cmp::Ordering;

use super::FinderCandidate;
use super::finder::FinderPattern;
use crate::models::Point;
use crate::utils::geometry::angle_cos;

/// Upper bound on finder patterns considered for grouping
const MAX_FINDERS: usize = 30;
/// Upper bound on candidate triples per image
const MAX_GROUPS: usize = 40;

/// Form every plausible finder triple, best-scored first, and order each one
pub fn group_candidates(patterns: &[FinderPattern]) -> Vec<FinderCandidate> {
    if patterns.len() < 3 {
        return Vec::new();
    }

    // Keep the most strongly supported patterns when the image is busy
    let mut finders: Vec<FinderPattern> = patterns.to_vec();
    if finders.len() > MAX_FINDERS {
        finders.sort_by(|a, b| b.hits.cmp(&a.hits));
        finders.truncate(MAX_FINDERS);
    }

    let mut groups = build_groups(&finders);
    score_and_trim_groups(&mut groups, &finders, MAX_GROUPS);

    groups
        .iter()
        .filter_map(|g| order_finder_patterns(&finders[g[0]], &finders[g[1]], &finders[g[2]]))
        .collect()
}

/// All index triples with consistent module sizes and a near right angle
fn build_groups(patterns: &[FinderPattern]) -> Vec<[usize; 3]> {
    let mut groups = Vec::new();
    let n = patterns.len();

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let pi = &patterns[i];
                let pj = &patterns[j];
                let pk = &patterns[k];

                let sizes = [pi.module_size, pj.module_size, pk.module_size];
                let min_size = sizes.iter().fold(f32::INFINITY, |a, &b| a.min(b));
                let max_size = sizes.iter().fold(0.0f32, |a, &b| a.max(b));
                if min_size <= 0.0 || max_size / min_size > 1.5 {
                    continue;
                }

                let distances = [
                    pi.center.distance(&pj.center),
                    pi.center.distance(&pk.center),
                    pj.center.distance(&pk.center),
                ];
                let min_d = distances.iter().fold(f32::INFINITY, |a, &b| a.min(b));
                let max_d = distances.iter().fold(0.0f32, |a, &b| a.max(b));

                let avg_module = (sizes[0] + sizes[1] + sizes[2]) / 3.0;
                // Finders of one symbol are at least 14 modules apart
                if min_d < avg_module * 7.0 {
                    continue;
                }
                if max_d / min_d > 5.0 {
                    continue;
                }

                if best_cos(pi.center, pj.center, pk.center) >= 0.3 {
                    continue;
                }

                groups.push([i, j, k]);
            }
        }
    }

    groups
}

/// Smallest |cos| of the three triangle angles
fn best_cos(a: Point, b: Point, c: Point) -> f32 {
    [(a, b, c), (b, c, a), (c, a, b)]
        .iter()
        .filter_map(|(v, p1, p2)| angle_cos(v, p1, p2))
        .map(f32::abs)
        .fold(f32::INFINITY, f32::min)
}

fn score_and_trim_groups(groups: &mut Vec<[usize; 3]>, patterns: &[FinderPattern], max_groups: usize) {
    // Stable sort keeps discovery order among equal scores
    groups.sort_by(|a, b| {
        let sa = group_score(patterns, a);
        let sb = group_score(patterns, b);
        sa.partial_cmp(&sb).unwrap_or(Ordering::Equal)
    });
    groups.truncate(max_groups);
}

/// Lower is better: size consistency, low distortion, near-right angle
fn group_score(patterns: &[FinderPattern], group: &[usize; 3]) -> f32 {
    let p0 = &patterns[group[0]];
    let p1 = &patterns[group[1]];
    let p2 = &patterns[group[2]];

    let sizes = [p0.module_size, p1.module_size, p2.module_size];
    let min_size = sizes.iter().fold(f32::INFINITY, |a, &b| a.min(b));
    let max_size = sizes.iter().fold(0.0f32, |a, &b| a.max(b));
    let size_ratio = max_size / min_size;

    let d01 = p0.center.distance(&p1.center);
    let d02 = p0.center.distance(&p2.center);
    let d12 = p1.center.distance(&p2.center);
    // The two legs of a square symbol are equal
    let legs = [d01, d02, d12];
    let hypot = legs.iter().fold(0.0f32, |a, &b| a.max(b));
    let mut sides: Vec<f32> = legs.into_iter().filter(|&d| d != hypot).collect();
    if sides.len() < 2 {
        sides = vec![hypot / std::f32::consts::SQRT_2; 2];
    }
    let distortion = sides[0].max(sides[1]) / sides[0].min(sides[1]).max(f32::EPSILON);

    size_ratio * 2.0 + distortion + best_cos(p0.center, p1.center, p2.center)
}

/// Assign top-left / top-right / bottom-left roles and estimate the dimension
fn order_finder_patterns(
    a: &FinderPattern,
    b: &FinderPattern,
    c: &FinderPattern,
) -> Option<FinderCandidate> {
    let patterns = [a, b, c];

    // Find the right-angle corner (top-left)
    let mut best_idx = 0usize;
    let mut best = f32::INFINITY;
    for i in 0..3 {
        let p = &patterns[i].center;
        let p1 = &patterns[(i + 1) % 3].center;
        let p2 = &patterns[(i + 2) % 3].center;
        let Some(cos) = angle_cos(p, p1, p2) else {
            continue;
        };
        if cos.abs() < best {
            best = cos.abs();
            best_idx = i;
        }
    }

    let tl = patterns[best_idx];
    let p1 = patterns[(best_idx + 1) % 3];
    let p2 = patterns[(best_idx + 2) % 3];

    // Image y grows downwards, so a positive cross product means p1 is top-right
    let cross = p1.center.sub(&tl.center).cross(&p2.center.sub(&tl.center));
    let (tr, bl) = if cross > 0.0 { (p1, p2) } else { (p2, p1) };

    let avg_module = (tl.module_size + tr.module_size + bl.module_size) / 3.0;
    let d_tr = tl.center.distance(&tr.center);
    let d_bl = tl.center.distance(&bl.center);

    let dim1 = estimate_dimension_from_distance(d_tr, avg_module)?;
    let dim2 = estimate_dimension_from_distance(d_bl, avg_module)?;
    let dimension = if dim1 == dim2 {
        dim1
    } else if dim1.abs_diff(dim2) <= 4 {
        // Snap the average back onto the 17 + 4v lattice
        let avg = (dim1 + dim2) as f32 / 2.0;
        17 + 4 * (((avg - 17.0) / 4.0).round() as usize).max(1)
    } else {
        return None;
    };

    let module_size = (d_tr + d_bl) / 2.0 / (dimension as f32 - 7.0);
    let module_ratio = module_size / avg_module;
    if !(0.8..=1.2).contains(&module_ratio) {
        return None;
    }

    Some(FinderCandidate::Matrix {
        top_left: tl.center,
        top_right: tr.center,
        bottom_left: bl.center,
        module_size,
        dimension,
    })
}

fn estimate_dimension_from_distance(distance: f32, module_size: f32) -> Option<usize> {
    if module_size <= 0.0 {
        return None;
    }
    let raw_dim = distance / module_size + 7.0;
    if raw_dim < 19.0 {
        return None;
    }
    let version = ((raw_dim - 17.0) / 4.0).round() as i32;
    if !(1..=40).contains(&version) {
        return None;
    }
    Some(17 + 4 * version as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder(x: f32, y: f32, module: f32) -> FinderPattern {
        FinderPattern {
            center: Point::new(x, y),
            module_size: module,
            hits: 4,
        }
    }

    #[test]
    fn test_orders_upright_triple() {
        // Version 1 at 4px/module: finder centers 14 modules apart
        let patterns = [
            finder(70.0, 14.0, 4.0),
            finder(14.0, 70.0, 4.0),
            finder(14.0, 14.0, 4.0),
        ];
        let candidates = group_candidates(&patterns);
        assert_eq!(candidates.len(), 1);
        match &candidates[0] {
            FinderCandidate::Matrix {
                top_left,
                top_right,
                bottom_left,
                module_size,
                dimension,
            } => {
                assert_eq!(*top_left, Point::new(14.0, 14.0));
                assert_eq!(*top_right, Point::new(70.0, 14.0));
                assert_eq!(*bottom_left, Point::new(14.0, 70.0));
                assert_eq!(*dimension, 21);
                assert!((module_size - 4.0).abs() < 1e-3);
            }
            other => panic!("unexpected candidate {other:?}"),
        }
    }

    #[test]
    fn test_orders_rotated_triple() {
        // Same symbol rotated by 180°: top-left finder is now bottom-right
        let patterns = [
            finder(70.0, 70.0, 4.0),
            finder(14.0, 70.0, 4.0),
            finder(70.0, 14.0, 4.0),
        ];
        let candidates = group_candidates(&patterns);
        let FinderCandidate::Matrix {
            top_left,
            top_right,
            bottom_left,
            ..
        } = &candidates[0]
        else {
            panic!("expected matrix candidate");
        };
        assert_eq!(*top_left, Point::new(70.0, 70.0));
        assert_eq!(*top_right, Point::new(14.0, 70.0));
        assert_eq!(*bottom_left, Point::new(70.0, 14.0));
    }

    #[test]
    fn test_rejects_inconsistent_sizes() {
        let patterns = [
            finder(14.0, 14.0, 4.0),
            finder(70.0, 14.0, 8.0),
            finder(14.0, 70.0, 4.0),
        ];
        assert!(group_candidates(&patterns).is_empty());
    }

    #[test]
    fn test_rejects_collinear() {
        let patterns = [
            finder(14.0, 14.0, 4.0),
            finder(70.0, 14.0, 4.0),
            finder(126.0, 14.0, 4.0),
        ];
        assert!(group_candidates(&patterns).is_empty());
    }

    #[test]
    fn test_estimate_dimension() {
        assert_eq!(estimate_dimension_from_distance(56.0, 4.0), Some(21));
        assert_eq!(estimate_dimension_from_distance(18.0 * 3.0, 3.0), Some(25));
        assert_eq!(estimate_dimension_from_distance(10.0, 4.0), None);
    }
}
