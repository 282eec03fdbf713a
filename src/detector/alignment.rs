/// Alignment pattern search for QR versions 2+
use crate::models::{BitMatrix, Point};

/// Search radius around the predicted center, in modules
const SEARCH_MODULES: f32 = 4.0;
/// Matching sample points (of 25) required to accept a position
const MIN_SCORE: usize = 23;

/// Locate the 5x5 alignment pattern near `predicted`
///
/// `across` and `down` are one-module steps along the symbol's axes. Every
/// pixel within four modules is tried; the result is the centroid of the
/// best-scoring positions closest to the prediction.
pub fn find_alignment(
    binary: &BitMatrix,
    predicted: Point,
    across: Point,
    down: Point,
    module_size: f32,
) -> Option<Point> {
    if module_size <= 0.0 {
        return None;
    }
    let radius = (SEARCH_MODULES * module_size).ceil() as i32;

    let mut scored = Vec::new();
    let mut best = 0usize;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let center = predicted.translate(dx as f32, dy as f32);
            let score = pattern_score(binary, center, across, down);
            if score >= MIN_SCORE {
                best = best.max(score);
                scored.push((center, score));
            }
        }
    }
    if best == 0 {
        return None;
    }

    let top: Vec<Point> = scored
        .into_iter()
        .filter(|(_, s)| *s == best)
        .map(|(p, _)| p)
        .collect();
    let anchor = top.iter().copied().min_by(|a, b| {
        a.distance_squared(&predicted)
            .total_cmp(&b.distance_squared(&predicted))
    })?;

    let plateau: Vec<Point> = top
        .into_iter()
        .filter(|p| p.distance(&anchor) <= 1.5 * module_size)
        .collect();
    let n = plateau.len() as f32;
    let sum = plateau
        .iter()
        .fold(Point::new(0.0, 0.0), |acc, p| acc.translate(p.x, p.y));
    Some(sum.scale(1.0 / n))
}

/// Count of module centers agreeing with dark ring / light ring / dark core
fn pattern_score(binary: &BitMatrix, center: Point, across: Point, down: Point) -> usize {
    let mut score = 0;
    for j in -2i32..=2 {
        for i in -2i32..=2 {
            let expected_dark = i.abs().max(j.abs()) != 1;
            let x = center.x + across.x * i as f32 + down.x * j as f32;
            let y = center.y + across.y * i as f32 + down.y * j as f32;
            let dark = binary.get_signed(x.floor() as isize, y.floor() as isize);
            if dark == expected_dark {
                score += 1;
            }
        }
    }
    score
}
