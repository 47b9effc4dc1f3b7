use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MIN_DISTANCE: f64 = 0.01;

/// Force-directed layout parameters
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    pub seed: u64,
    pub iterations: usize,
    /// Optimal distance is `spacing / sqrt(n)`
    pub spacing: f64,
}

/// Fruchterman-Reingold spring layout over a weighted adjacency matrix.
///
/// Initial positions come from a seeded RNG, so the same inputs always give
/// the same coordinates. The result is centred on the origin and scaled so
/// the largest coordinate magnitude is 1.
pub fn spring_layout(adjacency: &[Vec<f64>], params: &LayoutParams) -> Vec<[f64; 2]> {
    let n = adjacency.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![[0.0, 0.0]],
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();

    let k = params.spacing / (n as f64).sqrt();
    let mut temperature = 0.1 * extent(&pos).max(MIN_DISTANCE);
    let cooling = temperature / (params.iterations as f64 + 1.0);

    for _ in 0..params.iterations {
        let mut displacement = vec![[0.0f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                // Repulsion between every pair, attraction along weighted edges
                let force = k * k / (distance * distance) - adjacency[i][j] * distance / k;
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }

        for (p, d) in pos.iter_mut().zip(&displacement) {
            let length = (d[0] * d[0] + d[1] * d[1]).sqrt().max(MIN_DISTANCE);
            p[0] += d[0] * temperature / length;
            p[1] += d[1] * temperature / length;
        }
        temperature -= cooling;
    }

    rescale(pos)
}

/// Largest side of the bounding box
fn extent(pos: &[[f64; 2]]) -> f64 {
    (0..2)
        .map(|axis| {
            let (lo, hi) = pos.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
            hi - lo
        })
        .fold(0.0, f64::max)
}

fn rescale(mut pos: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    let n = pos.len() as f64;
    for axis in 0..2 {
        let mean = pos.iter().map(|p| p[axis]).sum::<f64>() / n;
        for p in pos.iter_mut() {
            p[axis] -= mean;
        }
    }

    let max_abs = pos
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0, f64::max);
    if max_abs > 0.0 {
        for p in pos.iter_mut() {
            p[0] /= max_abs;
            p[1] /= max_abs;
        }
    }
    pos
}
