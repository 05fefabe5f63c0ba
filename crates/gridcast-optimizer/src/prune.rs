// Dominance pruning ahead of the model build.
//
// A candidate is dominated when at least `k` candidates at its position cost
// no more and project no fewer points, with `k` the most that position can
// still take. A roster holding it always has an unused dominator to swap in
// without losing points or breaking the cap, so the optimum is unchanged.

use tracing::debug;

use gridcast_core::candidate::Candidate;
use gridcast_core::position::Position;

use crate::model::is_exact;
use crate::preprocess::Reduction;

/// The most candidates at `pos` the reduced program can select.
pub fn capacity(reduction: &Reduction, pos: Position, one_te: bool) -> usize {
    let slots = reduction.slots.max(0);
    let minimum = i64::from(reduction.minimums.get(pos));
    let most = if is_exact(pos, one_te) {
        minimum
    } else {
        let spare = (slots - i64::from(reduction.minimums.total())).max(0);
        minimum + spare
    };
    usize::try_from(most.min(slots)).unwrap_or(0)
}

/// Drop dominated candidates, keeping pool order for the rest.
pub fn prune_dominated(
    pool: &[Candidate],
    reduction: &Reduction,
    one_te: bool,
) -> Vec<Candidate> {
    // More points first, then cheaper, then pool order. Everything ahead of a
    // candidate projects at least as many points as it does.
    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.sort_by(|&a, &b| {
        pool[b]
            .projected_points
            .total_cmp(&pool[a].projected_points)
            .then(pool[a].salary.cmp(&pool[b].salary))
            .then(a.cmp(&b))
    });

    let mut keep = vec![false; pool.len()];
    for pos in Position::ALL {
        let k = capacity(reduction, pos, one_te);
        let mut ahead: Vec<u32> = Vec::new();
        for &i in order.iter().filter(|&&i| pool[i].position == pos) {
            let salary = pool[i].salary;
            let dominators = ahead.iter().filter(|&&s| s <= salary).count();
            keep[i] = dominators < k;
            ahead.push(salary);
        }
    }

    let kept: Vec<Candidate> = pool
        .iter()
        .zip(&keep)
        .filter_map(|(c, &k)| k.then(|| c.clone()))
        .collect();

    debug!(
        "pruned {} dominated candidates, {} remain",
        pool.len() - kept.len(),
        kept.len()
    );
    kept
}
