//! Random recipient draws.

use rand::Rng;
use tracing::trace;

use crate::core::types::ParticipantId;

/// Draw a recipient for every giver, in order, from a shrinking pool.
///
/// Each giver takes a uniformly chosen id from the ids not yet drawn,
/// redrawing when it picks itself. When the last giver is left with only its
/// own id the pass is thrown away and started over, so the result is always a
/// derangement of `givers`.
///
/// Returns `None` when no derangement exists (exactly one giver).
pub fn draw_recipients<R: Rng>(
    givers: &[ParticipantId],
    rng: &mut R,
) -> Option<Vec<(ParticipantId, ParticipantId)>> {
    if givers.len() == 1 {
        return None;
    }
    let mut passes = 1u32;
    loop {
        if let Some(pairs) = draw_pass(givers, rng) {
            trace!(givers = givers.len(), passes, "draw complete");
            return Some(pairs);
        }
        passes += 1;
    }
}

fn draw_pass<R: Rng>(
    givers: &[ParticipantId],
    rng: &mut R,
) -> Option<Vec<(ParticipantId, ParticipantId)>> {
    let mut pool = givers.to_vec();
    let mut pairs = Vec::with_capacity(givers.len());
    for &giver in givers {
        if pool == [giver] {
            return None;
        }
        let recipient = loop {
            let index = rng.gen_range(0..pool.len());
            if pool[index] != giver {
                break pool.swap_remove(index);
            }
        };
        pairs.push((giver, recipient));
    }
    Some(pairs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn ids(count: i64) -> Vec<ParticipantId> {
        (1..=count).map(ParticipantId).collect()
    }

    #[test]
    fn single_giver_has_no_draw() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(draw_recipients(&ids(1), &mut rng), None);
    }

    #[test]
    fn empty_roster_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(draw_recipients(&[], &mut rng), Some(Vec::new()));
    }

    #[test]
    fn two_givers_always_swap() {
        let givers = ids(2);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pairs = draw_recipients(&givers, &mut rng).expect("draw");
            assert_eq!(
                pairs,
                vec![
                    (ParticipantId(1), ParticipantId(2)),
                    (ParticipantId(2), ParticipantId(1)),
                ]
            );
        }
    }

    #[test]
    fn draws_are_derangements_in_giver_order() {
        for size in 2..=8 {
            let givers = ids(size);
            for seed in 0..50 {
                let mut rng = StdRng::seed_from_u64(seed);
                let pairs = draw_recipients(&givers, &mut rng).expect("draw");
                let order: Vec<ParticipantId> = pairs.iter().map(|(giver, _)| *giver).collect();
                assert_eq!(order, givers);
                assert!(pairs.iter().all(|(giver, recipient)| giver != recipient));
                let recipients: HashSet<ParticipantId> =
                    pairs.iter().map(|(_, recipient)| *recipient).collect();
                assert_eq!(recipients, givers.iter().copied().collect());
            }
        }
    }
}
