use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use paging::{AccessRecord, PageId, Policy, Trace, simulate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const POLICIES: [Policy; 3] = [Policy::Optimal, Policy::Lru, Policy::SecondChance];

fn frames(count: usize) -> NonZeroUsize {
    NonZeroUsize::new(count).unwrap()
}

fn random_trace(rng: &mut StdRng, len: usize, pages: u64) -> Trace {
    let records = (0..len)
        .map(|_| {
            let page = PageId(rng.gen_range(0..pages));
            if rng.gen_bool(0.3) {
                AccessRecord::store(page)
            } else {
                AccessRecord::load(page)
            }
        })
        .collect::<Vec<_>>();
    Trace::from(records)
}

/// Every sequence of `len` loads drawn from `pages` distinct pages.
fn all_sequences(len: u32, pages: u64) -> impl Iterator<Item = Vec<u64>> {
    (0..pages.pow(len)).map(move |mut code| {
        (0..len)
            .map(|_| {
                let page = code % pages;
                code /= pages;
                page
            })
            .collect()
    })
}

/// Smallest fault count any eviction strategy can reach, found by trying
/// every victim at every full-memory fault.
fn min_faults(sequence: &[u64], frames: usize, resident: &BTreeSet<u64>) -> u64 {
    let Some((&page, rest)) = sequence.split_first() else {
        return 0;
    };
    if resident.contains(&page) {
        return min_faults(rest, frames, resident);
    }
    if resident.len() < frames {
        let mut next = resident.clone();
        next.insert(page);
        return 1 + min_faults(rest, frames, &next);
    }
    resident
        .iter()
        .map(|&victim| {
            let mut next = resident.clone();
            next.remove(&victim);
            next.insert(page);
            1 + min_faults(rest, frames, &next)
        })
        .min()
        .unwrap()
}

fn load_trace(sequence: &[u64]) -> Trace {
    Trace::from(
        sequence
            .iter()
            .map(|&page| AccessRecord::load(PageId(page)))
            .collect::<Vec<_>>(),
    )
}

#[test]
fn test_optimal_matches_exhaustive_search() {
    for sequence in all_sequences(6, 4) {
        let trace = load_trace(&sequence);
        for count in 1..=3 {
            let best = min_faults(&sequence, count, &BTreeSet::new());
            let optimal = simulate(Policy::Optimal, frames(count), &trace);
            assert_eq!(
                optimal.faults, best,
                "sequence {sequence:?} with {count} frames"
            );
            for policy in [Policy::Lru, Policy::SecondChance] {
                let other = simulate(policy, frames(count), &trace);
                assert!(
                    optimal.faults <= other.faults,
                    "{policy} beat OPT on {sequence:?} with {count} frames"
                );
            }
        }
    }
}

#[test]
fn test_optimal_never_worse_on_random_traces() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let trace = random_trace(&mut rng, 200, 12);
        for count in 1..=6 {
            let optimal = simulate(Policy::Optimal, frames(count), &trace);
            let lru = simulate(Policy::Lru, frames(count), &trace);
            let second = simulate(Policy::SecondChance, frames(count), &trace);
            assert!(optimal.faults <= lru.faults);
            assert!(optimal.faults <= second.faults);
        }
    }
}

#[test]
fn test_fault_bounds() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let len = rng.gen_range(0..300);
        let trace = random_trace(&mut rng, len, 20);
        let distinct = trace.distinct_pages() as u64;
        for policy in POLICIES {
            for count in [1, 2, 3, 5, 8, 32] {
                let stats = simulate(policy, frames(count), &trace);
                assert_eq!(stats.accesses, trace.len() as u64);
                assert!(stats.faults <= stats.accesses);
                assert!(stats.faults >= distinct);
                assert!(stats.writebacks <= stats.faults);
            }
        }
    }
}

#[test]
fn test_enough_frames_only_cold_faults() {
    let mut rng = StdRng::seed_from_u64(7);
    let trace = random_trace(&mut rng, 500, 10);
    for policy in POLICIES {
        let stats = simulate(policy, frames(10), &trace);
        assert_eq!(stats.faults, trace.distinct_pages() as u64);
        assert_eq!(stats.writebacks, 0);
    }
}

#[test]
fn test_deterministic_replay() {
    let mut rng = StdRng::seed_from_u64(99);
    let trace = random_trace(&mut rng, 1000, 40);
    for policy in POLICIES {
        for count in [2, 4, 16] {
            let first = simulate(policy, frames(count), &trace);
            let second = simulate(policy, frames(count), &trace);
            assert_eq!(first, second, "{policy} with {count} frames");
        }
    }
}

#[test]
fn test_load_only_trace_never_writes_back() {
    let mut rng = StdRng::seed_from_u64(3);
    let records = (0..400)
        .map(|_| AccessRecord::load(PageId(rng.gen_range(0..30))))
        .collect::<Vec<_>>();
    let trace = Trace::from(records);
    for policy in POLICIES {
        let stats = simulate(policy, frames(4), &trace);
        assert!(stats.faults > 30);
        assert_eq!(stats.writebacks, 0);
    }
}
