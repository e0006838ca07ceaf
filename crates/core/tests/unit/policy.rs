//! Replacement Policy Tests.
//!
//! Exercises victim selection for FIFO, LRU, Second-Chance and Random in
//! isolation, over hand-built frame sets. Each policy implements
//! `ReplacementPolicy::select_victim(&mut dyn FrameSet) -> Result<usize, SimError>`.

use pagesim_core::SimError;
use pagesim_core::config::PolicyKind;
use pagesim_core::policy::{
    self, FifoPolicy, FrameMeta, LruPolicy, RandomPolicy, ReplacementPolicy, SecondChancePolicy,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::ScriptedFrames;

// ══════════════════════════════════════════════════════════
// 1. FIFO Policy
// ══════════════════════════════════════════════════════════

/// The earliest load is evicted regardless of later touches.
#[test]
fn fifo_evicts_oldest_load() {
    let mut frames = ScriptedFrames::full(&[(3, 9, true), (1, 10, true), (2, 2, false)]);
    assert_eq!(FifoPolicy.select_victim(&mut frames).unwrap(), 1);
}

/// Equal load ticks go to the lowest slot.
#[test]
fn fifo_ties_break_to_lowest_slot() {
    let mut frames = ScriptedFrames::full(&[(5, 5, false), (2, 2, false), (2, 2, false)]);
    assert_eq!(FifoPolicy.select_victim(&mut frames).unwrap(), 1);
}

/// FIFO never touches referenced flags.
#[test]
fn fifo_leaves_referenced_flags_alone() {
    let mut frames = ScriptedFrames::full(&[(1, 1, true), (2, 2, true)]);
    let _ = FifoPolicy.select_victim(&mut frames).unwrap();
    assert_eq!(frames.referenced(), vec![true, true]);
}

// ══════════════════════════════════════════════════════════
// 2. LRU Policy
// ══════════════════════════════════════════════════════════

/// The oldest touch is evicted, not the oldest load.
#[test]
fn lru_evicts_least_recently_accessed() {
    let mut frames = ScriptedFrames::full(&[(1, 8, true), (2, 3, false), (3, 6, false)]);
    assert_eq!(LruPolicy.select_victim(&mut frames).unwrap(), 1);
}

/// Equal access ticks go to the lowest slot.
#[test]
fn lru_ties_break_to_lowest_slot() {
    let mut frames = ScriptedFrames::full(&[(1, 7, false), (2, 4, false), (3, 4, false)]);
    assert_eq!(LruPolicy.select_victim(&mut frames).unwrap(), 1);
}

/// The victim's `accessed_at` is minimal over the pool.
#[test]
fn lru_victim_is_minimal() {
    let mut frames = ScriptedFrames::full(&[(1, 40, false), (2, 12, false), (3, 33, false), (4, 19, false)]);
    let victim = LruPolicy.select_victim(&mut frames).unwrap();
    let chosen = frames.slots[victim].unwrap().accessed_at;
    assert!(frames.slots.iter().flatten().all(|m| chosen <= m.accessed_at));
}

// ══════════════════════════════════════════════════════════
// 3. Second-Chance Policy
// ══════════════════════════════════════════════════════════

/// An unreferenced frame under the hand is taken at once.
#[test]
fn clock_takes_unreferenced_frame_under_hand() {
    let mut clock = SecondChancePolicy::new();
    let mut frames = ScriptedFrames::full(&[(1, 1, false), (2, 2, false)]);
    assert_eq!(clock.select_victim(&mut frames).unwrap(), 0);
    assert_eq!(clock.hand(), 1);
}

/// Referenced frames lose their flag and are skipped.
#[test]
fn clock_gives_referenced_frames_a_second_chance() {
    let mut clock = SecondChancePolicy::new();
    let mut frames = ScriptedFrames::full(&[(1, 1, true), (2, 2, true), (3, 3, false), (4, 4, true)]);

    assert_eq!(clock.select_victim(&mut frames).unwrap(), 2);
    assert_eq!(frames.referenced(), vec![false, false, false, true]);
    assert_eq!(clock.hand(), 3);
}

/// When every frame is referenced, one revolution clears them all and the
/// frame under the hand goes (FIFO degeneration).
#[test]
fn clock_all_referenced_degenerates_to_hand_position() {
    let mut clock = SecondChancePolicy::new();
    let mut frames = ScriptedFrames::full(&[(1, 1, true), (2, 2, true), (3, 3, true)]);

    assert_eq!(clock.select_victim(&mut frames).unwrap(), 0);
    assert_eq!(frames.referenced(), vec![false, false, false]);
    assert_eq!(clock.hand(), 1);
}

/// The hand persists between calls instead of restarting at slot 0.
#[test]
fn clock_hand_persists_across_calls() {
    let mut clock = SecondChancePolicy::new();
    let mut frames = ScriptedFrames::full(&[(1, 1, false), (2, 2, false), (3, 3, false)]);

    assert_eq!(clock.select_victim(&mut frames).unwrap(), 0);
    assert_eq!(clock.select_victim(&mut frames).unwrap(), 1);
    assert_eq!(clock.select_victim(&mut frames).unwrap(), 2);
    // Wraps around.
    assert_eq!(clock.select_victim(&mut frames).unwrap(), 0);
}

/// A frame referenced when the hand reaches it survives that sweep.
#[test]
fn clock_referenced_frame_survives_the_pass() {
    let mut clock = SecondChancePolicy::new();
    let mut frames = ScriptedFrames::full(&[(1, 1, false), (2, 2, true), (3, 3, false)]);

    assert_eq!(clock.select_victim(&mut frames).unwrap(), 0);
    // Hand at 1: slot 1 is referenced, so slot 2 goes instead.
    assert_eq!(clock.select_victim(&mut frames).unwrap(), 2);
    // Slot 1 lost its flag on the way past and is next in line after the wrap.
    assert_eq!(frames.referenced(), vec![false, false, false]);
    assert_eq!(clock.select_victim(&mut frames).unwrap(), 0);
    assert_eq!(clock.select_victim(&mut frames).unwrap(), 1);
}

/// Empty slots (sparse subtrees) are skipped by the sweep.
#[test]
fn clock_skips_empty_slots() {
    let mut clock = SecondChancePolicy::new();
    let mut frames = ScriptedFrames {
        slots: vec![
            None,
            Some(FrameMeta {
                created_at: 1,
                accessed_at: 1,
                referenced: true,
            }),
            None,
            Some(FrameMeta {
                created_at: 2,
                accessed_at: 2,
                referenced: true,
            }),
        ],
    };
    assert_eq!(clock.select_victim(&mut frames).unwrap(), 1);
    assert_eq!(clock.hand(), 2);
}

// ══════════════════════════════════════════════════════════
// 4. Random Policy
// ══════════════════════════════════════════════════════════

/// The same seed yields the same victim sequence.
#[test]
fn random_is_reproducible_from_seed() {
    let mut frames = ScriptedFrames::full(&[(1, 1, false); 8]);
    let mut a = RandomPolicy::new(42);
    let mut b = RandomPolicy::new(42);
    let run_a: Vec<usize> = (0..32).map(|_| a.select_victim(&mut frames).unwrap()).collect();
    let run_b: Vec<usize> = (0..32).map(|_| b.select_victim(&mut frames).unwrap()).collect();
    assert_eq!(run_a, run_b);
}

/// Only occupied slots are ever chosen.
#[test]
fn random_only_picks_occupied_slots() {
    let meta = FrameMeta::loaded(1);
    let mut frames = ScriptedFrames {
        slots: vec![None, Some(meta), None, Some(meta), None],
    };
    let mut random = RandomPolicy::new(7);
    for _ in 0..64 {
        let victim = random.select_victim(&mut frames).unwrap();
        assert!(victim == 1 || victim == 3, "picked empty slot {victim}");
    }
}

/// Over many draws every occupied slot is eventually chosen.
#[test]
fn random_covers_every_slot() {
    let mut frames = ScriptedFrames::full(&[(1, 1, false); 4]);
    let mut random = RandomPolicy::new(3);
    let mut seen = [false; 4];
    for _ in 0..200 {
        seen[random.select_victim(&mut frames).unwrap()] = true;
    }
    assert_eq!(seen, [true; 4]);
}

// ══════════════════════════════════════════════════════════
// 5. Shared contract
// ══════════════════════════════════════════════════════════

/// An empty pool is an invariant violation for every policy.
#[rstest]
#[case(PolicyKind::Fifo)]
#[case(PolicyKind::Lru)]
#[case(PolicyKind::SecondChance)]
#[case(PolicyKind::Random)]
fn empty_pool_has_no_candidate(#[case] kind: PolicyKind) {
    let mut policy = policy::build(kind, 1);
    let mut frames = ScriptedFrames {
        slots: vec![None; 4],
    };
    assert_eq!(
        policy.select_victim(&mut frames),
        Err(SimError::NoEvictionCandidate { slots: 4 })
    );

    let mut nothing = ScriptedFrames::default();
    assert!(matches!(
        policy.select_victim(&mut nothing),
        Err(SimError::NoEvictionCandidate { slots: 0 })
    ));
}

/// `build` returns an instance of the requested kind.
#[rstest]
#[case(PolicyKind::Fifo)]
#[case(PolicyKind::Lru)]
#[case(PolicyKind::SecondChance)]
#[case(PolicyKind::Random)]
fn build_returns_requested_kind(#[case] kind: PolicyKind) {
    assert_eq!(policy::build(kind, 9).kind(), kind);
}

/// A single occupied frame is always the victim.
#[rstest]
#[case(PolicyKind::Fifo)]
#[case(PolicyKind::Lru)]
#[case(PolicyKind::SecondChance)]
#[case(PolicyKind::Random)]
fn single_frame_is_always_chosen(#[case] kind: PolicyKind) {
    let mut policy = policy::build(kind, 5);
    let mut frames = ScriptedFrames::full(&[(4, 9, true)]);
    for _ in 0..3 {
        assert_eq!(policy.select_victim(&mut frames).unwrap(), 0);
    }
}
