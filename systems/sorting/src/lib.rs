#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reference sort transaction generators.
//!
//! Given the shuffled tile ordering at the start of a session, these
//! generators produce the canonical swap sequence the player is measured
//! against. Generation is pure and deterministic: the input slice is copied
//! once and never mutated, and the same input always yields the same
//! transaction list.

use pathx_core::{AlgorithmKind, SortTransaction, TileId};

/// Generates the canonical swap sequence for the chosen algorithm.
#[must_use]
pub fn generate(kind: AlgorithmKind, tiles: &[TileId]) -> Vec<SortTransaction> {
    match kind {
        AlgorithmKind::BubbleSort => bubble_sort(tiles),
        AlgorithmKind::SelectionSort => selection_sort(tiles),
    }
}

/// Classic adjacent-swap bubble sort over a private copy.
///
/// Only real swaps are recorded: a pass that finds `copy[j] <= copy[j + 1]`
/// contributes nothing. Worst case n(n-1)/2 transactions.
fn bubble_sort(tiles: &[TileId]) -> Vec<SortTransaction> {
    let mut copy = tiles.to_vec();
    let mut transactions = Vec::new();

    let n = copy.len();
    for i in (1..n).rev() {
        for j in 0..i {
            if copy[j] > copy[j + 1] {
                transactions.push(SortTransaction::new(j, j + 1));
                copy.swap(j, j + 1);
            }
        }
    }
    transactions
}

/// Minimum-selection sort over a private copy.
///
/// Every outer iteration records a transaction, including the no-op case
/// where the minimum is already in place. No-op swaps count toward the win
/// condition, so they must stay in the sequence. Exactly n-1 transactions
/// for n > 0.
fn selection_sort(tiles: &[TileId]) -> Vec<SortTransaction> {
    let mut copy = tiles.to_vec();
    let mut transactions = Vec::new();

    let n = copy.len();
    for i in 0..n.saturating_sub(1) {
        let mut min_index = i;
        for j in (i + 1)..n {
            if copy[j] < copy[min_index] {
                min_index = j;
            }
        }
        transactions.push(SortTransaction::new(i, min_index));
        copy.swap(i, min_index);
    }
    transactions
}

#[cfg(test)]
mod tests {
    use super::generate;
    use pathx_core::{AlgorithmKind, SortTransaction, TileId};

    fn tiles(ids: &[u32]) -> Vec<TileId> {
        ids.iter().copied().map(TileId::new).collect()
    }

    #[test]
    fn selection_sort_logs_noop_swaps() {
        let input = tiles(&[0, 1, 2]);
        let transactions = generate(AlgorithmKind::SelectionSort, &input);
        assert_eq!(
            transactions,
            vec![SortTransaction::new(0, 0), SortTransaction::new(1, 1)],
            "already-sorted input must still log one transaction per pass",
        );
    }

    #[test]
    fn bubble_sort_skips_ordered_pairs() {
        let input = tiles(&[0, 1, 2]);
        assert!(
            generate(AlgorithmKind::BubbleSort, &input).is_empty(),
            "sorted input needs no bubble transactions",
        );
    }

    #[test]
    fn generators_never_mutate_the_input() {
        let input = tiles(&[4, 2, 3, 1]);
        let before = input.clone();
        let _ = generate(AlgorithmKind::BubbleSort, &input);
        let _ = generate(AlgorithmKind::SelectionSort, &input);
        assert_eq!(input, before);
    }

    #[test]
    fn empty_and_singleton_inputs_yield_no_transactions() {
        for kind in [AlgorithmKind::BubbleSort, AlgorithmKind::SelectionSort] {
            assert!(generate(kind, &[]).is_empty());
            assert!(generate(kind, &tiles(&[9])).is_empty());
        }
    }
}
