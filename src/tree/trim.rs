use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;

use super::arena::{Arena, NodeId};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Ranked {
	index: usize,
	score: i64,
}

impl Ord for Ranked {
	fn cmp(&self, other: &Self) -> CmpOrdering {
		self.score
			.cmp(&other.score)
			.then_with(|| other.index.cmp(&self.index))
	}
}

impl PartialOrd for Ranked {
	fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
		Some(self.cmp(other))
	}
}

/// Keeps the `capacity` highest scores seen, ties going to the lower index.
#[derive(Debug, Clone)]
pub struct TopScores {
	capacity: usize,
	heap: BinaryHeap<Reverse<Ranked>>,
}

impl TopScores {
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			heap: BinaryHeap::with_capacity(capacity),
		}
	}

	/// Offer a candidate; returns whether it is currently kept.
	pub fn push(&mut self, index: usize, score: i64) -> bool {
		let entry = Ranked { index, score };
		if self.heap.len() < self.capacity {
			self.heap.push(Reverse(entry));
			true
		} else if let Some(mut current_min) = self.heap.peek_mut() {
			if entry > current_min.0 {
				*current_min = Reverse(entry);
				true
			} else {
				false
			}
		} else {
			false
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.heap.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.heap.is_empty()
	}

	/// Score that a new candidate has to beat once the heap is full.
	#[must_use]
	pub fn min_score(&self) -> Option<i64> {
		self.heap.peek().map(|entry| entry.0.score)
	}

	/// Survivors as `(index, score)`, best first.
	#[must_use]
	pub fn into_ranked(self) -> Vec<(usize, i64)> {
		self.heap
			.into_sorted_vec()
			.into_iter()
			.map(|Reverse(entry)| (entry.index, entry.score))
			.collect()
	}
}

fn needs_marker(arena: &Arena, dropped: &[usize], id: NodeId) -> bool {
	let node = &arena[id];
	node.explored && node.unlisted + dropped[id] > 0
}

/// Drop the lowest-ranked nodes until the kept nodes plus the prune markers
/// they need fit in `capacity` lines. Returns how many nodes were dropped.
///
/// A node ranks by the best score in its kept subtree, so whenever a node
/// survives its ancestors do too.
pub(super) fn trim_to_capacity(arena: &mut Arena, kept: &mut [bool], capacity: usize) -> usize {
	let mut effective: Vec<i64> = arena.iter().map(|(_, node)| node.score).collect();
	for (id, node) in arena.iter().rev() {
		if !kept[id] {
			continue;
		}
		if let Some(parent) = node.parent {
			effective[parent] = effective[parent].max(effective[id]);
		}
	}

	let mut dropped = vec![0usize; arena.len()];
	let kept_count = kept.iter().filter(|kept| **kept).count();
	let markers = (0..arena.len())
		.filter(|&id| kept[id] && needs_marker(arena, &dropped, id))
		.count();
	if kept_count + markers <= capacity {
		return 0;
	}

	let mut top = TopScores::new(capacity);
	for id in (0..arena.len()).filter(|&id| kept[id]) {
		top.push(id, effective[id]);
	}
	let ranked = top.into_ranked();
	let mut in_top = vec![false; arena.len()];
	for &(id, _) in &ranked {
		in_top[id] = true;
	}

	let mut trimmed = 0;
	for (id, node) in arena.iter() {
		if kept[id] && !in_top[id] {
			kept[id] = false;
			trimmed += 1;
			if let Some(parent) = node.parent
				&& in_top[parent]
			{
				dropped[parent] += 1;
			}
		}
	}

	let mut markers = ranked
		.iter()
		.filter(|(id, _)| needs_marker(arena, &dropped, *id))
		.count();
	let mut len = ranked.len();
	// The last ranked node never has kept children, so it can go on its own.
	while len > 1 && len + markers > capacity {
		let (id, _) = ranked[len - 1];
		len -= 1;
		kept[id] = false;
		trimmed += 1;
		if needs_marker(arena, &dropped, id) {
			markers -= 1;
		}
		if let Some(parent) = arena[id].parent {
			let before = needs_marker(arena, &dropped, parent);
			dropped[parent] += 1;
			if !before {
				markers += 1;
			}
		}
	}

	for &(id, _) in &ranked[..len] {
		arena[id].unlisted += dropped[id];
	}
	trimmed
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_the_highest_scores() {
		let mut top = TopScores::new(2);
		for (index, score) in [10, 5, 8].into_iter().enumerate() {
			top.push(index, score);
		}
		assert_eq!(top.into_ranked(), vec![(0, 10), (2, 8)]);
	}

	#[test]
	fn ties_prefer_earlier_discovery() {
		let mut top = TopScores::new(2);
		assert!(top.push(0, 7));
		assert!(top.push(1, 7));
		assert!(!top.push(2, 7));
		assert_eq!(top.min_score(), Some(7));
		assert_eq!(top.into_ranked(), vec![(0, 7), (1, 7)]);
	}

	#[test]
	fn result_is_independent_of_discovery_order() {
		let scores = [3, 99, 42, 7, 42, 1, 64, 15];
		let mut forward = TopScores::new(3);
		let mut backward = TopScores::new(3);
		for (index, score) in scores.iter().enumerate() {
			forward.push(index, *score);
		}
		for (index, score) in scores.iter().enumerate().rev() {
			backward.push(index, *score);
		}
		assert_eq!(forward.into_ranked(), backward.into_ranked());
	}

	#[test]
	fn zero_capacity_keeps_nothing() {
		let mut top = TopScores::new(0);
		assert!(!top.push(0, 1));
		assert!(top.is_empty());
	}
}
