use crate::source::EntryKind;

use super::arena::{Arena, NodeId};
use super::{DisplayLine, LineId, LineKind};

/// Flatten the kept nodes into display order: depth first, children in
/// discovery order, each explored directory closed by a prune marker when
/// some of its entries are not shown.
pub(super) fn materialize(arena: &mut Arena, kept: &[bool]) -> Vec<DisplayLine> {
	let mut last_kept_child: Vec<Option<NodeId>> = vec![None; arena.len()];
	for id in 0..arena.len() {
		if !kept[id] {
			continue;
		}
		let mut surviving = 0;
		for &child in &arena[id].children {
			if kept[child] {
				surviving += 1;
				last_kept_child[id] = Some(child);
			}
		}
		arena[id].surviving_children = surviving;
	}

	let mut lines = Vec::new();
	let mut line_of: Vec<Option<LineId>> = vec![None; arena.len()];
	let mut branches: Vec<bool> = Vec::new();

	emit(arena, 0, None, &branches, &mut lines, &mut line_of);
	let mut stack = vec![0];
	while let Some(&top) = stack.last() {
		let node = &mut arena[top];
		let next = loop {
			let Some(&child) = node.children.get(node.next_child) else {
				break None;
			};
			node.next_child += 1;
			if kept[child] {
				break Some(child);
			}
		};

		match next {
			Some(child) => {
				let later_sibling = last_kept_child[top] != Some(child) || has_marker(arena, top);
				let depth = arena[child].depth;
				branches.truncate(depth - 1);
				branches.push(later_sibling);
				emit(arena, child, line_of[top], &branches, &mut lines, &mut line_of);
				stack.push(child);
			}
			None => {
				stack.pop();
				if has_marker(arena, top) {
					let depth = arena[top].depth + 1;
					branches.truncate(depth - 1);
					branches.push(false);
					lines.push(marker(arena, top, line_of[top], &branches, lines.len()));
				}
			}
		}
	}

	lines
}

fn has_marker(arena: &Arena, id: NodeId) -> bool {
	arena[id].explored && arena[id].unlisted > 0
}

fn emit(
	arena: &Arena,
	id: NodeId,
	parent: Option<LineId>,
	branches: &[bool],
	lines: &mut Vec<DisplayLine>,
	line_of: &mut [Option<LineId>],
) {
	let node = &arena[id];
	let line_id = LineId(lines.len());
	line_of[id] = Some(line_id);
	lines.push(DisplayLine {
		id: line_id,
		parent,
		depth: node.depth,
		path: node.path.clone(),
		name: node.name.clone(),
		kind: line_kind(&node.kind),
		score: node.score,
		direct_match: node.direct_match,
		has_error: node.has_error,
		surviving_children: node.surviving_children,
		unlisted: node.unlisted,
		left_branches: branches.to_vec(),
		explored: node.explored,
	});
}

fn marker(
	arena: &Arena,
	owner: NodeId,
	parent: Option<LineId>,
	branches: &[bool],
	index: usize,
) -> DisplayLine {
	let node = &arena[owner];
	DisplayLine {
		id: LineId(index),
		parent,
		depth: node.depth + 1,
		path: node.path.clone(),
		name: String::new(),
		kind: LineKind::PruneMarker,
		score: 0,
		direct_match: false,
		has_error: false,
		surviving_children: 0,
		unlisted: node.unlisted,
		left_branches: branches.to_vec(),
		explored: false,
	}
}

fn line_kind(kind: &EntryKind) -> LineKind {
	match kind {
		EntryKind::File => LineKind::File,
		EntryKind::Directory => LineKind::Directory,
		EntryKind::Symlink {
			target,
			resolved_is_dir,
		} => LineKind::SymbolicLink {
			target: target.clone(),
			resolved_is_directory: *resolved_is_dir,
		},
		EntryKind::BrokenSymlink { target } => LineKind::BrokenSymbolicLink {
			target: target.clone(),
		},
	}
}
