use std::ops::{Index, IndexMut};
use std::path::PathBuf;

use crate::source::EntryKind;

pub(super) type NodeId = usize;

/// Build-time node. Lives only as long as its arena.
#[derive(Debug, Clone)]
pub(super) struct BuildNode {
	pub(super) parent: Option<NodeId>,
	pub(super) depth: usize,
	pub(super) path: PathBuf,
	pub(super) name: String,
	pub(super) kind: EntryKind,
	pub(super) children: Vec<NodeId>,
	/// Materializer cursor into `children`.
	pub(super) next_child: usize,
	/// The node or something below it matched.
	pub(super) has_match: bool,
	pub(super) direct_match: bool,
	pub(super) score: i64,
	pub(super) surviving_children: usize,
	pub(super) unlisted: usize,
	pub(super) has_error: bool,
	pub(super) explored: bool,
}

impl BuildNode {
	pub(super) fn new(parent: Option<NodeId>, depth: usize, path: PathBuf, name: String, kind: EntryKind) -> Self {
		Self {
			parent,
			depth,
			path,
			name,
			kind,
			children: Vec::new(),
			next_child: 0,
			has_match: false,
			direct_match: false,
			score: 0,
			surviving_children: 0,
			unlisted: 0,
			has_error: false,
			explored: false,
		}
	}
}

/// Nodes in discovery order: a parent always precedes its children.
#[derive(Debug, Default)]
pub(super) struct Arena {
	nodes: Vec<BuildNode>,
}

impl Arena {
	pub(super) fn with_root(root: BuildNode) -> Self {
		Self { nodes: vec![root] }
	}

	pub(super) fn len(&self) -> usize {
		self.nodes.len()
	}

	pub(super) fn push(&mut self, node: BuildNode) -> NodeId {
		let id = self.nodes.len();
		if let Some(parent) = node.parent {
			self.nodes[parent].children.push(id);
		}
		self.nodes.push(node);
		id
	}

	/// Flag `id` and its ancestors as leading to a match.
	pub(super) fn mark_match_path(&mut self, id: NodeId) {
		let mut cursor = Some(id);
		while let Some(current) = cursor {
			let node = &mut self.nodes[current];
			if node.has_match && current != id {
				break;
			}
			node.has_match = true;
			cursor = node.parent;
		}
	}

	pub(super) fn iter(&self) -> impl DoubleEndedIterator<Item = (NodeId, &BuildNode)> {
		self.nodes.iter().enumerate()
	}
}

impl Index<NodeId> for Arena {
	type Output = BuildNode;

	fn index(&self, id: NodeId) -> &BuildNode {
		&self.nodes[id]
	}
}

impl IndexMut<NodeId> for Arena {
	fn index_mut(&mut self, id: NodeId) -> &mut BuildNode {
		&mut self.nodes[id]
	}
}
