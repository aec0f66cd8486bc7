pub mod color;
pub mod error;
pub mod image;
pub mod node;

pub use color::Color;
pub use error::QuantizeError;
pub use node::{NodeId, OctreeNode};

use log::{debug, trace};

/// Depth of the tree; one bit of each channel is consumed per level.
///
/// Tied to 8-bit channels. Wider channels need a deeper tree.
pub const MAX_DEPTH: usize = 8;

const ROOT: NodeId = NodeId(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
	Building,
	Pruned,
}

/// Octree color quantizer.
///
/// Used in two phases: colors are inserted with `add_color`, then
/// `make_palette` prunes the tree once, after which only `palette_index`
/// lookups are allowed.
///
/// All nodes live in one arena addressed by `NodeId`; the root is the first
/// slot. Beside the arena, every node created above the last level is
/// recorded per level in creation order, which is the order pruning walks.
#[derive(Clone, Debug)]
pub struct OctreeQuantizer {
	nodes: Vec<OctreeNode>,
	levels: Vec<Vec<NodeId>>,
	phase: Phase,
}

impl Default for OctreeQuantizer {
	fn default() -> Self {
		Self::new()
	}
}

impl OctreeQuantizer {
	pub fn new() -> Self {
		let mut quantizer = Self {
			nodes: Vec::new(),
			levels: vec![Vec::new(); MAX_DEPTH],
			phase: Phase::Building,
		};
		quantizer.create_node(0);
		quantizer
	}

	pub fn root(&self) -> NodeId {
		ROOT
	}

	pub fn node(&self, id: NodeId) -> &OctreeNode {
		&self.nodes[id.0]
	}

	/// Nodes registered for `level`, in creation order.
	pub fn level_nodes(&self, level: usize) -> &[NodeId] {
		&self.levels[level]
	}

	/// Whether `make_palette` has already run.
	pub fn is_pruned(&self) -> bool {
		self.phase == Phase::Pruned
	}

	fn create_node(&mut self, level: usize) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(OctreeNode::default());
		if level < MAX_DEPTH - 1 {
			self.add_level_node(level, id);
		}
		id
	}

	pub(crate) fn add_level_node(&mut self, level: usize, node: NodeId) {
		self.levels[level].push(node);
	}

	/// Inserts one pixel's color, creating nodes along its path as needed.
	pub fn add_color(&mut self, color: Color) -> Result<(), QuantizeError> {
		if self.is_pruned() {
			return Err(QuantizeError::UseAfterPrune);
		}
		self.add_color_at(ROOT, &color, 0);
		Ok(())
	}

	fn add_color_at(&mut self, id: NodeId, color: &Color, level: usize) {
		if level >= MAX_DEPTH {
			self.nodes[id.0].absorb(color);
			return;
		}
		let index = OctreeNode::index_for_level(color, level);
		let child = match self.nodes[id.0].children[index] {
			Some(child) => child,
			None => {
				let child = self.create_node(level);
				self.nodes[id.0].children[index] = Some(child);
				child
			}
		};
		self.add_color_at(child, color, level + 1)
	}

	/// Leaves below `id`, depth first with children in index order.
	///
	/// Descent stops at the first leaf on each path; anything under a leaf
	/// is ignored.
	pub fn leaf_nodes(&self, id: NodeId) -> Vec<NodeId> {
		let mut leaves = Vec::new();
		for child in self.nodes[id.0].children() {
			if self.nodes[child.0].is_leaf() {
				leaves.push(child);
			} else {
				leaves.extend(self.leaf_nodes(child));
			}
		}
		leaves
	}

	/// Every leaf in the tree, in palette order.
	pub fn leaves(&self) -> Vec<NodeId> {
		self.leaf_nodes(ROOT)
	}

	/// Pixel count of `id` plus that of its immediate children.
	///
	/// Only goes one level down; a rough aggregate, not a subtree total.
	pub fn nodes_pixel_count(&self, id: NodeId) -> u64 {
		let node = &self.nodes[id.0];
		node.pixel_count + node.children().map(|c| self.nodes[c.0].pixel_count).sum::<u64>()
	}

	/// Folds the sums and pixel counts of every child of `id` into `id`,
	/// making it a leaf.
	///
	/// Returns the number of children folded minus one, the amount by which
	/// the tree's leaf count shrinks. The children stay in the arena but are
	/// never reached again, since descent stops at the new leaf.
	pub(crate) fn remove_leaves(&mut self, id: NodeId) -> isize {
		let mut folded = 0;
		for index in 0..8 {
			if let Some(child) = self.nodes[id.0].children[index] {
				let (sum, count) = {
					let c = &self.nodes[child.0];
					(c.sum, c.pixel_count)
				};
				self.nodes[id.0].fold(&sum, count);
				folded += 1;
			}
		}
		folded - 1
	}

	/// Prunes the tree down to at most `color_count` leaves and returns their
	/// average colors, in the order of `leaves()`.
	///
	/// Levels are collapsed deepest first, node by node in creation order,
	/// stopping as soon as the running leaf count reaches `color_count`.
	/// The first `color_count` leaves get palette indices in order. Any leaf
	/// past that maps to the palette entry nearest its own average color.
	///
	/// May only be called once; the tree is read-only afterwards.
	pub fn make_palette(&mut self, color_count: usize) -> Result<Vec<Color>, QuantizeError> {
		if self.is_pruned() {
			return Err(QuantizeError::UseAfterPrune);
		}
		self.phase = Phase::Pruned;

		let target = color_count.min(isize::MAX as usize) as isize;
		let mut leaf_count = self.leaves().len() as isize;
		for level in (0..MAX_DEPTH).rev() {
			if self.levels[level].is_empty() {
				continue;
			}
			let registered = std::mem::take(&mut self.levels[level]);
			let mut collapsed = 0;
			for &id in registered.iter() {
				leaf_count -= self.remove_leaves(id);
				collapsed += 1;
				if leaf_count <= target {
					break;
				}
			}
			debug!(
				"level {}: collapsed {} of {} nodes, {} leaves left",
				level, collapsed, registered.len(), leaf_count
			);
			if leaf_count <= target {
				self.levels[level] = registered;
				break;
			}
		}

		let leaves = self.leaves();
		let mut palette = Vec::with_capacity(leaves.len().min(color_count));
		for &leaf in leaves.iter().take(color_count) {
			let node = &mut self.nodes[leaf.0];
			palette.push(node.color()?);
			node.palette_index = Some(palette.len() - 1);
		}
		for &leaf in leaves.iter().skip(color_count) {
			let color = self.nodes[leaf.0].color()?;
			let nearest = palette.iter()
				.enumerate()
				.map(|(ind, col)| (col.distance_squared(&color), ind))
				.min()
				.map(|x| x.1);
			trace!("overflow leaf {:?} mapped to {:?}", color, nearest);
			self.nodes[leaf.0].palette_index = nearest;
		}
		debug!("{} leaves, {} palette colors", leaves.len(), palette.len());
		Ok(palette)
	}

	/// Palette index for `color`, valid for the palette `make_palette`
	/// returned.
	///
	/// Colors whose path was never populated follow the first present child
	/// instead, still indexed by `color` on the levels below.
	pub fn palette_index(&self, color: Color) -> Result<usize, QuantizeError> {
		if !self.is_pruned() {
			return Err(QuantizeError::PaletteNotBuilt);
		}
		self.palette_index_at(ROOT, &color, 0)
	}

	fn palette_index_at(&self, id: NodeId, color: &Color, level: usize) -> Result<usize, QuantizeError> {
		let node = &self.nodes[id.0];
		if node.is_leaf() {
			return node.palette_index.ok_or(QuantizeError::EmptyPalette);
		}
		if level >= MAX_DEPTH {
			return Err(QuantizeError::InconsistentTree);
		}
		let next = node.child(OctreeNode::index_for_level(color, level))
			.or_else(|| node.children().next())
			.ok_or(QuantizeError::InconsistentTree)?;
		self.palette_index_at(next, color, level + 1)
	}
}
