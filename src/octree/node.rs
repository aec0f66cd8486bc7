use super::color::{BigColor, Color};
use super::error::QuantizeError;
use super::MAX_DEPTH;

/// Handle to a node stored in an `OctreeQuantizer`.
///
/// Handles are only ever made by the quantizer that owns the node, so they
/// stay valid for its whole lifetime; pruning never frees a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Node in an octree over RGB colors.
///
/// A node is a leaf exactly when it has absorbed pixels (`pixel_count > 0`),
/// whether or not its child slots are still filled. Leaves hold the sum of
/// every absorbed color; the palette color is that sum divided by the count.
#[derive(Clone, Debug, Default)]
pub struct OctreeNode {
	pub(crate) children: [Option<NodeId>; 8],
	pub(crate) sum: BigColor,
	pub(crate) pixel_count: u64,
	pub(crate) palette_index: Option<usize>,
}

impl OctreeNode {
	/// Picks which of the eight children `color` descends into at `level`.
	///
	/// One bit of each channel is consumed per level, most significant bit
	/// first, and packed as `red << 2 | green << 1 | blue`. Colors that agree
	/// in their top `k` bits therefore share a path for the first `k` levels.
	///
	/// `level` must be below `MAX_DEPTH`.
	pub fn index_for_level(color: &Color, level: usize) -> usize {
		debug_assert!(level < MAX_DEPTH);
		let shift = MAX_DEPTH - 1 - level;
		let bit = |c: u32| ((c >> shift) & 1) as usize;
		(bit(color.red) << 2) | (bit(color.green) << 1) | bit(color.blue)
	}

	pub fn is_leaf(&self) -> bool {
		self.pixel_count > 0
	}

	/// Number of pixels folded into this node so far.
	pub fn pixel_count(&self) -> u64 {
		self.pixel_count
	}

	/// Position of this node's color in the palette, once one is built.
	pub fn palette_index(&self) -> Option<usize> {
		self.palette_index
	}

	pub fn child(&self, index: usize) -> Option<NodeId> {
		self.children.get(index).copied().flatten()
	}

	/// Present children, in index order.
	pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.children.iter().filter_map(|c| *c)
	}

	/// Average of every color absorbed by this node.
	///
	/// Division truncates. Fails on a node that never absorbed a pixel.
	pub fn color(&self) -> Result<Color, QuantizeError> {
		if self.pixel_count == 0 {
			return Err(QuantizeError::EmptyLeafAverage);
		}
		let avg = |s: u64| (s / self.pixel_count) as u32;
		Ok(Color::new(avg(self.sum[0]), avg(self.sum[1]), avg(self.sum[2])))
	}

	pub(crate) fn absorb(&mut self, color: &Color) {
		color.add_to(&mut self.sum);
		self.pixel_count += 1;
	}

	pub(crate) fn fold(&mut self, sum: &BigColor, pixel_count: u64) {
		for (acc, s) in self.sum.iter_mut().zip(sum.iter()) {
			*acc += s;
		}
		self.pixel_count += pixel_count;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn index_uses_msb_first() {
		let c = Color::new(0b1000_0000, 0b0100_0000, 0b0000_0001);
		assert_eq!(OctreeNode::index_for_level(&c, 0), 0b100);
		assert_eq!(OctreeNode::index_for_level(&c, 1), 0b010);
		assert_eq!(OctreeNode::index_for_level(&c, 7), 0b001);
		assert_eq!(OctreeNode::index_for_level(&Color::new(255, 255, 255), 3), 7);
		assert_eq!(OctreeNode::index_for_level(&Color::new(0, 0, 0), 3), 0);
	}

	#[test]
	fn shared_prefix_shares_path() {
		// Same top 5 bits in every channel, different below.
		let a = Color::new(0b1010_1000, 0b0111_0111, 0b1100_1000);
		let b = Color::new(0b1010_1111, 0b0111_0000, 0b1100_1101);
		for level in 0..5 {
			assert_eq!(
				OctreeNode::index_for_level(&a, level),
				OctreeNode::index_for_level(&b, level)
			);
		}
		assert_ne!(OctreeNode::index_for_level(&a, 5), OctreeNode::index_for_level(&b, 5));
	}

	#[test]
	fn average_truncates() {
		let mut node = OctreeNode::default();
		assert!(!node.is_leaf());
		assert_eq!(node.color(), Err(QuantizeError::EmptyLeafAverage));
		node.absorb(&Color::new(10, 0, 255));
		node.absorb(&Color::new(11, 1, 255));
		assert!(node.is_leaf());
		assert_eq!(node.color(), Ok(Color::new(10, 0, 255)));
	}

	#[test]
	fn children_skip_empty_slots() {
		let mut node = OctreeNode::default();
		node.children[6] = Some(NodeId(2));
		node.children[1] = Some(NodeId(5));
		assert_eq!(node.children().collect::<Vec<_>>(), vec![NodeId(5), NodeId(2)]);
		assert_eq!(node.child(6), Some(NodeId(2)));
		assert_eq!(node.child(0), None);
		assert_eq!(node.child(8), None);
	}
}
