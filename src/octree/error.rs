use thiserror::Error;

/// Reason why an octree operation couldn't complete.
///
/// Every variant is a misuse of the quantizer or a broken tree, not
/// something that goes away on retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuantizeError {
	/// A palette lookup reached an interior node that has no children.
	#[error("palette lookup reached an interior node with no children")]
	InconsistentTree,

	/// An average color was requested from a node that absorbed no pixels.
	#[error("cannot average a node that has absorbed no pixels")]
	EmptyLeafAverage,

	/// The tree was modified after `make_palette` pruned it.
	#[error("the tree has already been pruned into a palette")]
	UseAfterPrune,

	/// A lookup was attempted before `make_palette` ran.
	#[error("palette has not been built yet")]
	PaletteNotBuilt,

	/// A lookup landed on a leaf with no palette entry; the palette is empty.
	#[error("palette is empty")]
	EmptyPalette,

	/// A palette index fell outside the palette supplied for remapping.
	#[error("palette index {index} is out of range for a palette of {len} colors")]
	PaletteMismatch {
		index: usize,
		len: usize,
	},
}
