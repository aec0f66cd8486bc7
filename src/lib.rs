pub mod octree;

pub use octree::{Color, NodeId, OctreeNode, OctreeQuantizer, QuantizeError, MAX_DEPTH};
pub use octree::image::palette_image;

/// Quantizes `img` down to at most `color_count` colors.
///
/// Returns the palette alongside the remapped image.
pub fn quantize_image(
	img: &image::RgbImage,
	color_count: usize
) -> Result<(Vec<Color>, image::RgbImage), QuantizeError> {
	let mut quantizer = OctreeQuantizer::new();
	quantizer.add_image(img)?;
	let palette = quantizer.make_palette(color_count)?;
	let remapped = quantizer.remap_image(img, &palette)?;
	Ok((palette, remapped))
}
