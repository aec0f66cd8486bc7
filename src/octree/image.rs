use std::collections::HashMap;

use super::color::Color;
use super::error::QuantizeError;
use super::OctreeQuantizer;

impl OctreeQuantizer {
	/// Inserts every pixel of `img`, in raster order.
	pub fn add_image(&mut self, img: &image::RgbImage) -> Result<(), QuantizeError> {
		for pixel in img.pixels() {
			self.add_color(Color::from(*pixel))?;
		}
		Ok(())
	}

	/// Looks up the palette index of every pixel of `img`, in raster order.
	///
	/// Each distinct color is only looked up once.
	pub fn index_image(&self, img: &image::RgbImage) -> Result<Vec<usize>, QuantizeError> {
		let mut quant_cache = HashMap::new();
		img.pixels()
			.map(|pix| match quant_cache.get(pix) {
				Some(c) => Ok(*c),
				None => {
					let c = self.palette_index(Color::from(*pix))?;
					quant_cache.insert(pix, c);
					Ok(c)
				}
			})
			.collect()
	}

	/// Produces a copy of `img` with every pixel replaced by its palette color.
	///
	/// `palette` must be the one `make_palette` returned for this tree.
	pub fn remap_image(
		&self,
		img: &image::RgbImage,
		palette: &[Color]
	) -> Result<image::RgbImage, QuantizeError> {
		let indices = self.index_image(img)?;
		let mut out = image::RgbImage::new(img.width(), img.height());
		for (pix, &index) in out.pixels_mut().zip(indices.iter()) {
			let color = palette.get(index).ok_or(QuantizeError::PaletteMismatch {
				index,
				len: palette.len(),
			})?;
			*pix = (*color).into();
		}
		Ok(out)
	}
}

/// Lays a palette out as a square swatch image.
///
/// The side is the smallest square that fits every entry (16 for 256
/// colors). Entries fill the swatch column by column; unused cells are black.
pub fn palette_image(palette: &[Color]) -> image::RgbImage {
	let mut side = 1;
	while side * side < palette.len() {
		side += 1;
	}
	let mut img = image::RgbImage::new(side as u32, side as u32);
	for (i, color) in palette.iter().enumerate() {
		img.put_pixel((i / side) as u32, (i % side) as u32, (*color).into());
	}
	img
}
