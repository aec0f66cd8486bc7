/// Per-channel sums accumulated inside a node, wide enough that summing
/// every pixel of a large image cannot overflow.
pub(crate) type BigColor = [u64; 3];

/// An RGB color with an alpha channel.
///
/// Channels are expected to be in `0..=255`; nothing checks this, and
/// values outside that range are accepted but map to meaningless palette
/// entries. Alpha is carried along but never quantized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
	pub red: u32,
	pub green: u32,
	pub blue: u32,
	pub alpha: u32,
}

impl Color {
	/// Makes an opaque color (alpha of 1).
	pub fn new(red: u32, green: u32, blue: u32) -> Self {
		Self { red, green, blue, alpha: 1 }
	}

	pub fn with_alpha(red: u32, green: u32, blue: u32, alpha: u32) -> Self {
		Self { red, green, blue, alpha }
	}

	/// Squared euclidean distance over the RGB channels.
	pub fn distance_squared(&self, other: &Color) -> u64 {
		let d = |a: u32, b: u32| {
			let diff = a as i64 - b as i64;
			(diff * diff) as u64
		};
		d(self.red, other.red) + d(self.green, other.green) + d(self.blue, other.blue)
	}

	pub(crate) fn add_to(&self, sum: &mut BigColor) {
		sum[0] += self.red as u64;
		sum[1] += self.green as u64;
		sum[2] += self.blue as u64;
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::new(0, 0, 0)
	}
}

impl From<[u8; 3]> for Color {
	fn from(c: [u8; 3]) -> Self {
		Self::new(c[0] as u32, c[1] as u32, c[2] as u32)
	}
}

impl From<image::Rgb<u8>> for Color {
	fn from(pixel: image::Rgb<u8>) -> Self {
		Self::from(pixel.0)
	}
}

impl From<Color> for image::Rgb<u8> {
	/// Channels above 255 saturate.
	fn from(c: Color) -> Self {
		image::Rgb::<u8>([
			c.red.min(255) as u8,
			c.green.min(255) as u8,
			c.blue.min(255) as u8,
		])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_opaque_black() {
		assert_eq!(Color::default(), Color::with_alpha(0, 0, 0, 1));
		assert_eq!(Color::new(1, 2, 3).alpha, 1);
	}

	#[test]
	fn pixel_conversion_saturates() {
		let px: image::Rgb<u8> = Color::new(300, 128, 0).into();
		assert_eq!(px, image::Rgb([255, 128, 0]));
		assert_eq!(Color::from(image::Rgb([9u8, 8, 7])), Color::new(9, 8, 7));
	}

	#[test]
	fn distance_ignores_alpha() {
		let a = Color::with_alpha(10, 20, 30, 0);
		let b = Color::with_alpha(13, 16, 30, 255);
		assert_eq!(a.distance_squared(&b), 25);
		assert_eq!(b.distance_squared(&a), 25);
	}
}
