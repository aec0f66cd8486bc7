use image::error::ImageError;

use octree_quant::{palette_image, OctreeQuantizer, QuantizeError};

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

/// Maps image decode/encode failures to a message and exit code.
fn image_error_exit(e: ImageError, io_msg: &str) -> ! {
	let (msg, code) = match e {
		ImageError::Decoding(_) => ("Invalid image data", 4),
		ImageError::Limits(_) => ("Computation limits exceeded", 5),
		ImageError::IoError(_) => (io_msg, 3),
		_ => ("An error occurred", 10)
	};
	error_exit(msg, code)
}

fn quantize_error_exit(e: QuantizeError) -> ! {
	error_exit(&format!("Quantization failed: {}", e), 6)
}

/// `clap`-based CLI that reduces an image to a limited palette.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 6: quantization failure
///
/// 10: other, potentially unknown error
fn main() {
	let clap_matches = clap::App::new("octree_quant")
		.version("0.1.0")
		.author("vkcz")
		.about("Reduces an image to a limited palette using an octree quantizer.")
		.arg_from_usage("-c, --colors=[N] 'Maximum number of palette colors; defaults to 256'")
		.arg_from_usage("-p, --palette=[FILE] 'Also write the palette as a swatch image to FILE'")
		.arg_from_usage("<INPUT> 'Path to input image'")
		.arg_from_usage("[OUTPUT] 'Path to output file; defaults to INPUT with a `_quantized.png` suffix'")
		.get_matches();

	let input_path = match clap_matches.value_of("INPUT") {
		Some(p) => p,
		None => error_exit("Missing input path", 2)
	};
	let colors = match clap_matches.value_of("colors").unwrap_or("256").parse::<usize>() {
		Ok(n) => n,
		Err(_) => error_exit("Non-numeric value for colors", 2)
	};

	let source = match image::open(input_path) {
		Ok(i) => i,
		Err(e) => image_error_exit(e, "File not found or could not be read")
	}.into_rgb8();

	let mut quantizer = OctreeQuantizer::new();
	if let Err(e) = quantizer.add_image(&source) {
		quantize_error_exit(e)
	}
	let palette = match quantizer.make_palette(colors) {
		Ok(p) => p,
		Err(e) => quantize_error_exit(e)
	};
	eprintln!("{} colors in generated palette", palette.len());

	if let Some(palette_path) = clap_matches.value_of("palette") {
		if let Err(e) = palette_image(&palette).save(palette_path) {
			image_error_exit(e, "Could not save palette")
		}
	}

	let output = match quantizer.remap_image(&source, &palette) {
		Ok(o) => o,
		Err(e) => quantize_error_exit(e)
	};
	let output_path = match clap_matches.value_of("OUTPUT") {
		Some(p) => p.to_string(),
		None => {
			let stem = input_path.rsplitn(2, '.').last().unwrap_or(input_path);
			stem.to_string() + "_quantized.png"
		}
	};
	if let Err(e) = output.save(&output_path) {
		image_error_exit(e, "Could not save output")
	}
}
