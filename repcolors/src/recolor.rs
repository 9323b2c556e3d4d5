//! Recoloring images with a fitted palette
//!
//! All functions here read the input image and write into a new buffer.

use crate::{classify::Classifier, ColorVector, Error, Result};
use image::{Rgb, RgbImage};

/// A rectangular area of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
	/// Left edge
	pub x: u32,
	/// Top edge
	pub y: u32,
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
}

impl Region {
	/// The whole of an image with the given dimensions
	#[must_use]
	pub const fn full(width: u32, height: u32) -> Self {
		Self { x: 0, y: 0, width, height }
	}

	/// The left half of an image, excluding the middle column for odd widths
	#[must_use]
	pub const fn left_half(width: u32, height: u32) -> Self {
		Self { x: 0, y: 0, width: width / 2, height }
	}

	/// The right half of an image, starting at `width / 2`
	#[must_use]
	pub const fn right_half(width: u32, height: u32) -> Self {
		let x = width / 2;
		Self { x, y: 0, width: width - x, height }
	}

	/// Returns an error if this region does not lie inside `image`
	fn check_bounds(&self, image: &RgbImage) -> Result<()> {
		let (image_width, image_height) = image.dimensions();
		let fits = |start: u32, len: u32, max: u32| start.checked_add(len).map_or(false, |end| end <= max);

		if fits(self.x, self.width, image_width) && fits(self.y, self.height, image_height) {
			Ok(())
		} else {
			Err(Error::RegionOutOfBounds {
				x: self.x,
				y: self.y,
				width: self.width,
				height: self.height,
				image_width,
				image_height,
			})
		}
	}
}

/// An owned copy of `region` of `image`
///
/// # Errors
/// Returns [`Error::RegionOutOfBounds`] if `region` does not lie inside `image`.
pub fn crop(image: &RgbImage, region: Region) -> Result<RgbImage> {
	region.check_bounds(image)?;
	Ok(image::imageops::crop_imm(image, region.x, region.y, region.width, region.height).to_image())
}

/// The palette color closest to `pixel`, as an 8-bit pixel
fn recolor_pixel(classifier: &Classifier, pixel: Rgb<u8>) -> Result<Rgb<u8>> {
	let color = classifier.nearest_color(&ColorVector::from(pixel.0))?;
	color
		.to_srgb()
		.map(|srgb| Rgb([srgb.red, srgb.green, srgb.blue]))
		.ok_or(Error::DimensionMismatch { expected: 3, found: color.dim() })
}

/// A copy of `image` with every pixel replaced by its nearest palette color
///
/// # Errors
/// Returns [`Error::EmptyPalette`] if the classifier has no colors,
/// or [`Error::DimensionMismatch`] if its colors do not have 3 components.
pub fn recolor(image: &RgbImage, classifier: &Classifier) -> Result<RgbImage> {
	let (width, height) = image.dimensions();
	recolor_region(image, Region::full(width, height), classifier)
}

/// A copy of `image` where the pixels inside `region` are replaced by their nearest palette color
///
/// # Errors
/// Returns [`Error::RegionOutOfBounds`] if `region` does not lie inside `image`,
/// otherwise the same errors as [`recolor`].
pub fn recolor_region(image: &RgbImage, region: Region, classifier: &Classifier) -> Result<RgbImage> {
	region.check_bounds(image)?;

	let mut output = image.clone();
	for y in region.y..(region.y + region.height) {
		for x in region.x..(region.x + region.width) {
			let pixel = recolor_pixel(classifier, *image.get_pixel(x, y))?;
			output.put_pixel(x, y, pixel);
		}
	}

	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn gradient() -> RgbImage {
		RgbImage::from_fn(5, 2, |x, _| {
			#[allow(clippy::cast_possible_truncation)]
			let v = (x * 60) as u8;
			Rgb([v, v, v])
		})
	}

	fn black_and_white() -> Classifier {
		Classifier::new(vec![ColorVector::from([0_u8, 0, 0]), ColorVector::from([255_u8, 255, 255])])
	}

	#[test]
	fn halves_split_at_the_middle() {
		assert_eq!(Region::left_half(5, 2), Region { x: 0, y: 0, width: 2, height: 2 });
		assert_eq!(Region::right_half(5, 2), Region { x: 2, y: 0, width: 3, height: 2 });
		assert_eq!(Region::full(5, 2), Region { x: 0, y: 0, width: 5, height: 2 });
	}

	#[test]
	fn recolor_uses_only_palette_colors() {
		let image = gradient();
		let output = recolor(&image, &black_and_white()).unwrap();

		let expected = [0, 0, 0, 255, 255];
		for (x, y, pixel) in output.enumerate_pixels() {
			let v = expected[x as usize];
			assert_eq!(*pixel, Rgb([v, v, v]), "pixel ({x}, {y})");
		}
	}

	#[test]
	fn recolor_region_leaves_the_rest_untouched() {
		let image = gradient();
		let output = recolor_region(&image, Region::left_half(5, 2), &black_and_white()).unwrap();

		for (x, y, pixel) in output.enumerate_pixels() {
			if x < 2 {
				assert_eq!(*pixel, Rgb([0, 0, 0]));
			} else {
				assert_eq!(pixel, image.get_pixel(x, y));
			}
		}
	}

	#[test]
	fn crop_copies_the_region() {
		let image = gradient();
		let cropped = crop(&image, Region::right_half(5, 2)).unwrap();

		assert_eq!(cropped.dimensions(), (3, 2));
		assert_eq!(cropped.get_pixel(0, 0), image.get_pixel(2, 0));
	}

	#[test]
	fn out_of_bounds_region() {
		let image = gradient();
		let region = Region { x: 3, y: 0, width: 3, height: 2 };

		assert!(matches!(crop(&image, region), Err(Error::RegionOutOfBounds { .. })));
		assert!(matches!(
			recolor_region(&image, region, &black_and_white()),
			Err(Error::RegionOutOfBounds { .. })
		));
	}

	#[test]
	fn palette_errors_propagate() {
		let image = gradient();

		assert_eq!(recolor(&image, &Classifier::new(Vec::new())), Err(Error::EmptyPalette));

		let gray = Classifier::new(vec![ColorVector::from([0.0])]);
		assert!(matches!(recolor(&image, &gray), Err(Error::DimensionMismatch { .. })));
	}
}
