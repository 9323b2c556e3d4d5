//! Extracting color vectors from images

use crate::ColorVector;
use image::{DynamicImage, RgbImage};
use palette::Srgb;
use std::collections::HashMap;

/// How to read the color channels of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
	/// Use the image's colors as 8-bit sRGB
	#[default]
	Rgb,
	/// Convert the image to grayscale first, then back to 3 channel sRGB
	Grayscale,
}

/// Deduplicated Srgb colors and the number of pixels with each color
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorCounts {
	/// Distinct colors, in order of first appearance
	colors: Vec<Srgb<u8>>,
	/// The number of pixels for each color
	counts: Vec<u32>,
}

impl ColorCounts {
	/// Count the colors of a decoded image
	#[must_use]
	pub fn from_image(image: &DynamicImage, mode: ChannelMode) -> Self {
		match mode {
			ChannelMode::Rgb => Self::from_rgb_image(&image.to_rgb8()),
			ChannelMode::Grayscale => Self::from_rgb_image(&image.grayscale().to_rgb8()),
		}
	}

	/// Count the colors of an 8-bit RGB image
	#[must_use]
	pub fn from_rgb_image(image: &RgbImage) -> Self {
		Self::from_srgb(palette::cast::from_component_slice(image.as_raw()))
	}

	/// Count the given Srgb colors, merging duplicates
	#[must_use]
	pub fn from_srgb(pixels: &[Srgb<u8>]) -> Self {
		let mut data = Self::default();

		// Packed Srgb -> data index
		let mut memo: HashMap<u32, usize> = HashMap::new();

		for &srgb in pixels {
			let key = srgb.into_u32::<palette::rgb::channels::Rgba>();
			let index = *memo.entry(key).or_insert_with(|| {
				data.colors.push(srgb);
				data.counts.push(0);
				data.colors.len() - 1
			});

			data.counts[index] += 1;
		}

		data
	}

	/// The number of distinct colors
	#[must_use]
	pub fn num_colors(&self) -> usize {
		self.colors.len()
	}

	/// The total number of pixels counted
	#[must_use]
	pub fn total(&self) -> u64 {
		self.counts.iter().copied().map(u64::from).sum()
	}

	/// Iterate over each distinct color with its pixel count
	pub fn pairs(&self) -> impl Iterator<Item = (Srgb<u8>, u32)> + '_ {
		self.colors.iter().copied().zip(self.counts.iter().copied())
	}

	/// One color vector per pixel: each distinct color repeated once per occurrence
	#[must_use]
	pub fn color_vectors(&self) -> Vec<ColorVector> {
		self.pairs()
			.flat_map(|(color, n)| std::iter::repeat(ColorVector::from(color)).take(n as usize))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{GrayImage, Luma, Rgb};

	fn test_image() -> RgbImage {
		RgbImage::from_fn(4, 3, |x, _| if x < 3 { Rgb([200, 10, 10]) } else { Rgb([0, 0, 255]) })
	}

	#[test]
	fn duplicates_are_counted() {
		let counts = ColorCounts::from_rgb_image(&test_image());

		assert_eq!(counts.num_colors(), 2);
		assert_eq!(counts.total(), 12);
		assert_eq!(
			counts.pairs().collect::<Vec<_>>(),
			vec![(Srgb::new(200, 10, 10), 9), (Srgb::new(0, 0, 255), 3)]
		);
	}

	#[test]
	fn color_vectors_repeat_each_occurrence() {
		let counts = ColorCounts::from_srgb(&[Srgb::new(1, 2, 3), Srgb::new(4, 5, 6), Srgb::new(1, 2, 3)]);
		assert_eq!(
			counts.color_vectors(),
			vec![
				ColorVector::from([1_u8, 2, 3]),
				ColorVector::from([1_u8, 2, 3]),
				ColorVector::from([4_u8, 5, 6]),
			]
		);
	}

	#[test]
	fn grayscale_gives_three_equal_channels() {
		let image = DynamicImage::ImageRgb8(test_image());
		let counts = ColorCounts::from_image(&image, ChannelMode::Grayscale);

		assert_eq!(counts.total(), 12);
		for (color, _) in counts.pairs() {
			assert_eq!(color.red, color.green);
			assert_eq!(color.green, color.blue);
		}
	}

	#[test]
	fn gray_source_is_forced_to_rgb() {
		let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([77])));
		let vectors = ColorCounts::from_image(&image, ChannelMode::Rgb).color_vectors();

		assert_eq!(vectors, vec![ColorVector::from([77_u8, 77, 77]); 4]);
	}

	#[test]
	fn empty_image() {
		let counts = ColorCounts::from_rgb_image(&RgbImage::new(0, 0));
		assert_eq!(counts.num_colors(), 0);
		assert!(counts.color_vectors().is_empty());
	}
}
