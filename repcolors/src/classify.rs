//! Nearest color lookup against a fitted palette

use crate::{distance::distance, ColorVector, Error, Result};

/// The index of the color in `colors` closest to `query`
///
/// If several colors are equally close, the lowest index is returned.
///
/// # Errors
/// Returns [`Error::EmptyPalette`] if `colors` is empty,
/// or [`Error::DimensionMismatch`] if `query` and a color have a different number of components.
pub fn nearest(query: &ColorVector, colors: &[ColorVector]) -> Result<usize> {
	let (first, rest) = colors.split_first().ok_or(Error::EmptyPalette)?;

	let mut min_dist = distance(query, first)?;
	let mut min_index = 0;
	for (i, color) in rest.iter().enumerate() {
		let dist = distance(query, color)?;
		if dist < min_dist {
			min_dist = dist;
			min_index = i + 1;
		}
	}

	Ok(min_index)
}

/// Classifies colors by their nearest palette color
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
	/// Palette colors, most common first
	colors: Vec<ColorVector>,
}

impl Classifier {
	/// Create a classifier over the given palette colors
	#[must_use]
	pub fn new(colors: Vec<ColorVector>) -> Self {
		Self { colors }
	}

	/// The palette colors
	#[must_use]
	pub fn colors(&self) -> &[ColorVector] {
		&self.colors
	}

	/// The index of the palette color closest to `query`
	///
	/// # Errors
	/// See [`nearest`].
	pub fn nearest(&self, query: &ColorVector) -> Result<usize> {
		nearest(query, &self.colors)
	}

	/// The palette color closest to `query`
	///
	/// # Errors
	/// See [`nearest`].
	pub fn nearest_color(&self, query: &ColorVector) -> Result<&ColorVector> {
		self.nearest(query).map(|i| &self.colors[i])
	}
}

impl From<Vec<ColorVector>> for Classifier {
	fn from(colors: Vec<ColorVector>) -> Self {
		Self::new(colors)
	}
}
