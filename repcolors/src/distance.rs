//! Color vectors and the two numeric primitives used by k-means: distance and centroid

use crate::{Error, Result};
use palette::Srgb;

/// A fixed-dimension color, one `f64` per channel
///
/// Components come from the caller as-is: no color space conversion is applied.
/// Centers computed by k-means are also [`ColorVector`]s and may have fractional components.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorVector(Box<[f64]>);

impl ColorVector {
	/// Create a color vector from its components
	#[must_use]
	pub fn new(components: Vec<f64>) -> Self {
		Self(components.into_boxed_slice())
	}

	/// The components of this color
	#[must_use]
	pub fn components(&self) -> &[f64] {
		&self.0
	}

	/// The number of components (channels) of this color
	#[must_use]
	pub fn dim(&self) -> usize {
		self.0.len()
	}

	/// The integer representative of this color, each component truncated toward zero
	#[must_use]
	pub fn truncated(&self) -> Self {
		Self(self.0.iter().map(|c| c.trunc()).collect())
	}

	/// Convert a 3 component color to an 8-bit [`Srgb`] color, clamping each channel to `0..=255`
	///
	/// Returns `None` if this color does not have exactly 3 components.
	#[must_use]
	pub fn to_srgb(&self) -> Option<Srgb<u8>> {
		// the value is clamped to the u8 range first
		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let channel = |c: f64| c.clamp(0.0, 255.0) as u8;

		match *self.0 {
			[r, g, b] => Some(Srgb::new(channel(r), channel(g), channel(b))),
			_ => None,
		}
	}
}

impl From<Vec<f64>> for ColorVector {
	fn from(components: Vec<f64>) -> Self {
		Self::new(components)
	}
}

impl<const N: usize> From<[f64; N]> for ColorVector {
	fn from(components: [f64; N]) -> Self {
		Self(components.into())
	}
}

impl From<[u8; 3]> for ColorVector {
	fn from([r, g, b]: [u8; 3]) -> Self {
		Self::from([f64::from(r), f64::from(g), f64::from(b)])
	}
}

impl From<Srgb<u8>> for ColorVector {
	fn from(color: Srgb<u8>) -> Self {
		Self::from([color.red, color.green, color.blue])
	}
}

/// Returns an error if `a` and `b` have a different number of components
fn check_dimensions(a: &ColorVector, b: &ColorVector) -> Result<()> {
	if a.dim() == b.dim() {
		Ok(())
	} else {
		Err(Error::dimension_mismatch(a.dim(), b.dim()))
	}
}

/// Squared Euclidean distance between two colors
///
/// # Errors
/// Returns [`Error::DimensionMismatch`] if `a` and `b` have a different number of components.
pub fn squared_distance(a: &ColorVector, b: &ColorVector) -> Result<f64> {
	check_dimensions(a, b)?;
	Ok(a.components()
		.iter()
		.zip(b.components())
		.map(|(x, y)| {
			let d = x - y;
			d * d
		})
		.sum())
}

/// Euclidean distance between two colors
///
/// # Errors
/// Returns [`Error::DimensionMismatch`] if `a` and `b` have a different number of components.
pub fn distance(a: &ColorVector, b: &ColorVector) -> Result<f64> {
	squared_distance(a, b).map(f64::sqrt)
}

/// The componentwise arithmetic mean of `points`
///
/// # Errors
/// Returns [`Error::EmptyCluster`] if `points` is empty,
/// or [`Error::DimensionMismatch`] if the points do not all share the same number of components.
pub fn centroid(points: &[ColorVector]) -> Result<ColorVector> {
	let (first, rest) = points.split_first().ok_or(Error::EmptyCluster)?;

	// Sum in the same order as the points were given, so results are reproducible
	let mut sum = first.components().to_vec();
	for point in rest {
		check_dimensions(first, point)?;
		for (total, c) in sum.iter_mut().zip(point.components()) {
			*total += c;
		}
	}

	// a point count large enough to lose precision as f64 would not fit in memory
	#[allow(clippy::cast_precision_loss)]
	let n = points.len() as f64;
	for total in &mut sum {
		*total /= n;
	}

	Ok(ColorVector::new(sum))
}
