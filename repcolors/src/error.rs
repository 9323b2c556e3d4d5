//! Errors returned by the clustering engine, the classifier, and the image glue

use thiserror::Error;

/// Result alias for `repcolors`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `repcolors`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
	/// Two color vectors with different numbers of components were compared or averaged
	#[error("dimension mismatch: expected {expected} components, found {found}")]
	DimensionMismatch {
		/// Number of components of the first vector
		expected: usize,
		/// Number of components of the offending vector
		found: usize,
	},

	/// The centroid of an empty set of points was requested
	#[error("cannot compute the centroid of an empty cluster")]
	EmptyCluster,

	/// Fewer points were provided than clusters were requested
	#[error("insufficient samples: {requested} clusters requested but only {available} points provided")]
	InsufficientSamples {
		/// The number of clusters requested
		requested: usize,
		/// The number of points provided
		available: usize,
	},

	/// The centers were still moving when the iteration bound was reached
	#[error("k-means did not converge within {iterations} iterations (last max shift was {max_shift})")]
	DidNotConverge {
		/// The number of completed iterations
		iterations: u32,
		/// The largest center movement of the final iteration
		max_shift: f64,
	},

	/// A configuration value was outside of its valid range
	#[error("invalid parameter `{name}`: {message}")]
	InvalidParameter {
		/// Name of the parameter
		name: &'static str,
		/// What is wrong with it
		message: &'static str,
	},

	/// A nearest color lookup was made against a palette with no colors
	#[error("cannot classify a color against an empty palette")]
	EmptyPalette,

	/// A region does not lie inside the image it was applied to
	#[error("region {width}x{height} at ({x}, {y}) does not fit inside a {image_width}x{image_height} image")]
	RegionOutOfBounds {
		/// Left edge of the region
		x: u32,
		/// Top edge of the region
		y: u32,
		/// Width of the region
		width: u32,
		/// Height of the region
		height: u32,
		/// Width of the image
		image_width: u32,
		/// Height of the image
		image_height: u32,
	},
}

impl Error {
	/// Shorthand for [`Error::DimensionMismatch`]
	pub(crate) const fn dimension_mismatch(expected: usize, found: usize) -> Self {
		Self::DimensionMismatch { expected, found }
	}

	/// Shorthand for [`Error::InvalidParameter`]
	pub(crate) const fn invalid_parameter(name: &'static str, message: &'static str) -> Self {
		Self::InvalidParameter { name, message }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_problem() {
		let insufficient = Error::InsufficientSamples { requested: 5, available: 3 };
		assert_eq!(
			insufficient.to_string(),
			"insufficient samples: 5 clusters requested but only 3 points provided"
		);

		let mismatch = Error::dimension_mismatch(3, 4);
		assert_eq!(mismatch.to_string(), "dimension mismatch: expected 3 components, found 4");

		let invalid = Error::invalid_parameter("k", "must be at least 1");
		assert_eq!(invalid.to_string(), "invalid parameter `k`: must be at least 1");
	}
}
