//! Specifies the CLI and handles arg parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Supported output formats for the final colors
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FormatOutput {
	/// sRGB hexcode
	Hex,
	/// sRGB (r,g,b) triple
	Rgb,
	/// Whitespace with true color background
	Swatch,
}

/// Ways to colorize the output text
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorizeOutput {
	/// Foreground
	Fg,
	/// Background
	Bg,
}

/// The part of the image to recolor
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum RecolorRegion {
	/// The whole image
	Full,
	/// The left half of the image
	Left,
	/// The right half of the image
	Right,
}

/// Find the representative colors of an image by performing k-means clustering on its pixels.
///
/// The colors are printed from most to least common.
/// Optionally, part of the image can be recolored using only those colors.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Options {
	/// The path to the input image
	pub image: PathBuf,

	/// The format to print the colors in
	#[arg(short, long, default_value = "hex")]
	pub output: FormatOutput,

	/// Color the foreground or background for each printed color
	#[arg(short, long)]
	pub colorize: Option<ColorizeOutput>,

	/// Print the colors from least to most common instead
	#[arg(short, long)]
	pub reverse: bool,

	/// The number of colors to find
	///
	/// This must not be greater than the number of pixels in the (thumbnail) image.
	#[arg(short, default_value_t = 5)]
	pub k: usize,

	/// The number of trials of k-means to run
	///
	/// k-means can get stuck in a local minimum, so you may want to run a few or more trials to get better results.
	/// The trial with the lowest variance is picked.
	#[arg(short = 'n', long, default_value_t = 1)]
	pub trials: u32,

	/// The threshold used to determine k-means convergence
	///
	/// k-means stops once every color moved less than this distance during a round.
	/// Distances are measured in 0-255 sRGB channel units.
	#[arg(short = 'e', long, default_value_t = repcolors::DEFAULT_CONVERGENCE_THRESHOLD, value_parser = parse_valid_convergence)]
	pub convergence_threshold: f64,

	/// The maximum number of iterations for each k-means trial, or 0 for no limit
	///
	/// If k-means has not converged by then, no colors are printed and an error is reported instead.
	#[arg(short = 'i', long, default_value_t = repcolors::DEFAULT_MAX_ITER)]
	pub max_iter: u32,

	/// The seed value used for the random number generator
	///
	/// If not provided, a different seed is used on each run.
	#[arg(long)]
	pub seed: Option<u64>,

	/// Convert the image to grayscale before finding colors
	#[arg(short, long)]
	pub grayscale: bool,

	/// The maximum image size, in number of pixels, before a thumbnail is created
	///
	/// Each pixel becomes a point for k-means, so this option can greatly reduce the time needed for large images.
	/// Multiple pixels in the original image are interpolated to form a pixel in the thumbnail,
	/// which may reduce the color accuracy.
	#[arg(short = 'p', long, default_value_t = u32::MAX)]
	pub max_pixels: u32,

	/// Save a copy of the (thumbnail) image recolored with the found colors to this path
	///
	/// The image format is chosen by the file extension.
	#[arg(long)]
	pub recolor: Option<PathBuf>,

	/// The part of the image to recolor, used together with --recolor
	#[arg(long, default_value = "left")]
	pub region: RecolorRegion,

	/// The number of threads to use
	///
	/// A value of 0 indicates to automatically choose the number of threads.
	#[cfg(feature = "threads")]
	#[arg(short, long, default_value_t = 0)]
	pub threads: u8,

	/// Print additional information, such as the number of k-means iterations
	#[arg(long)]
	pub verbose: bool,
}

impl Options {
	/// The iteration limit, with 0 meaning no limit
	pub fn iteration_limit(&self) -> Option<u32> {
		if self.max_iter == 0 {
			None
		} else {
			Some(self.max_iter)
		}
	}
}

/// Parse the convergence threshold and ensure it is a positive, finite number
fn parse_valid_convergence(s: &str) -> Result<f64, String> {
	let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
	if value.is_finite() && value > 0.0 {
		Ok(value)
	} else {
		Err(format!("{value} is not a positive number"))
	}
}
