//! Find the representative colors of an image with k-means clustering,
//! then recolor images by nearest palette color.
//!
//! # Examples
//!
//! ## Read an image file and get its 5 most representative colors.
//!
//! ```no_run
//! use repcolors::{ChannelMode, ColorCounts, Kmeans};
//!
//! let image = image::open("some image").unwrap();
//! let points = ColorCounts::from_image(&image, ChannelMode::Rgb).color_vectors();
//! let palette = Kmeans::new(5).with_seed(0).fit(&points).unwrap();
//! let colors = palette.colors();
//! ```
//!
//! ## Recolor the left half of an image with its palette.
//!
//! ```no_run
//! use repcolors::{ChannelMode, ColorCounts, Region};
//!
//! let image = image::open("some image").unwrap();
//! let points = ColorCounts::from_image(&image, ChannelMode::Grayscale).color_vectors();
//! let palette = repcolors::fit(&points, 5, 10.0, Some(42)).unwrap();
//!
//! let rgb = image.to_rgb8();
//! let (width, height) = rgb.dimensions();
//! let recolored = repcolors::recolor_region(&rgb, Region::left_half(width, height), &palette.classifier()).unwrap();
//! ```
//!
//! # Arguments
//!
//! ## K
//!
//! The number of clusters, and so the (maximum) number of colors in the palette.
//! It must not be greater than the number of input points.
//!
//! Each cluster starts at a distinct, randomly chosen input point.
//! A cluster that ends up closest to no points keeps its previous center and members
//! and is reported through [`Palette::empty_clusters`],
//! so a palette may have fewer than `k` meaningfully populated colors.
//!
//! ## Convergence Threshold
//!
//! k-means stops once no center moved by this distance or more during a round.
//! The default is `10.0`, in the same units as the color components (0-255 for 8-bit colors).
//! Lower values give more accurate centers at the cost of more rounds.
//!
//! ## Max Iterations
//!
//! The number of rounds after which k-means gives up with [`Error::DidNotConverge`].
//! `None` keeps iterating until the threshold is met, which may never happen for degenerate inputs.
//!
//! ## Seed
//!
//! The value used to seed the random number generator which chooses the initial centers.
//! The same seed, points, and parameters always give the same palette.
//! Without a seed, the generator is seeded from the operating system.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::enum_glob_use)]
#![allow(clippy::unreadable_literal)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod classify;
mod distance;
mod error;
mod kmeans;
mod pixels;
mod recolor;

pub use classify::{nearest, Classifier};
pub use distance::{centroid, distance, squared_distance, ColorVector};
pub use error::{Error, Result};
pub use kmeans::{fit, Cluster, Kmeans, Palette, DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_MAX_ITER};
pub use pixels::{ChannelMode, ColorCounts};
pub use recolor::{crop, recolor, recolor_region, Region};
