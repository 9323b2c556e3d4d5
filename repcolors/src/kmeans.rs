//! Provides the implementation for (Lloyd) k-means over color vectors

use crate::{
	classify::{nearest, Classifier},
	distance::{centroid, distance, squared_distance},
	ColorVector, Error, Result,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::cmp::Reverse;
use tracing::{debug, info, warn};

/// The default convergence threshold, in 0-255 per channel color units
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 10.0;

/// The default maximum number of iterations for a single k-means run
pub const DEFAULT_MAX_ITER: u32 = 1024;

/// A center color and the colors assigned to it by the most recent partition
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
	/// The mean of `members`, or the initial color for a cluster that was never recomputed
	center: ColorVector,
	/// The colors assigned to this cluster
	members: Vec<ColorVector>,
}

impl Cluster {
	/// The center of this cluster
	#[must_use]
	pub fn center(&self) -> &ColorVector {
		&self.center
	}

	/// The colors assigned to this cluster
	#[must_use]
	pub fn members(&self) -> &[ColorVector] {
		&self.members
	}

	/// The number of colors assigned to this cluster
	#[must_use]
	pub fn len(&self) -> usize {
		self.members.len()
	}

	/// Whether this cluster has no members
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}
}

/// Result from running k-means: clusters sorted by descending population
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
	/// Final clusters, largest first
	clusters: Vec<Cluster>,
	/// Number of elapsed iterations
	iterations: u32,
	/// Sum of squared distances between each color and its center in the final partition
	variance: f64,
	/// Number of clusters that received no colors in the final partition
	empty_clusters: usize,
}

impl Palette {
	/// The clusters, sorted by descending number of members
	#[must_use]
	pub fn clusters(&self) -> &[Cluster] {
		&self.clusters
	}

	/// Take ownership of the clusters
	#[must_use]
	pub fn into_clusters(self) -> Vec<Cluster> {
		self.clusters
	}

	/// The number of members in each cluster
	#[must_use]
	pub fn counts(&self) -> Vec<usize> {
		self.clusters.iter().map(Cluster::len).collect()
	}

	/// The integer representative color of each cluster, most common first
	#[must_use]
	pub fn colors(&self) -> Vec<ColorVector> {
		self.clusters.iter().map(|cluster| cluster.center.truncated()).collect()
	}

	/// A [`Classifier`] over this palette's representative colors
	#[must_use]
	pub fn classifier(&self) -> Classifier {
		Classifier::new(self.colors())
	}

	/// The number of clusters
	#[must_use]
	pub fn len(&self) -> usize {
		self.clusters.len()
	}

	/// Whether there are no clusters
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.clusters.is_empty()
	}

	/// The number of assignment and recompute rounds that were run
	#[must_use]
	pub fn iterations(&self) -> u32 {
		self.iterations
	}

	/// Sum of squared distances between each color and its center in the final partition
	///
	/// Clusters that were empty in the final partition do not contribute.
	/// A lower variance indicates a higher accuracy.
	#[must_use]
	pub fn variance(&self) -> f64 {
		self.variance
	}

	/// The number of clusters that received no colors in the final partition
	///
	/// Such clusters keep the center and members they had before.
	#[must_use]
	pub fn empty_clusters(&self) -> usize {
		self.empty_clusters
	}
}

/// K-means clustering over [`ColorVector`]s
///
/// Each call to [`Kmeans::fit`] is independent: all working state lives inside the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kmeans {
	/// Number of clusters
	k: usize,
	/// Largest center movement that still counts as converged (exclusive)
	convergence_threshold: f64,
	/// Maximum number of rounds, `None` for no limit
	max_iter: Option<u32>,
	/// Seed for choosing the initial centers, `None` to seed from the OS
	seed: Option<u64>,
}

impl Kmeans {
	/// Create a k-means clusterer for `k` clusters with the default threshold and iteration limit
	#[must_use]
	pub const fn new(k: usize) -> Self {
		Self {
			k,
			convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
			max_iter: Some(DEFAULT_MAX_ITER),
			seed: None,
		}
	}

	/// Set the convergence threshold
	#[must_use]
	pub const fn with_convergence_threshold(mut self, threshold: f64) -> Self {
		self.convergence_threshold = threshold;
		self
	}

	/// Set the maximum number of iterations, or `None` to iterate until convergence
	#[must_use]
	pub const fn with_max_iter(mut self, max_iter: Option<u32>) -> Self {
		self.max_iter = max_iter;
		self
	}

	/// Set the random seed used to choose the initial centers
	#[must_use]
	pub const fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	/// The number of clusters
	#[must_use]
	pub const fn k(&self) -> usize {
		self.k
	}

	/// The convergence threshold
	#[must_use]
	pub const fn convergence_threshold(&self) -> f64 {
		self.convergence_threshold
	}

	/// The maximum number of iterations
	#[must_use]
	pub const fn max_iter(&self) -> Option<u32> {
		self.max_iter
	}

	/// The random seed
	#[must_use]
	pub const fn seed(&self) -> Option<u64> {
		self.seed
	}

	/// Check the parameters themselves, independent of any input
	fn validate(&self) -> Result<()> {
		if self.k == 0 {
			return Err(Error::invalid_parameter("k", "must be at least 1"));
		}
		if !(self.convergence_threshold.is_finite() && self.convergence_threshold > 0.0) {
			return Err(Error::invalid_parameter(
				"convergence_threshold",
				"must be a positive, finite number",
			));
		}
		if self.max_iter == Some(0) {
			return Err(Error::invalid_parameter("max_iter", "must be at least 1"));
		}
		Ok(())
	}

	/// Run k-means on `points`, returning the clusters sorted by descending population
	///
	/// # Errors
	/// - [`Error::InvalidParameter`] if `k` is 0, the threshold is not positive, `max_iter` is `Some(0)`,
	///   or a point has a NaN or infinite component
	/// - [`Error::InsufficientSamples`] if there are fewer points than `k`
	/// - [`Error::DimensionMismatch`] if the points do not all have the same number of components
	/// - [`Error::DidNotConverge`] if the centers still moved by at least the threshold after `max_iter` rounds
	pub fn fit(&self, points: &[ColorVector]) -> Result<Palette> {
		self.validate()?;

		if points.len() < self.k {
			return Err(Error::InsufficientSamples { requested: self.k, available: points.len() });
		}

		if let Some((first, rest)) = points.split_first() {
			if let Some(point) = rest.iter().find(|point| point.dim() != first.dim()) {
				return Err(Error::dimension_mismatch(first.dim(), point.dim()));
			}
		}

		if points.iter().any(|point| !point.components().iter().all(|c| c.is_finite())) {
			return Err(Error::invalid_parameter("points", "all components must be finite"));
		}

		let mut rng = match self.seed {
			Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
			None => Xoshiro256PlusPlus::from_entropy(),
		};

		let mut clusters = initial_clusters(points, self.k, &mut rng);
		let mut iterations = 0;
		let last = loop {
			let groups = partition(points, &clusters)?;
			let round = recompute(&mut clusters, groups)?;
			iterations += 1;

			debug!(iteration = iterations, max_shift = round.max_shift, empty = round.empty, "k-means round");

			if round.empty > 0 {
				warn!(
					iteration = iterations,
					empty = round.empty,
					k = self.k,
					"clusters received no colors and kept their previous members"
				);
			}

			if round.max_shift < self.convergence_threshold {
				break round;
			}

			if self.max_iter.is_some_and(|max_iter| iterations >= max_iter) {
				return Err(Error::DidNotConverge { iterations, max_shift: round.max_shift });
			}
		};

		info!(k = self.k, points = points.len(), iterations, variance = last.variance, "k-means converged");

		Ok(Palette {
			clusters: rank(clusters),
			iterations,
			variance: last.variance,
			empty_clusters: last.empty,
		})
	}

	/// Run multiple trials of k-means, taking the trial with the lowest variance
	///
	/// Trial `i` uses the seed `seed ^ i`. If no seed was set, a random base seed is drawn first.
	///
	/// # Errors
	/// Returns [`Error::InvalidParameter`] if `trials` is 0, or the first error from any trial (see [`Kmeans::fit`]).
	pub fn fit_trials(&self, points: &[ColorVector], trials: u32) -> Result<Palette> {
		if trials == 0 {
			return Err(Error::invalid_parameter("trials", "must be at least 1"));
		}

		let seed = self
			.seed
			.unwrap_or_else(|| Xoshiro256PlusPlus::from_entropy().gen());

		let trial = |i: u32| -> Result<Palette> {
			let palette = self.with_seed(seed ^ u64::from(i)).fit(points)?;
			debug!(trial = i, variance = palette.variance, "k-means trial");
			Ok(palette)
		};

		// Ties keep the earlier trial
		(1..trials).try_fold(trial(0)?, |best, i| -> Result<Palette> {
			let palette = trial(i)?;
			Ok(if f64::total_cmp(&palette.variance, &best.variance).is_lt() {
				palette
			} else {
				best
			})
		})
	}
}

impl Default for Kmeans {
	fn default() -> Self {
		Self::new(5)
	}
}

/// Run k-means on `points` with `k` clusters and the given threshold and seed
///
/// Uses the default iteration limit. See [`Kmeans::fit`].
///
/// # Errors
/// See [`Kmeans::fit`].
pub fn fit(points: &[ColorVector], k: usize, threshold: f64, seed: Option<u64>) -> Result<Palette> {
	let kmeans = Kmeans::new(k).with_convergence_threshold(threshold);
	match seed {
		Some(seed) => kmeans.with_seed(seed),
		None => kmeans,
	}
	.fit(points)
}

/// Choose `k` distinct points at random as the starting centers, each cluster containing only its center
fn initial_clusters(points: &[ColorVector], k: usize, rng: &mut impl Rng) -> Vec<Cluster> {
	rand::seq::index::sample(rng, points.len(), k)
		.into_iter()
		.map(|i| {
			let center = points[i].clone();
			Cluster { members: vec![center.clone()], center }
		})
		.collect()
}

/// For each point, the index of its closest center
#[cfg(not(feature = "threads"))]
fn assignments(points: &[ColorVector], centers: &[ColorVector]) -> Result<Vec<usize>> {
	points.iter().map(|point| nearest(point, centers)).collect()
}

/// For each point, the index of its closest center
#[cfg(feature = "threads")]
fn assignments(points: &[ColorVector], centers: &[ColorVector]) -> Result<Vec<usize>> {
	use rayon::prelude::*;

	points.par_iter().map(|point| nearest(point, centers)).collect()
}

/// Split `points` into one group per cluster, each point going to its closest center
///
/// Equidistant centers are resolved in favor of the lowest index.
fn partition(points: &[ColorVector], clusters: &[Cluster]) -> Result<Vec<Vec<ColorVector>>> {
	let centers = clusters.iter().map(|cluster| cluster.center.clone()).collect::<Vec<_>>();

	let mut groups = vec![Vec::new(); clusters.len()];
	for (point, i) in points.iter().zip(assignments(points, &centers)?) {
		groups[i].push(point.clone());
	}

	Ok(groups)
}

/// Statistics from one recompute step
struct Round {
	/// Largest distance moved by any center
	max_shift: f64,
	/// Number of clusters whose group was empty
	empty: usize,
	/// Sum of squared distances between each grouped color and its new center
	variance: f64,
}

/// Replace each cluster with the centroid of its new group
///
/// A cluster with an empty group keeps its previous center and members, counts as not moving,
/// and adds nothing to the round's variance.
/// A NaN shift is kept as the maximum so it never passes the convergence test.
fn recompute(clusters: &mut [Cluster], groups: Vec<Vec<ColorVector>>) -> Result<Round> {
	let mut round = Round { max_shift: 0.0, empty: 0, variance: 0.0 };

	for (cluster, members) in clusters.iter_mut().zip(groups) {
		if members.is_empty() {
			round.empty += 1;
			continue;
		}

		let center = centroid(&members)?;
		let shift = distance(&cluster.center, &center)?;
		if shift.is_nan() || shift > round.max_shift {
			round.max_shift = shift;
		}
		round.variance += variance(&members, &center)?;
		*cluster = Cluster { center, members };
	}

	Ok(round)
}

/// Sum of squared distances between each member and `center`
fn variance(members: &[ColorVector], center: &ColorVector) -> Result<f64> {
	members.iter().map(|member| squared_distance(member, center)).sum()
}

/// Sort clusters by descending population, keeping the order of equally sized clusters
fn rank(mut clusters: Vec<Cluster>) -> Vec<Cluster> {
	clusters.sort_by_key(|cluster| Reverse(cluster.members.len()));
	clusters
}
