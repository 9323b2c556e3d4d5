//! Find the representative colors of an image with k-means clustering, and recolor images with them.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal
)]

mod cli;

#[allow(clippy::wildcard_imports)]
use cli::*;

use std::{path::Path, process::ExitCode, time::Instant};

use clap::Parser;
use colored::Colorize;
use image::{DynamicImage, GenericImageView, RgbImage};
use palette::Srgb;
use repcolors::{ChannelMode, ColorCounts, ColorVector, Kmeans, Palette, Region};
use thiserror::Error;
use tracing::{info, Level};

/// Record the running time of a function and log the elapsed time
macro_rules! time {
    ($name: literal, $func_call: expr) => {{
        let start = Instant::now();
        let result = $func_call;
        info!("{} took {}ms", $name, start.elapsed().as_millis());
        result
    }};
}

/// Error cases for the CLI
#[derive(Debug, Error)]
enum CliError {
    /// Failed to read or decode the image file
    #[error("Failed to load the image file: {0}")]
    ImageLoad(image::ImageError),
    /// Failed to encode or write the recolored image
    #[error("Failed to save the recolored image: {0}")]
    ImageSave(image::ImageError),
    /// Clustering or recoloring failed
    #[error("Failed to generate the palette: {0}")]
    Palette(#[from] repcolors::Error),
    /// The thread pool could not be created
    #[cfg(feature = "threads")]
    #[error("Failed to start the thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn main() -> ExitCode {
    let options = Options::parse();

    tracing_subscriber::fmt()
        .with_max_level(if options.verbose {
            Level::INFO
        } else {
            Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let result = run_generate_and_print_palette(&options);

    // Returning Result<_> uses Debug printing instead of Display
    if let Err(e) = result {
        eprintln!("{e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Builds a thread pool and then runs `generate_and_print_palette`
#[cfg(feature = "threads")]
fn run_generate_and_print_palette(options: &Options) -> Result<(), CliError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(usize::from(options.threads))
        .build()?;

    pool.install(|| generate_and_print_palette(options))
}

/// Runs `generate_and_print_palette` on a single thread
#[cfg(not(feature = "threads"))]
fn run_generate_and_print_palette(options: &Options) -> Result<(), CliError> {
    generate_and_print_palette(options)
}

/// Load an image, generate its palette, print the result, and optionally save a recolored copy
fn generate_and_print_palette(options: &Options) -> Result<(), CliError> {
    // Input
    let img = time!("Image loading", load_image(&options.image))?;
    let img = generate_thumbnail(img, options.max_pixels);

    let mode = if options.grayscale {
        ChannelMode::Grayscale
    } else {
        ChannelMode::Rgb
    };

    let counts = time!("Preprocessing", ColorCounts::from_image(&img, mode));
    info!(
        "Reduced {} pixels to {} unique colors",
        counts.total(),
        counts.num_colors()
    );

    // Processing
    let palette = time!(
        "k-means",
        kmeans(options).fit_trials(&counts.color_vectors(), options.trials)
    )?;

    info!(
        "k-means took {} iterations with a final variance of {}",
        palette.iterations(),
        palette.variance()
    );

    // Output
    print_palette(&palette_colors(&palette, options.reverse), options);

    if let Some(path) = &options.recolor {
        let rgb = match mode {
            ChannelMode::Rgb => img.into_rgb8(),
            ChannelMode::Grayscale => img.grayscale().into_rgb8(),
        };
        let recolored = time!(
            "Recoloring",
            repcolors::recolor_region(&rgb, region(&rgb, options.region), &palette.classifier())
        )?;
        save_image(&recolored, path)?;
        info!("Saved the recolored image to {}", path.display());
    }

    Ok(())
}

/// Load the image at the given path
fn load_image(path: &Path) -> Result<DynamicImage, CliError> {
    image::open(path).map_err(CliError::ImageLoad)
}

/// Save an image to the given path, choosing the format from its extension
fn save_image(image: &RgbImage, path: &Path) -> Result<(), CliError> {
    image.save(path).map_err(CliError::ImageSave)
}

/// Create a thumbnail with at most `max_pixels` pixels if the image has more than `max_pixels` pixels
fn generate_thumbnail(image: DynamicImage, max_pixels: u32) -> DynamicImage {
    // The number of pixels should be < u64::MAX, since image dimensions are (u32, u32)
    let (width, height) = image.dimensions();
    let pixels = u64::from(width) * u64::from(height);
    if pixels <= u64::from(max_pixels) {
        info!("Skipping image thumbnail since pixels was below max pixels");
        image
    } else {
        // (u64 as f64) only gives innaccurate results for very large u64
        // I.e, only when pixels is in the order of quintillions
        #[allow(clippy::cast_precision_loss)]
        let scale = (f64::from(max_pixels) / pixels as f64).sqrt();

        // multiplying by a positive factor < 1
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (thumb_width, thumb_height) = (
            (f64::from(width) * scale) as u32,
            (f64::from(height) * scale) as u32,
        );

        info!("Creating a thumbnail with dimensions {thumb_width}x{thumb_height}");

        time!("Image thumbnail", image.thumbnail(thumb_width, thumb_height))
    }
}

/// Build the k-means parameters from the options
fn kmeans(options: &Options) -> Kmeans {
    let kmeans = Kmeans::new(options.k)
        .with_convergence_threshold(options.convergence_threshold)
        .with_max_iter(options.iteration_limit());

    match options.seed {
        Some(seed) => kmeans.with_seed(seed),
        None => kmeans,
    }
}

/// The [`Region`] of the image to recolor
fn region(image: &RgbImage, region: RecolorRegion) -> Region {
    let (width, height) = image.dimensions();
    match region {
        RecolorRegion::Full => Region::full(width, height),
        RecolorRegion::Left => Region::left_half(width, height),
        RecolorRegion::Right => Region::right_half(width, height),
    }
}

/// The palette's colors as [`Srgb`], most common first unless `reverse` is set
fn palette_colors(palette: &Palette, reverse: bool) -> Vec<Srgb<u8>> {
    let mut colors = palette
        .colors()
        .iter()
        .filter_map(ColorVector::to_srgb)
        .collect::<Vec<_>>();

    if reverse {
        colors.reverse();
    }

    colors
}

/// Print the given colors based off the provided options
fn print_palette(colors: &[Srgb<u8>], options: &Options) {
    match options.output {
        FormatOutput::Hex => color_format_print(colors, options, " ", |color| format!("#{color:X}")),

        FormatOutput::Rgb => color_format_print(colors, options, " ", |color| {
            format!("({},{},{})", color.red, color.green, color.blue)
        }),

        FormatOutput::Swatch => print_colors(colors, "", |color| {
            "   "
                .on_truecolor(color.red, color.green, color.blue)
                .to_string()
        }),
    }
}

/// Print a line of colors using the given format
fn print_colors(colors: &[Srgb<u8>], delimiter: &str, format: impl Fn(Srgb<u8>) -> String) {
    println!(
        "{}",
        colors
            .iter()
            .map(|&color| format(color))
            .collect::<Vec<_>>()
            .join(delimiter)
    );
}

/// Format, colorize, and then print the text for all colors
fn color_format_print(
    colors: &[Srgb<u8>],
    options: &Options,
    delimiter: &str,
    format: impl Fn(Srgb<u8>) -> String,
) {
    match options.colorize {
        Some(ColorizeOutput::Fg) => print_colors(colors, delimiter, |color| {
            format(color)
                .truecolor(color.red, color.green, color.blue)
                .to_string()
        }),

        Some(ColorizeOutput::Bg) => print_colors(colors, delimiter, |color| {
            format(color)
                .on_truecolor(color.red, color.green, color.blue)
                .to_string()
        }),

        None => print_colors(colors, delimiter, format),
    }
}
