use crate::cli::{KernelFormat, ValueFormat};
use crate::intensity::load_intensity;
use crate::kernel::KernelStats;
use crate::matrix::{pad, write_kernel, write_real};
use crate::params::Params;
use anyhow::Context;
use anyhow::Result;
use log::info;
use ndarray::Array2;
use num_complex::Complex64;
use std::path::{Path, PathBuf};

pub fn run_kernel(
    params: &Option<PathBuf>,
    delta_z: &Option<f64>,
    output: &PathBuf,
    format: &KernelFormat,
    precision: &ValueFormat,
) -> Result<()> {
    let params = Params::resolve(params.as_deref(), *delta_z)?;
    prepare_kernel(output, &params, *format, *precision)?;

    Ok(())
}

pub fn run_pad(
    params: &Option<PathBuf>,
    image: &PathBuf,
    output: &PathBuf,
    precision: &ValueFormat,
) -> Result<()> {
    let params = Params::resolve(params.as_deref(), None)?;
    prepare_image(image, output, &params, *precision)?;

    Ok(())
}

pub fn run_prepare(
    params: &Option<PathBuf>,
    delta_z: &Option<f64>,
    image: &PathBuf,
    image_output: &PathBuf,
    kernel_output: &PathBuf,
    format: &KernelFormat,
) -> Result<()> {
    let params = Params::resolve(params.as_deref(), *delta_z)?;
    prepare_image(image, image_output, &params, ValueFormat::Integer)?;
    prepare_kernel(kernel_output, &params, *format, ValueFormat::Fixed)?;

    Ok(())
}

/// Load the configured channel of `image`, zero-pad it and write it as text.
pub fn prepare_image(
    image: &Path,
    output: &Path,
    params: &Params,
    precision: ValueFormat,
) -> Result<Array2<f64>> {
    let intensity = load_intensity(image, params.channel)?;
    let (rows, cols) = intensity.dim();
    info!("loaded {rows}x{cols} channel {} from {image:?}", params.channel);

    let padded = pad(&intensity, params.padded_rows, params.padded_cols, (0, 0))
        .with_context(|| format!("padding {image:?}"))?;
    write_real(output, &padded, precision)?;
    info!(
        "wrote {}x{} padded intensity to {output:?}",
        params.padded_rows, params.padded_cols
    );

    Ok(padded)
}

/// Build the kernel described by `params` and write it as text.
pub fn prepare_kernel(
    output: &Path,
    params: &Params,
    format: KernelFormat,
    precision: ValueFormat,
) -> Result<Array2<Complex64>> {
    let grid = params.grid()?;
    let kernel = params.pupil().build_kernel(&grid, params.delta_z);

    let stats = KernelStats::of(&kernel);
    info!(
        "built {n}x{n} kernel for delta_z {}: {} cells inside the aperture",
        params.delta_z,
        stats.inside,
        n = grid.size()
    );
    info!("kernel real part in [{}, {}]", stats.min_re, stats.max_re);
    if format == KernelFormat::Real {
        log::warn!(
            "writing the real part only, imaginary part in [{}, {}] is dropped",
            stats.min_im,
            stats.max_im
        );
    }

    for path in write_kernel(output, &kernel, format, precision)? {
        info!("wrote kernel to {path:?}");
    }

    Ok(kernel)
}
