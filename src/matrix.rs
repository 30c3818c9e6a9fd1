//! Zero padding and plain-text matrices.
//!
//! Text matrices hold one row per line with values separated by a single
//! space, the layout produced by numpy's `savetxt`.

use crate::cli::{KernelFormat, ValueFormat};
use crate::error::{Error, Result};
use ndarray::{Array2, s};
use num_complex::Complex64;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Copy `source` into a zeroed `rows x cols` matrix with its top-left corner at `offset`.
pub fn pad(
    source: &Array2<f64>,
    rows: usize,
    cols: usize,
    offset: (usize, usize),
) -> Result<Array2<f64>> {
    let (src_rows, src_cols) = source.dim();
    let (row, col) = offset;
    if row + src_rows > rows || col + src_cols > cols {
        return Err(Error::DoesNotFit {
            src_rows,
            src_cols,
            rows,
            cols,
            offset,
        });
    }

    let mut padded = Array2::zeros((rows, cols));
    padded
        .slice_mut(s![row..row + src_rows, col..col + src_cols])
        .assign(source);

    Ok(padded)
}

impl ValueFormat {
    pub fn write<W: Write>(&self, writer: &mut W, value: f64) -> io::Result<()> {
        match self {
            ValueFormat::Integer => write!(writer, "{}", value.trunc() as i64),
            ValueFormat::Fixed => write!(writer, "{value:.6}"),
            ValueFormat::Scientific => {
                // Rust prints `1.5e0`, the consumers expect `1.5e+00`.
                let rendered = format!("{value:.18e}");
                match rendered.split_once('e') {
                    Some((mantissa, exponent)) => {
                        let exponent: i32 = exponent.parse().unwrap_or(0);
                        let sign = if exponent < 0 { '-' } else { '+' };
                        write!(writer, "{mantissa}e{sign}{:02}", exponent.abs())
                    }
                    // inf and NaN carry no exponent
                    None => write!(writer, "{rendered}"),
                }
            }
        }
    }
}

fn write_rows<W, T, F>(writer: &mut W, matrix: &Array2<T>, mut cell: F) -> io::Result<()>
where
    W: Write,
    F: FnMut(&mut W, &T) -> io::Result<()>,
{
    for row in matrix.rows() {
        for (col, value) in row.iter().enumerate() {
            if col > 0 {
                write!(writer, " ")?;
            }
            cell(writer, value)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

pub fn write_real_to<W: Write>(
    writer: &mut W,
    matrix: &Array2<f64>,
    format: ValueFormat,
) -> io::Result<()> {
    write_rows(writer, matrix, |w, &value| format.write(w, value))
}

/// Writes `re im` for every cell so each line holds twice as many values as columns.
pub fn write_interleaved_to<W: Write>(
    writer: &mut W,
    matrix: &Array2<Complex64>,
    format: ValueFormat,
) -> io::Result<()> {
    write_rows(writer, matrix, |w, value| {
        format.write(w, value.re)?;
        write!(w, " ")?;
        format.write(w, value.im)
    })
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn finish(path: &Path, result: io::Result<()>) -> Result<()> {
    result.map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_real(path: &Path, matrix: &Array2<f64>, format: ValueFormat) -> Result<()> {
    let mut output_file = create(path)?;
    finish(
        path,
        write_real_to(&mut output_file, matrix, format).and_then(|_| output_file.flush()),
    )
}

/// Write a complex matrix, returning every file that was created.
pub fn write_kernel(
    path: &Path,
    kernel: &Array2<Complex64>,
    layout: KernelFormat,
    format: ValueFormat,
) -> Result<Vec<PathBuf>> {
    match layout {
        KernelFormat::Real => {
            write_real(path, &kernel.mapv(|value| value.re), format)?;
            Ok(vec![path.to_path_buf()])
        }
        KernelFormat::Interleaved => {
            let mut output_file = create(path)?;
            finish(
                path,
                write_interleaved_to(&mut output_file, kernel, format)
                    .and_then(|_| output_file.flush()),
            )?;
            Ok(vec![path.to_path_buf()])
        }
        KernelFormat::Split => {
            let (re_path, im_path) = split_paths(path);
            write_real(&re_path, &kernel.mapv(|value| value.re), format)?;
            write_real(&im_path, &kernel.mapv(|value| value.im), format)?;
            Ok(vec![re_path, im_path])
        }
    }
}

/// `h.txt` becomes `h_re.txt` and `h_im.txt`.
pub fn split_paths(path: &Path) -> (PathBuf, PathBuf) {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().into_owned());

    let name = |part: &str| match &extension {
        Some(extension) => format!("{stem}_{part}.{extension}"),
        None => format!("{stem}_{part}"),
    };

    (path.with_file_name(name("re")), path.with_file_name(name("im")))
}

/// Parse a whitespace separated text matrix.
///
/// Blank lines are skipped. Every remaining line must hold the same number
/// of values.
pub fn read_real(path: &Path) -> Result<Array2<f64>> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |line: usize, reason: String| Error::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut values = Vec::new();
    let mut cols = None;
    let mut rows = 0;
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let start = values.len();
        for token in line.split_whitespace() {
            let value: f64 = token
                .parse()
                .map_err(|_| parse_error(line_number, format!("{token:?} is not a number")))?;
            values.push(value);
        }

        let width = values.len() - start;
        if width == 0 {
            continue;
        }
        match cols {
            None => cols = Some(width),
            Some(cols) if cols != width => {
                return Err(parse_error(
                    line_number,
                    format!("expected {cols} values, found {width}"),
                ));
            }
            Some(_) => {}
        }
        rows += 1;
    }

    Ok(Array2::from_shape_vec((rows, cols.unwrap_or(0)), values)
        .expect("every row has the same width"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::TempDir;

    fn render(matrix: &Array2<f64>, format: ValueFormat) -> String {
        let mut buffer = Vec::new();
        write_real_to(&mut buffer, matrix, format).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn pads_into_top_left() {
        let source = Array2::ones((4, 4));
        let padded = pad(&source, 8, 8, (0, 0)).unwrap();

        assert_eq!(padded.dim(), (8, 8));
        for ((row, col), &value) in padded.indexed_iter() {
            let expected = if row < 4 && col < 4 { 1. } else { 0. };
            assert_eq!(value, expected, "cell ({row}, {col})");
        }
    }

    #[test]
    fn pads_at_offset() {
        let source = array![[1., 2.], [3., 4.]];
        let padded = pad(&source, 4, 5, (2, 3)).unwrap();

        assert_eq!(padded[[2, 3]], 1.);
        assert_eq!(padded[[3, 4]], 4.);
        assert_eq!(padded.sum(), 10.);
    }

    #[test]
    fn rejects_source_larger_than_target() {
        let source = Array2::ones((5, 3));
        assert!(matches!(
            pad(&source, 4, 4, (0, 0)),
            Err(Error::DoesNotFit { src_rows: 5, .. })
        ));
        assert!(pad(&Array2::ones((2, 2)), 4, 4, (3, 0)).is_err());
        assert!(pad(&Array2::ones((2, 2)), 4, 4, (2, 2)).is_ok());
    }

    #[test]
    fn integer_values_truncate() {
        let matrix = array![[1.9, -2.5], [0., 255.]];
        assert_eq!(render(&matrix, ValueFormat::Integer), "1 -2\n0 255\n");
    }

    #[test]
    fn fixed_values_have_six_decimals() {
        let matrix = array![[1., -0.25, 0.1234567]];
        assert_eq!(
            render(&matrix, ValueFormat::Fixed),
            "1.000000 -0.250000 0.123457\n"
        );
    }

    #[test]
    fn scientific_values_use_signed_exponents() {
        let matrix = array![[1., -0.25, 12345.]];
        assert_eq!(
            render(&matrix, ValueFormat::Scientific),
            "1.000000000000000000e+00 -2.500000000000000000e-01 1.234500000000000000e+04\n"
        );
    }

    #[test]
    fn interleaves_complex_values() {
        let kernel = array![
            [Complex64::new(1., 0.), Complex64::new(0., -1.)],
            [Complex64::new(0., 0.), Complex64::new(0.5, 0.5)]
        ];
        let mut buffer = Vec::new();
        write_interleaved_to(&mut buffer, &kernel, ValueFormat::Fixed).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "1.000000 0.000000 0.000000 -1.000000\n\
             0.000000 0.000000 0.500000 0.500000\n"
        );
    }

    #[test]
    fn split_paths_keep_extension() {
        let (re, im) = split_paths(Path::new("out/h_func.txt"));
        assert_eq!(re, PathBuf::from("out/h_func_re.txt"));
        assert_eq!(im, PathBuf::from("out/h_func_im.txt"));

        let (re, _) = split_paths(Path::new("kernel"));
        assert_eq!(re, PathBuf::from("kernel_re"));
    }

    #[test]
    fn split_kernel_preserves_both_parts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("h.txt");
        let kernel = array![
            [Complex64::new(0.25, -0.75), Complex64::new(0., 0.)],
            [Complex64::new(-1., 0.), Complex64::new(0.5, 0.125)]
        ];

        let written = write_kernel(&path, &kernel, KernelFormat::Split, ValueFormat::Scientific)
            .unwrap();
        assert_eq!(written.len(), 2);
        assert!(!path.exists());

        let re = read_real(&written[0]).unwrap();
        let im = read_real(&written[1]).unwrap();
        assert_eq!(re, kernel.mapv(|value| value.re));
        assert_eq!(im, kernel.mapv(|value| value.im));
    }

    #[test]
    fn real_kernel_drops_imaginary_part() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("h.txt");
        let kernel = array![[Complex64::new(0.5, 0.5), Complex64::new(-1., 0.)]];

        write_kernel(&path, &kernel, KernelFormat::Real, ValueFormat::Fixed).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "0.500000 -1.000000\n"
        );
    }

    #[test]
    fn reads_back_padded_matrix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("src.txt");
        let padded = pad(&array![[3., 7.], [250., 0.]], 3, 4, (0, 0)).unwrap();

        write_real(&path, &padded, ValueFormat::Integer).unwrap();
        assert_eq!(read_real(&path).unwrap(), padded);
    }

    #[test]
    fn read_rejects_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ragged.txt");
        std::fs::write(&path, "1 2 3\n4 5\n").unwrap();

        assert!(matches!(
            read_real(&path),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn read_rejects_non_numbers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "\n1 x\n").unwrap();

        assert!(matches!(
            read_real(&path),
            Err(Error::Parse { line: 2, .. })
        ));
    }
}
