use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum Commands {
    /// Compute the complex blur kernel of the pupil model.
    Kernel {
        /// Optional path to TOML formatted Params.
        ///
        /// If not provided, the default Params is used.
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Layer separation, overrides the value from Params.
        #[arg(short, long, allow_negative_numbers = true)]
        delta_z: Option<f64>,

        /// File path for the kernel matrix.
        #[arg(short, long)]
        output: PathBuf,

        /// How the complex values are laid out in the output.
        #[arg(short, long, value_enum, default_value_t = KernelFormat::Real)]
        format: KernelFormat,

        /// Number formatting of each value.
        #[arg(long, value_enum, default_value_t = ValueFormat::Fixed)]
        precision: ValueFormat,
    },

    /// Zero-pad one channel of an image into a larger intensity matrix.
    Pad {
        /// Optional path to TOML formatted Params.
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Path to the input image.
        #[arg(short, long)]
        image: PathBuf,

        /// File path for the padded matrix.
        #[arg(short, long)]
        output: PathBuf,

        /// Number formatting of each value.
        #[arg(long, value_enum, default_value_t = ValueFormat::Integer)]
        precision: ValueFormat,
    },

    /// Write both the padded image and the kernel.
    Prepare {
        /// Optional path to TOML formatted Params.
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Layer separation, overrides the value from Params.
        #[arg(short, long, allow_negative_numbers = true)]
        delta_z: Option<f64>,

        /// Path to the input image.
        #[arg(short, long)]
        image: PathBuf,

        /// File path for the padded matrix.
        #[arg(long)]
        image_output: PathBuf,

        /// File path for the kernel matrix.
        #[arg(long)]
        kernel_output: PathBuf,

        /// How the complex kernel values are laid out in the output.
        #[arg(short, long, value_enum, default_value_t = KernelFormat::Real)]
        format: KernelFormat,
    },
}

/// Layout of a complex matrix in text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
#[non_exhaustive]
pub enum KernelFormat {
    /// Real part only, one value per cell.
    Real,
    /// `re im` pairs, two values per cell.
    Interleaved,
    /// Real and imaginary parts in two sibling files.
    Split,
}

/// Text rendering of a single value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
#[non_exhaustive]
pub enum ValueFormat {
    /// Truncated toward zero, like `%i`.
    Integer,
    /// Six decimals, like `%f`.
    Fixed,
    /// Eighteen digit mantissa with a signed two digit exponent, like `%.18e`.
    Scientific,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone()
    }
}
