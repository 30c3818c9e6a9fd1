use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use defocus_cli::cli::Cli;
use defocus_cli::cli::Commands;
use defocus_cli::prepare;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match &cli.command() {
        Commands::Kernel {
            params,
            delta_z,
            output,
            format,
            precision,
        } => prepare::run_kernel(params, delta_z, output, format, precision),
        Commands::Pad {
            params,
            image,
            output,
            precision,
        } => prepare::run_pad(params, image, output, precision),
        Commands::Prepare {
            params,
            delta_z,
            image,
            image_output,
            kernel_output,
            format,
        } => prepare::run_prepare(params, delta_z, image, image_output, kernel_output, format),
        _ => bail!("this command has not been implemented!"),
    }
}
