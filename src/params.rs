use crate::error::Result;
use crate::kernel::{
    APERTURE_RADIUS, DEFAULT_DELTA_Z, GRID_SIZE, KernelGrid, MULTI_LAYER_COEFF, Pupil,
    SINGLE_LAYER_COEFF,
};
use anyhow::Context;
use std::{io::Read, path::Path};

/// Model and padding parameters, read from TOML.
///
/// Missing fields keep their defaults, which give the standard
/// 512x512 kernel at a layer separation of 20 pi and a 1024x1024 padding.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    pub delta_z: f64,
    pub grid_size: usize,
    pub aperture_radius: f64,
    pub single_layer_coeff: f64,
    pub multi_layer_coeff: f64,
    pub padded_rows: usize,
    pub padded_cols: usize,
    /// RGBA channel taken from the source image.
    pub channel: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            delta_z: DEFAULT_DELTA_Z,
            grid_size: GRID_SIZE,
            aperture_radius: APERTURE_RADIUS,
            single_layer_coeff: SINGLE_LAYER_COEFF,
            multi_layer_coeff: MULTI_LAYER_COEFF,
            padded_rows: 2 * GRID_SIZE,
            padded_cols: 2 * GRID_SIZE,
            channel: 0,
        }
    }
}

impl Params {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut buffer = String::new();
        std::fs::File::open(path)
            .with_context(|| format!("opening params {path:?}"))?
            .read_to_string(&mut buffer)?;
        let params =
            toml::from_str(&buffer).with_context(|| format!("parsing params {path:?}"))?;

        Ok(params)
    }

    /// Defaults unless a path is given, with an optional layer separation on top.
    pub fn resolve(path: Option<&Path>, delta_z: Option<f64>) -> anyhow::Result<Self> {
        let mut params = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(delta_z) = delta_z {
            params.delta_z = delta_z;
        }

        Ok(params)
    }

    pub fn pupil(&self) -> Pupil {
        Pupil::new(
            self.aperture_radius,
            self.single_layer_coeff,
            self.multi_layer_coeff,
        )
    }

    pub fn grid(&self) -> Result<KernelGrid> {
        KernelGrid::new(self.grid_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_constants() {
        let params = Params::default();
        assert_eq!(params.grid_size, 512);
        assert_eq!(params.padded_rows, 1024);
        assert_eq!(params.padded_cols, 1024);
        assert_eq!(params.pupil(), Pupil::default());
        assert_eq!(params.grid().unwrap(), KernelGrid::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let params: Params = toml::from_str("delta_z = 1.5\ngrid_size = 64\n").unwrap();
        assert_eq!(params.delta_z, 1.5);
        assert_eq!(params.grid_size, 64);
        assert_eq!(params.aperture_radius, APERTURE_RADIUS);
        assert_eq!(params.channel, 0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<Params>("delta = 1.0\n").is_err());
    }

    #[test]
    fn resolve_overrides_delta_z() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.toml");
        std::fs::write(&path, "delta_z = 3.0\nchannel = 2\n").unwrap();

        let from_file = Params::resolve(Some(path.as_path()), None).unwrap();
        assert_eq!(from_file.delta_z, 3.0);
        assert_eq!(from_file.channel, 2);

        let overridden = Params::resolve(Some(path.as_path()), Some(-4.0)).unwrap();
        assert_eq!(overridden.delta_z, -4.0);
        assert_eq!(overridden.channel, 2);

        assert_eq!(Params::resolve(None, None).unwrap(), Params::default());
    }

    #[test]
    fn missing_params_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Params::resolve(Some(path.as_path()), None).is_err());
    }

    #[test]
    fn degenerate_grid_is_reported() {
        let params = Params {
            grid_size: 1,
            ..Params::default()
        };
        assert!(params.grid().is_err());
    }
}
