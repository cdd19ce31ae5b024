use config::{Config, Environment, File, FileFormat, FileSourceString};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::bbox::GeoBox;
use crate::errors::{Error, Result};

const DEV_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../../config");
const SYSTEM_CONFIG_PATH: &str = "/etc/geo-shapes/";

const BOX_FILE: &str = "box.toml";
const BOX_KEY: &str = "box";
const ENV_PREFIX: &str = "GEOBOX";
const CORNER_KEYS: [&str; 2] = ["box.lower_left", "box.upper_right"];

/// `/etc/geo-shapes/` when it exists, the repository `config/` otherwise.
pub fn config_dir() -> PathBuf {
    let config_dir = PathBuf::from(SYSTEM_CONFIG_PATH);
    if config_dir.exists() {
        config_dir
    } else {
        PathBuf::from(DEV_CONFIG_PATH)
    }
}

/// A box read from configuration, usually the default search area.
///
/// ```toml
/// [box]
/// lower_left = [0.0, 0.0]
/// upper_right = [10.0, 5.0]
/// ```
///
/// Layers, last one wins: `box.toml` in the config directory, environment
/// variables holding comma separated corners (`GEOBOX__BOX__LOWER_LEFT=1.0,2.0`),
/// then `key=value` overrides relative to the `[box]` table
/// (`lower_left=[1.0, 2.0]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoxSettings {
    pub lower_left: Vec<f64>,
    pub upper_right: Vec<f64>,
}

impl BoxSettings {
    pub fn load(overrides: &[String]) -> Result<Self> {
        Self::load_from(&config_dir(), overrides)
    }

    pub fn load_from(dir: &Path, overrides: &[String]) -> Result<Self> {
        let overrides = overrides
            .iter()
            .map(|value| corner_override(value))
            .collect::<Result<Vec<_>>>()?;

        let path = dir.join(BOX_FILE);
        debug!(
            "loading box settings from {:?} with {} override(s)",
            path,
            overrides.len()
        );

        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(corner_environment())
            .add_source(overrides)
            .build()?;

        Ok(config.get::<BoxSettings>(BOX_KEY)?)
    }
}

fn corner_environment() -> Environment {
    let environment = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",");

    CORNER_KEYS
        .iter()
        .fold(environment, |environment, key| environment.with_list_parse_key(key))
}

fn corner_override(value: &str) -> Result<File<FileSourceString, FileFormat>> {
    if !value.contains('=') {
        return Err(Error::MalformedOverride(value.to_string()));
    }
    Ok(File::from_str(&format!("{BOX_KEY}.{value}"), FileFormat::Toml))
}

impl TryFrom<BoxSettings> for GeoBox {
    type Error = Error;

    fn try_from(settings: BoxSettings) -> Result<Self> {
        GeoBox::from_coordinates(&settings.lower_left, &settings.upper_right)
    }
}

impl From<GeoBox> for BoxSettings {
    fn from(bbox: GeoBox) -> Self {
        BoxSettings {
            lower_left: bbox.lower_left().as_list(),
            upper_right: bbox.upper_right().as_list(),
        }
    }
}

/// Loads the configured box, see [`BoxSettings`] for the sources.
pub fn load_box(overrides: &[String]) -> Result<GeoBox> {
    let settings = BoxSettings::load(overrides)?;
    GeoBox::try_from(settings)
}

#[cfg(test)]
mod tests {
    use speculoos::assert_that;

    use super::*;
    use crate::point::Point;

    #[test]
    fn should_load_the_default_box() -> anyhow::Result<()> {
        let bbox = load_box(&[])?;
        assert_that!(bbox)
            .is_equal_to(GeoBox::new(Point::new(0.0, 0.0), Point::new(10.0, 5.0)));
        Ok(())
    }

    #[test]
    fn should_apply_overrides_on_top_of_the_file() -> anyhow::Result<()> {
        let overrides = vec![String::from("lower_left=[ -1.5, 2.0 ]")];
        let bbox = load_box(&overrides)?;
        assert_that!(bbox.lower_left()).is_equal_to(Point::new(-1.5, 2.0));
        assert_that!(bbox.upper_right()).is_equal_to(Point::new(10.0, 5.0));
        Ok(())
    }

    #[test]
    fn should_let_the_last_override_win() -> anyhow::Result<()> {
        let overrides = vec![
            String::from("upper_right=[ 1.0, 1.0 ]"),
            String::from("upper_right=[ 20.0, 30.0 ]"),
        ];
        let settings = BoxSettings::load(&overrides)?;
        assert_that!(settings.upper_right).is_equal_to(vec![20.0, 30.0]);
        Ok(())
    }

    #[test]
    fn should_reject_a_configured_corner_of_wrong_size() {
        let overrides = vec![String::from("upper_right=[ 1.0, 2.0, 3.0 ]")];
        let result = load_box(&overrides);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn should_report_malformed_overrides() {
        let overrides = vec![String::from("lower_left")];
        let result = load_box(&overrides);
        assert!(matches!(result, Err(Error::MalformedOverride(value)) if value == "lower_left"));
    }

    #[test]
    fn should_fail_without_a_box_file() {
        let missing = config_dir().join("no-such-directory");
        let result = BoxSettings::load_from(&missing, &[]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn should_turn_a_box_back_into_settings() -> anyhow::Result<()> {
        let bbox = GeoBox::new(Point::new(4.0, 5.0), Point::new(6.0, 7.0));
        let settings = BoxSettings::from(bbox);
        assert_that!(settings.lower_left).is_equal_to(vec![4.0, 5.0]);
        assert_that!(GeoBox::try_from(settings)?).is_equal_to(bbox);
        Ok(())
    }
}
