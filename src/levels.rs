use crate::model::SCREEN_W;
use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Physics parameters for one level. Accelerations are per tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub gravity: f64,
    #[serde(rename = "thrust")]
    pub thrust_accel: f64,
    #[serde(rename = "fuel")]
    pub starting_fuel: i32,
    pub pad_width: f64,
    #[serde(rename = "fuel_rate")]
    pub fuel_burn_rate: i32,
    #[serde(rename = "wind", default)]
    pub wind_accel: f64,
}

impl LevelSpec {
    const fn new(
        gravity: f64,
        thrust_accel: f64,
        starting_fuel: i32,
        pad_width: f64,
        fuel_burn_rate: i32,
        wind_accel: f64,
    ) -> Self {
        Self {
            gravity,
            thrust_accel,
            starting_fuel,
            pad_width,
            fuel_burn_rate,
            wind_accel,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.gravity.is_finite() && self.gravity > 0.0,
            "gravity must be a positive number, got {}",
            self.gravity
        );
        ensure!(
            self.thrust_accel.is_finite() && self.thrust_accel > 0.0,
            "thrust must be a positive number, got {}",
            self.thrust_accel
        );
        ensure!(self.starting_fuel > 0, "fuel must be positive, got {}", self.starting_fuel);
        ensure!(
            self.pad_width.is_finite() && self.pad_width > 0.0 && self.pad_width < SCREEN_W,
            "pad_width must be in (0, {}), got {}",
            SCREEN_W,
            self.pad_width
        );
        ensure!(
            self.fuel_burn_rate > 0,
            "fuel_rate must be positive, got {}",
            self.fuel_burn_rate
        );
        ensure!(self.wind_accel.is_finite(), "wind must be finite, got {}", self.wind_accel);
        Ok(())
    }
}

const BUILTIN: [LevelSpec; 5] = [
    LevelSpec::new(0.03, 0.15, 1000, 150.0, 3, 0.0),
    LevelSpec::new(0.04, 0.14, 900, 130.0, 4, 0.01),
    LevelSpec::new(0.045, 0.13, 800, 110.0, 4, 0.02),
    LevelSpec::new(0.05, 0.12, 700, 90.0, 5, 0.03),
    LevelSpec::new(0.052, 0.115, 650, 80.0, 5, 0.035),
];

/// Ordered, non-empty list of validated levels.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelTable {
    levels: Vec<LevelSpec>,
}

impl LevelTable {
    pub fn builtin() -> Self {
        Self {
            levels: BUILTIN.to_vec(),
        }
    }

    pub fn new(levels: Vec<LevelSpec>) -> Result<Self> {
        if levels.is_empty() {
            bail!("level table is empty");
        }
        for (i, level) in levels.iter().enumerate() {
            level
                .validate()
                .with_context(|| format!("level {} is invalid", i + 1))?;
        }
        Ok(Self { levels })
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let levels: Vec<LevelSpec> =
            serde_json::from_str(s).context("level table is not a JSON array of levels")?;
        Self::new(levels)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("could not read level file {}", path.display()))?;
        Self::from_json(&s).with_context(|| format!("in level file {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.levels.len() - 1
    }

    /// Level at `index`, clamped to the last level.
    pub fn get(&self, index: usize) -> &LevelSpec {
        &self.levels[index.min(self.last_index())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelSpec> {
        self.levels.iter()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        let table = LevelTable::builtin();
        assert_eq!(table.len(), 5);
        assert_eq!(table.last_index(), 4);
        for level in table.iter() {
            level.validate().unwrap();
        }
        assert_eq!(table.get(0).wind_accel, 0.0);
        assert_eq!(table.get(4).pad_width, 80.0);
    }

    #[test]
    fn get_clamps_past_the_end() {
        let table = LevelTable::builtin();
        assert_eq!(table.get(99), table.get(4));
    }

    #[test]
    fn parses_json_with_original_keys() {
        let json = r#"[
            {"gravity": 0.02, "thrust": 0.2, "fuel": 500, "pad_width": 200, "fuel_rate": 2, "wind": -0.01},
            {"gravity": 0.06, "thrust": 0.1, "fuel": 300, "pad_width": 60, "fuel_rate": 6}
        ]"#;
        let table = LevelTable::from_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).thrust_accel, 0.2);
        assert_eq!(table.get(0).wind_accel, -0.01);
        assert_eq!(table.get(1).wind_accel, 0.0);
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(LevelTable::from_json("[]").is_err());
        assert!(LevelTable::from_json("{}").is_err());

        let wide_pad = r#"[{"gravity": 0.02, "thrust": 0.2, "fuel": 500, "pad_width": 800, "fuel_rate": 2}]"#;
        let err = LevelTable::from_json(wide_pad).unwrap_err();
        assert!(format!("{:#}", err).contains("pad_width"));

        let no_fuel = r#"[{"gravity": 0.02, "thrust": 0.2, "fuel": 0, "pad_width": 100, "fuel_rate": 2}]"#;
        assert!(LevelTable::from_json(no_fuel).is_err());
    }
}
