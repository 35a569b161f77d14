use std::fmt;

use serde::Deserialize;

use crate::error::LayoutError;

const DEFAULT_CABIN: &str = include_str!("../cabins/default.toml");

const fn i_one() -> i32 {
    1
}

const fn u_five() -> u32 {
    5
}

const fn u_fifty() -> u32 {
    50
}

const fn u_three() -> u32 {
    3
}

const fn f_gateway() -> f32 {
    1.5
}

const fn f_gate_offset() -> f32 {
    0.75
}

/// Declarative cabin definition.
#[derive(Debug, Clone, Deserialize)]
pub struct CabinConfig {
    /// Requested number of exits including the gate door.
    #[serde(default = "i_one")]
    pub exits: i32,
    #[serde(default = "u_five")]
    pub row_min: u32,
    #[serde(default = "u_fifty")]
    pub row_max: u32,
    #[serde(default = "u_three")]
    pub class_row_min: u32,
    /// Defaults to `row_max`.
    #[serde(default)]
    pub class_row_max: Option<u32>,
    /// Aisle and gate width in passenger diameters. Must be greater than one.
    #[serde(default = "f_gateway")]
    pub gateway_size: f32,
    /// Gate offset from the cockpit wall when there is no first class, in
    /// passenger diameters.
    #[serde(default = "f_gate_offset")]
    pub gate_offset: f32,
    pub classes: Vec<SeatClassConfig>,
}

impl CabinConfig {
    /// The cabin shipped with the simulator.
    pub fn default_cabin() -> Result<Self, LayoutError> {
        Self::from_toml(DEFAULT_CABIN)
    }

    pub fn from_toml(source: &str) -> Result<Self, LayoutError> {
        Ok(toml::from_str(source)?)
    }

    pub fn class_row_max(&self) -> u32 {
        self.class_row_max.unwrap_or(self.row_max)
    }

    /// Requested exits clamped into the supported range.
    pub fn exit_count(&self) -> usize {
        self.exits.clamp(1, 3) as usize
    }

    pub fn class(&self, kind: SeatClassKind) -> Option<&SeatClassConfig> {
        self.classes.iter().find(|c| c.kind == kind)
    }

    pub fn class_mut(&mut self, kind: SeatClassKind) -> Option<&mut SeatClassConfig> {
        self.classes.iter_mut().find(|c| c.kind == kind)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatClassConfig {
    pub kind: SeatClassKind,
    /// Seat letters left to right, aisles marked by whitespace.
    pub seat_layout: String,
    pub rows: u32,
    pub leg_room: f32,
    pub seat_depth: f32,
}

/// Cabin sections, ordered front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatClassKind {
    First,
    Business,
    PremiumEconomy,
    Economy,
}

impl fmt::Display for SeatClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeatClassKind::First => "first",
            SeatClassKind::Business => "business",
            SeatClassKind::PremiumEconomy => "premium economy",
            SeatClassKind::Economy => "economy",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cabin() {
        let cabin = CabinConfig::default_cabin().unwrap();

        assert_eq!(cabin.exit_count(), 1);
        assert_eq!(cabin.class_row_max(), 50);
        assert_eq!(cabin.classes.len(), 4);
        assert_eq!(cabin.class(SeatClassKind::Economy).unwrap().rows, 20);
        assert_eq!(
            cabin.class(SeatClassKind::PremiumEconomy).unwrap().seat_layout,
            "AB CD EF"
        );
    }

    #[test]
    fn test_defaults_and_clamp() {
        let cabin = CabinConfig::from_toml(
            r#"
            exits = 7

            [[classes]]
            kind = "economy"
            seat_layout = "ABC DEF"
            rows = 20
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        )
        .unwrap();

        assert_eq!(cabin.exit_count(), 3);
        assert_eq!(cabin.row_min, 5);
        assert_eq!(cabin.class_row_min, 3);
        assert_eq!(cabin.gateway_size, 1.5);
        assert!(cabin.class(SeatClassKind::First).is_none());
    }

    #[test]
    fn test_invalid_document() {
        let err = CabinConfig::from_toml("classes = 3").unwrap_err();
        assert!(matches!(err, LayoutError::Parse(_)));
    }
}
