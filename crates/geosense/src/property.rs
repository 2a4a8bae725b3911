use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Rock/medium properties a forward model may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RockProperty {
    Density,
    LogSusceptibility,
    ThermalConductivity,
    ThermalProductivity,
    LogResistivity,
    ResistivityPhase,
    PWaveVelocity,
}

impl RockProperty {
    pub const COUNT: usize = 7;
    pub const ALL: [RockProperty; RockProperty::COUNT] = [
        RockProperty::Density,
        RockProperty::LogSusceptibility,
        RockProperty::ThermalConductivity,
        RockProperty::ThermalProductivity,
        RockProperty::LogResistivity,
        RockProperty::ResistivityPhase,
        RockProperty::PWaveVelocity,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Which properties the physics kernel has to compute, indexed by
/// [`RockProperty::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyMask {
    flags: [bool; RockProperty::COUNT],
}

impl PropertyMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, property: RockProperty) {
        self.flags[property.index()] = true;
    }

    pub fn enable_all(&mut self, properties: &BTreeSet<RockProperty>) {
        for property in properties {
            self.enable(*property);
        }
    }

    pub fn is_enabled(&self, property: RockProperty) -> bool {
        self.flags[property.index()]
    }

    pub fn flags(&self) -> [bool; RockProperty::COUNT] {
        self.flags
    }

    pub fn enabled(&self) -> BTreeSet<RockProperty> {
        RockProperty::ALL
            .into_iter()
            .filter(|property| self.is_enabled(*property))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        for (position, property) in RockProperty::ALL.iter().enumerate() {
            assert_eq!(property.index(), position);
        }
    }

    #[test]
    fn mask_tracks_enabled_properties() {
        let mut mask = PropertyMask::new();
        mask.enable(RockProperty::LogSusceptibility);
        mask.enable_all(&BTreeSet::from([RockProperty::Density, RockProperty::LogSusceptibility]));

        assert!(mask.is_enabled(RockProperty::Density));
        assert!(!mask.is_enabled(RockProperty::PWaveVelocity));
        assert_eq!(
            mask.enabled(),
            BTreeSet::from([RockProperty::Density, RockProperty::LogSusceptibility])
        );
        assert_eq!(mask.flags().iter().filter(|flag| **flag).count(), 2);
    }
}
