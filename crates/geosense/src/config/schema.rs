use std::collections::BTreeMap;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Path,
    UInt,
    Real,
    UIntVec3,
    RealVec3,
    RealPair,
}

impl OptionKind {
    pub fn label(&self) -> &'static str {
        match self {
            OptionKind::Bool => "boolean",
            OptionKind::Path => "path",
            OptionKind::UInt => "non-negative integer",
            OptionKind::Real => "real",
            OptionKind::UIntVec3 => "3 non-negative integers",
            OptionKind::RealVec3 => "3 reals",
            OptionKind::RealPair => "2 reals",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub kind: OptionKind,
    pub description: &'static str,
}

pub fn option_key(heading: &str, name: &str) -> String {
    format!("{heading}.{name}")
}

/// Every recognised `<heading>.<name>` option, composed from each sensor's
/// declarations. Built once and handed to parse calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSchema {
    options: BTreeMap<String, OptionSpec>,
}

impl ConfigSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-declaring an identical option is a no-op so shared sections can
    /// be declared by more than one owner.
    pub fn declare(
        &mut self,
        heading: &str,
        name: &str,
        kind: OptionKind,
        description: &'static str,
    ) -> Result<(), ConfigError> {
        let key = option_key(heading, name);
        match self.options.get(&key) {
            Some(existing) if existing.kind != kind => {
                Err(ConfigError::ConflictingOption { key })
            }
            Some(_) => Ok(()),
            None => {
                self.options.insert(key, OptionSpec { kind, description });
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&OptionSpec> {
        self.options.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.options.iter().map(|(key, spec)| (key.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// One `key (kind): description` line per option, for `--help` style output.
    pub fn describe(&self) -> String {
        self.iter()
            .map(|(key, spec)| format!("{key} ({}): {}", spec.kind.label(), spec.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
