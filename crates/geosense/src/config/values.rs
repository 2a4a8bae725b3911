use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::schema::{option_key, ConfigSchema, OptionKind};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Path(String),
    UInt(u32),
    Real(f64),
    UIntVec3([u32; 3]),
    RealVec3([f64; 3]),
    RealPair([f64; 2]),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::Path(_) => OptionKind::Path,
            OptionValue::UInt(_) => OptionKind::UInt,
            OptionValue::Real(_) => OptionKind::Real,
            OptionValue::UIntVec3(_) => OptionKind::UIntVec3,
            OptionValue::RealVec3(_) => OptionKind::RealVec3,
            OptionValue::RealPair(_) => OptionKind::RealPair,
        }
    }

    /// Vectors are accepted either as TOML arrays or as a single string of
    /// whitespace/comma separated components (`"10 10 10"`).
    pub fn from_toml(kind: OptionKind, value: &toml::Value) -> Result<Self, String> {
        match kind {
            OptionKind::Bool => bool_value(value).map(OptionValue::Bool),
            OptionKind::Path => match value {
                toml::Value::String(path) if !path.trim().is_empty() => {
                    Ok(OptionValue::Path(path.trim().to_string()))
                }
                toml::Value::String(_) => Err("path is empty".to_string()),
                other => Err(format!("expected path string, found {}", other.type_str())),
            },
            OptionKind::UInt => uint_value(value).map(OptionValue::UInt),
            OptionKind::Real => real_value(value).map(OptionValue::Real),
            OptionKind::UIntVec3 => fixed_components(value, uint_value).map(OptionValue::UIntVec3),
            OptionKind::RealVec3 => fixed_components(value, real_value).map(OptionValue::RealVec3),
            OptionKind::RealPair => fixed_components(value, real_value).map(OptionValue::RealPair),
        }
    }

    pub fn to_toml(&self) -> toml::Value {
        match self {
            OptionValue::Bool(value) => toml::Value::Boolean(*value),
            OptionValue::Path(value) => toml::Value::String(value.clone()),
            OptionValue::UInt(value) => toml::Value::Integer(i64::from(*value)),
            OptionValue::Real(value) => toml::Value::Float(*value),
            OptionValue::UIntVec3(values) => toml::Value::Array(
                values
                    .iter()
                    .map(|value| toml::Value::Integer(i64::from(*value)))
                    .collect(),
            ),
            OptionValue::RealVec3(values) => {
                toml::Value::Array(values.iter().map(|value| toml::Value::Float(*value)).collect())
            }
            OptionValue::RealPair(values) => {
                toml::Value::Array(values.iter().map(|value| toml::Value::Float(*value)).collect())
            }
        }
    }
}

fn bool_value(value: &toml::Value) -> Result<bool, String> {
    match value {
        toml::Value::Boolean(value) => Ok(*value),
        toml::Value::Integer(0) => Ok(false),
        toml::Value::Integer(1) => Ok(true),
        toml::Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(format!("{text:?} is not a boolean")),
        },
        other => Err(format!("expected boolean, found {}", other.type_str())),
    }
}

fn uint_value(value: &toml::Value) -> Result<u32, String> {
    match value {
        toml::Value::Integer(value) => u32::try_from(*value)
            .map_err(|_| format!("{value} is not a non-negative 32-bit integer")),
        toml::Value::String(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|err| format!("{text:?}: {err}")),
        other => Err(format!("expected integer, found {}", other.type_str())),
    }
}

fn real_value(value: &toml::Value) -> Result<f64, String> {
    match value {
        toml::Value::Float(value) => Ok(*value),
        toml::Value::Integer(value) => Ok(*value as f64),
        toml::Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|err| format!("{text:?}: {err}")),
        other => Err(format!("expected real, found {}", other.type_str())),
    }
}

fn fixed_components<T, const N: usize>(
    value: &toml::Value,
    parse: fn(&toml::Value) -> Result<T, String>,
) -> Result<[T; N], String> {
    let components = match value {
        toml::Value::Array(items) => items.clone(),
        toml::Value::String(text) => text
            .split(|ch: char| ch.is_whitespace() || ch == ',')
            .filter(|piece| !piece.is_empty())
            .map(|piece| toml::Value::String(piece.to_string()))
            .collect(),
        other => {
            return Err(format!(
                "expected {N} components, found {}",
                other.type_str()
            ))
        }
    };
    let parsed = components
        .iter()
        .map(parse)
        .collect::<Result<Vec<T>, String>>()?;
    <[T; N]>::try_from(parsed)
        .map_err(|parsed| format!("expected {N} components, found {}", parsed.len()))
}

/// Parsed `<heading>.<name>` option values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigValues {
    values: BTreeMap<String, OptionValue>,
}

impl ConfigValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(schema: &ConfigSchema, path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::ReadConfig {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(schema, &content)
    }

    /// Undeclared keys are skipped; they belong to other parsers.
    pub fn from_toml_str(schema: &ConfigSchema, content: &str) -> Result<Self, ConfigError> {
        let value: toml::Value =
            toml::from_str(content).map_err(|err| ConfigError::ParseConfig {
                message: err.to_string(),
            })?;
        let table = value.as_table().ok_or_else(|| ConfigError::ParseConfig {
            message: "root is not a TOML table".to_string(),
        })?;

        let mut values = BTreeMap::new();
        collect_declared(schema, None, table, &mut values)?;
        Ok(Self { values })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.values.insert(key.into(), value);
    }

    pub fn set(&mut self, heading: &str, name: &str, value: OptionValue) {
        self.insert(option_key(heading, name), value);
    }

    pub fn with(mut self, heading: &str, name: &str, value: OptionValue) -> Self {
        self.set(heading, name, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Later values win.
    pub fn merge(&mut self, other: ConfigValues) {
        self.values.extend(other.values);
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(OptionValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn require_bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self.require(key)? {
            OptionValue::Bool(value) => Ok(*value),
            other => Err(kind_mismatch(key, OptionKind::Bool, other)),
        }
    }

    pub fn require_path(&self, key: &str) -> Result<&str, ConfigError> {
        match self.require(key)? {
            OptionValue::Path(value) => Ok(value.as_str()),
            other => Err(kind_mismatch(key, OptionKind::Path, other)),
        }
    }

    pub fn require_uint(&self, key: &str) -> Result<u32, ConfigError> {
        match self.require(key)? {
            OptionValue::UInt(value) => Ok(*value),
            other => Err(kind_mismatch(key, OptionKind::UInt, other)),
        }
    }

    pub fn require_real(&self, key: &str) -> Result<f64, ConfigError> {
        match self.require(key)? {
            OptionValue::Real(value) => Ok(*value),
            other => Err(kind_mismatch(key, OptionKind::Real, other)),
        }
    }

    pub fn require_uint_vec3(&self, key: &str) -> Result<[u32; 3], ConfigError> {
        match self.require(key)? {
            OptionValue::UIntVec3(value) => Ok(*value),
            other => Err(kind_mismatch(key, OptionKind::UIntVec3, other)),
        }
    }

    pub fn require_real_vec3(&self, key: &str) -> Result<[f64; 3], ConfigError> {
        match self.require(key)? {
            OptionValue::RealVec3(value) => Ok(*value),
            other => Err(kind_mismatch(key, OptionKind::RealVec3, other)),
        }
    }

    pub fn require_real_pair(&self, key: &str) -> Result<[f64; 2], ConfigError> {
        match self.require(key)? {
            OptionValue::RealPair(value) => Ok(*value),
            other => Err(kind_mismatch(key, OptionKind::RealPair, other)),
        }
    }

    pub fn to_toml_table(&self) -> toml::Table {
        let mut root = toml::Table::new();
        for (key, value) in &self.values {
            match key.split_once('.') {
                Some((heading, name)) => {
                    let section = root
                        .entry(heading.to_string())
                        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
                    if let toml::Value::Table(section) = section {
                        section.insert(name.to_string(), value.to_toml());
                    }
                }
                None => {
                    root.insert(key.clone(), value.to_toml());
                }
            }
        }
        root
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(&self.to_toml_table()).map_err(|err| ConfigError::RenderConfig {
            message: err.to_string(),
        })
    }

    fn require(&self, key: &str) -> Result<&OptionValue, ConfigError> {
        self.values.get(key).ok_or_else(|| ConfigError::missing(key))
    }
}

fn kind_mismatch(key: &str, expected: OptionKind, actual: &OptionValue) -> ConfigError {
    ConfigError::invalid(
        key,
        format!(
            "expected {}, found {}",
            expected.label(),
            actual.kind().label()
        ),
    )
}

fn collect_declared(
    schema: &ConfigSchema,
    prefix: Option<&str>,
    table: &toml::Table,
    values: &mut BTreeMap<String, OptionValue>,
) -> Result<(), ConfigError> {
    for (name, value) in table {
        let key = match prefix {
            Some(prefix) => option_key(prefix, name),
            None => name.clone(),
        };
        if let Some(spec) = schema.get(&key) {
            let parsed = OptionValue::from_toml(spec.kind, value)
                .map_err(|message| ConfigError::invalid(key.as_str(), message))?;
            values.insert(key, parsed);
        } else if let toml::Value::Table(child) = value {
            collect_declared(schema, Some(&key), child, values)?;
        }
    }
    Ok(())
}
