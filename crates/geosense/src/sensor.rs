//! The contract every sensor type implements.
//!
//! [`SensorModel`] is the typed side, written once per sensor. Generic
//! pipeline code never sees those types: it holds `dyn SensorContract`
//! values and moves [`SensorSpec`]/[`SensorParams`]/[`SensorResults`]
//! between stages. [`ModelContract`] bridges the two for any model.

use std::collections::BTreeSet;
use std::fmt;

use geosense_proto::SensorKind;

use crate::config::{option_key, ConfigSchema, ConfigValues, EmitPlan};
use crate::error::{ConfigError, SensorError};
use crate::property::RockProperty;
use crate::sensors::gravity::{GravParams, GravParamsPrior, GravResults, GravSpec};
use crate::sensors::magnetism::{MagParams, MagParamsPrior, MagResults, MagSpec};
use crate::sensors::thermal::{ThermalParams, ThermalParamsPrior, ThermalResults, ThermalSpec};
use crate::serial::{serialise, unserialise, WireMessage};
use crate::table::TableStore;
use crate::validate::ValidationReport;
use crate::world::WorldSpec;

pub const OPTION_ENABLED: &str = "enabled";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledSensors {
    kinds: BTreeSet<SensorKind>,
}

impl EnabledSensors {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self::from_kinds(SensorKind::ALL)
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = SensorKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Sensors whose `<heading>.enabled` option is `true`.
    pub fn from_config(values: &ConfigValues) -> Self {
        Self::from_kinds(SensorKind::ALL.into_iter().filter(|kind| {
            values
                .flag(&option_key(kind.heading(), OPTION_ENABLED))
                .unwrap_or(false)
        }))
    }

    pub fn contains(&self, kind: SensorKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn insert(&mut self, kind: SensorKind) {
        self.kinds.insert(kind);
    }

    pub fn iter(&self) -> impl Iterator<Item = SensorKind> + '_ {
        self.kinds.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

pub trait SensorModel: Send + Sync + 'static {
    const KIND: SensorKind;

    type Spec: Clone + Default + PartialEq + fmt::Debug + WireMessage + SensorVariant<SensorSpec>;
    type Params: Clone
        + Default
        + PartialEq
        + fmt::Debug
        + WireMessage
        + SensorVariant<SensorParams>;
    type Results: Clone
        + Default
        + PartialEq
        + fmt::Debug
        + WireMessage
        + SensorVariant<SensorResults>;
    type Prior: Clone + Default + PartialEq + fmt::Debug + SensorVariant<SensorPrior>;

    fn heading(&self) -> &'static str {
        Self::KIND.heading()
    }

    fn declare_options(&self, schema: &mut ConfigSchema) -> Result<(), ConfigError>;

    /// Disabled sensors get `Self::Spec::default()` without any table read.
    fn parse_spec(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<Self::Spec, ConfigError>;

    fn parse_params(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
    ) -> Result<Self::Params, ConfigError>;

    fn parse_results(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<Self::Results, ConfigError>;

    /// A sensor outside `enabled` is described by its `enabled = false`
    /// flag alone.
    fn describe_spec(&self, prefix: &str, spec: &Self::Spec, enabled: &EnabledSensors)
        -> EmitPlan;

    fn describe_params(&self, prefix: &str, params: &Self::Params) -> EmitPlan;

    fn describe_results(
        &self,
        prefix: &str,
        results: &Self::Results,
        enabled: &EnabledSensors,
    ) -> EmitPlan;

    fn activated_properties(&self) -> BTreeSet<RockProperty>;

    fn declare_prior(&self, config: &ConfigValues, enabled: &EnabledSensors) -> Self::Prior;

    fn validate(
        &self,
        world: &WorldSpec,
        spec: &Self::Spec,
        results: &Self::Results,
    ) -> ValidationReport;
}

/// Membership of a per-sensor value in one of the closed value enums.
pub trait SensorVariant<Any>: Sized {
    fn wrap(self) -> Any;
    fn peek(any: &Any) -> Option<&Self>;
}

macro_rules! sensor_value_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($ty:ty)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $($variant($ty)),+
        }

        impl $name {
            pub fn kind(&self) -> SensorKind {
                match self {
                    $($name::$variant(_) => SensorKind::$variant),+
                }
            }
        }

        $(
            impl SensorVariant<$name> for $ty {
                fn wrap(self) -> $name {
                    $name::$variant(self)
                }

                fn peek(any: &$name) -> Option<&Self> {
                    match any {
                        $name::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )+
    };
}

sensor_value_enum!(SensorSpec {
    Gravity(GravSpec),
    Magnetism(MagSpec),
    Thermal(ThermalSpec),
});

sensor_value_enum!(SensorParams {
    Gravity(GravParams),
    Magnetism(MagParams),
    Thermal(ThermalParams),
});

sensor_value_enum!(SensorResults {
    Gravity(GravResults),
    Magnetism(MagResults),
    Thermal(ThermalResults),
});

sensor_value_enum!(
    /// Each sensor's contribution to the parameter prior; passed through
    /// untouched to the sampler.
    SensorPrior {
        Gravity(GravParamsPrior),
        Magnetism(MagParamsPrior),
        Thermal(ThermalParamsPrior),
    }
);

/// Object-safe view of a [`SensorModel`], stored in the registry.
pub trait SensorContract: Send + Sync {
    fn kind(&self) -> SensorKind;
    fn heading(&self) -> &'static str;
    fn declare_options(&self, schema: &mut ConfigSchema) -> Result<(), ConfigError>;

    fn parse_spec(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<SensorSpec, SensorError>;
    fn parse_params(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
    ) -> Result<SensorParams, SensorError>;
    fn parse_results(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<SensorResults, SensorError>;

    fn describe_spec(
        &self,
        prefix: &str,
        spec: &SensorSpec,
        enabled: &EnabledSensors,
    ) -> Result<EmitPlan, SensorError>;
    fn describe_params(&self, prefix: &str, params: &SensorParams)
        -> Result<EmitPlan, SensorError>;
    fn describe_results(
        &self,
        prefix: &str,
        results: &SensorResults,
        enabled: &EnabledSensors,
    ) -> Result<EmitPlan, SensorError>;

    fn activated_properties(&self) -> BTreeSet<RockProperty>;
    fn declare_prior(&self, config: &ConfigValues, enabled: &EnabledSensors) -> SensorPrior;
    fn validate(
        &self,
        world: &WorldSpec,
        spec: &SensorSpec,
        results: &SensorResults,
    ) -> Result<ValidationReport, SensorError>;

    fn encode_spec(&self, spec: &SensorSpec) -> Result<Vec<u8>, SensorError>;
    fn decode_spec(&self, bytes: &[u8]) -> Result<SensorSpec, SensorError>;
    fn encode_params(&self, params: &SensorParams) -> Result<Vec<u8>, SensorError>;
    fn decode_params(&self, bytes: &[u8]) -> Result<SensorParams, SensorError>;
    fn encode_results(&self, results: &SensorResults) -> Result<Vec<u8>, SensorError>;
    fn decode_results(&self, bytes: &[u8]) -> Result<SensorResults, SensorError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelContract<M> {
    model: M,
}

impl<M: SensorModel> ModelContract<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

fn expect_kind<'a, T, Any>(
    kind: SensorKind,
    any: &'a Any,
    actual: SensorKind,
) -> Result<&'a T, SensorError>
where
    T: SensorVariant<Any>,
{
    T::peek(any).ok_or(SensorError::KindMismatch {
        expected: kind,
        actual,
    })
}

impl<M: SensorModel> SensorContract for ModelContract<M> {
    fn kind(&self) -> SensorKind {
        M::KIND
    }

    fn heading(&self) -> &'static str {
        self.model.heading()
    }

    fn declare_options(&self, schema: &mut ConfigSchema) -> Result<(), ConfigError> {
        self.model.declare_options(schema)
    }

    fn parse_spec(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<SensorSpec, SensorError> {
        Ok(self.model.parse_spec(config, enabled, tables)?.wrap())
    }

    fn parse_params(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
    ) -> Result<SensorParams, SensorError> {
        Ok(self.model.parse_params(config, enabled)?.wrap())
    }

    fn parse_results(
        &self,
        config: &ConfigValues,
        enabled: &EnabledSensors,
        tables: &dyn TableStore,
    ) -> Result<SensorResults, SensorError> {
        Ok(self.model.parse_results(config, enabled, tables)?.wrap())
    }

    fn describe_spec(
        &self,
        prefix: &str,
        spec: &SensorSpec,
        enabled: &EnabledSensors,
    ) -> Result<EmitPlan, SensorError> {
        let spec = expect_kind::<M::Spec, _>(M::KIND, spec, spec.kind())?;
        Ok(self.model.describe_spec(prefix, spec, enabled))
    }

    fn describe_params(
        &self,
        prefix: &str,
        params: &SensorParams,
    ) -> Result<EmitPlan, SensorError> {
        let params = expect_kind::<M::Params, _>(M::KIND, params, params.kind())?;
        Ok(self.model.describe_params(prefix, params))
    }

    fn describe_results(
        &self,
        prefix: &str,
        results: &SensorResults,
        enabled: &EnabledSensors,
    ) -> Result<EmitPlan, SensorError> {
        let results = expect_kind::<M::Results, _>(M::KIND, results, results.kind())?;
        Ok(self.model.describe_results(prefix, results, enabled))
    }

    fn activated_properties(&self) -> BTreeSet<RockProperty> {
        self.model.activated_properties()
    }

    fn declare_prior(&self, config: &ConfigValues, enabled: &EnabledSensors) -> SensorPrior {
        self.model.declare_prior(config, enabled).wrap()
    }

    fn validate(
        &self,
        world: &WorldSpec,
        spec: &SensorSpec,
        results: &SensorResults,
    ) -> Result<ValidationReport, SensorError> {
        let spec = expect_kind::<M::Spec, _>(M::KIND, spec, spec.kind())?;
        let results = expect_kind::<M::Results, _>(M::KIND, results, results.kind())?;
        Ok(self.model.validate(world, spec, results))
    }

    fn encode_spec(&self, spec: &SensorSpec) -> Result<Vec<u8>, SensorError> {
        let spec = expect_kind::<M::Spec, _>(M::KIND, spec, spec.kind())?;
        Ok(serialise(spec)?)
    }

    fn decode_spec(&self, bytes: &[u8]) -> Result<SensorSpec, SensorError> {
        Ok(unserialise::<M::Spec>(bytes)?.wrap())
    }

    fn encode_params(&self, params: &SensorParams) -> Result<Vec<u8>, SensorError> {
        let params = expect_kind::<M::Params, _>(M::KIND, params, params.kind())?;
        Ok(serialise(params)?)
    }

    fn decode_params(&self, bytes: &[u8]) -> Result<SensorParams, SensorError> {
        Ok(unserialise::<M::Params>(bytes)?.wrap())
    }

    fn encode_results(&self, results: &SensorResults) -> Result<Vec<u8>, SensorError> {
        let results = expect_kind::<M::Results, _>(M::KIND, results, results.kind())?;
        Ok(serialise(results)?)
    }

    fn decode_results(&self, bytes: &[u8]) -> Result<SensorResults, SensorError> {
        Ok(unserialise::<M::Results>(bytes)?.wrap())
    }
}
