//! Input model for a computation request: the site, the user's equipment
//! selection and the fixed catalogs the selection keys into. The catalogs are
//! configuration supplied alongside the request; the pipeline only ever looks
//! items up by key and never mutates them.

use crate::errors::{CatalogKind, PvCalcError};
use anyhow::anyhow;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_valid::Validate;
use std::io::Read;
use strum_macros::Display;

pub fn ingest_request(json: impl Read) -> anyhow::Result<Input> {
    let input: Input = serde_json::from_reader(json)?;
    Ok(input)
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Input {
    pub site: SiteConfig,
    pub selection: Selection,
    #[serde(default)]
    pub catalogs: Catalogs,
}

/// The geographic site of the analysis. Immutable for a run.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// latitude, in degrees, north positive
    pub latitude: f64,
    /// longitude, easterly +ve westerly -ve, in degrees
    pub longitude: f64,
    /// albedo of the ground surrounding the array, 0 to 1
    #[serde(default = "default_ground_reflectivity")]
    pub ground_reflectivity: f64,
}

fn default_ground_reflectivity() -> f64 {
    0.2
}

/// One user selection, as posted by the driving collaborator per recompute.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Selection {
    pub module: String,
    pub assembly: String,
    pub inverter: String,
    /// module tilt from horizontal, in degrees; tolerated outside 0-90
    pub tilt: f64,
    /// module azimuth bearing, 0 to 360 degrees, 180 = equator-facing
    pub azimuth: f64,
    pub demand_goal: DemandGoal,
    /// date used by the single-day comparison views only
    pub reference_date: Option<NaiveDate>,
}

/// Nameplate data for one photovoltaic module model.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct ModuleSpec {
    /// rated DC power at 1000 W/m2 and 25 deg C cell temperature, in W
    #[validate(exclusive_minimum = 0.)]
    pub rated_power_dc: f64,
    /// power temperature coefficient, per deg C, typically negative
    pub temperature_coefficient: f64,
}

/// How the modules are mounted; keys into the SAPM thermal parameter sets.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MountingAssembly {
    OpenRackGlassGlass,
    CloseMountGlassGlass,
    OpenRackGlassPolymer,
    InsulatedBackGlassPolymer,
}

/// DC to AC conversion ratio of the inverter, in (0, 1].
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, PartialOrd, Validate)]
#[serde(transparent)]
#[repr(transparent)]
pub struct InverterEfficiency(
    #[validate(exclusive_minimum = 0.)]
    #[validate(maximum = 1.)]
    f64,
);

impl InverterEfficiency {
    pub fn new(ratio: f64) -> anyhow::Result<Self> {
        let efficiency = Self(ratio);
        efficiency
            .validate()
            .map_err(|errors| anyhow!("inverter efficiency {ratio} out of range: {errors}"))?;
        Ok(efficiency)
    }

    pub fn ratio(&self) -> f64 {
        self.0
    }
}

/// The energy target the array is sized against: either a single annual
/// figure or the six bimonthly readings from an electricity bill
/// (Jan-Feb, Mar-Apr, May-Jun, Jul-Aug, Sep-Oct, Nov-Dec).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DemandGoal {
    Annual(f64),
    Bimonthly([f64; 6]),
}

impl DemandGoal {
    /// The scalar annual goal the sizing aggregator consumes, in kWh.
    pub fn annual_kwh(&self) -> f64 {
        match self {
            DemandGoal::Annual(goal) => *goal,
            DemandGoal::Bimonthly(bimonthly) => bimonthly.iter().sum(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalogs {
    pub modules: IndexMap<String, ModuleSpec>,
    pub assemblies: IndexMap<String, MountingAssembly>,
    pub inverters: IndexMap<String, InverterEfficiency>,
}

impl Default for Catalogs {
    /// The fixed options the dashboard offers when no catalog configuration
    /// is supplied with the request.
    fn default() -> Self {
        Self {
            modules: IndexMap::from([
                (
                    "JA Solar 550W Mono".into(),
                    ModuleSpec {
                        rated_power_dc: 550.,
                        temperature_coefficient: -0.004,
                    },
                ),
                (
                    "Canadian Solar 500W Poly".into(),
                    ModuleSpec {
                        rated_power_dc: 500.,
                        temperature_coefficient: -0.0042,
                    },
                ),
                (
                    "Longi 450W Mono".into(),
                    ModuleSpec {
                        rated_power_dc: 450.,
                        temperature_coefficient: -0.0039,
                    },
                ),
                (
                    "Trina Solar 410W Bifacial".into(),
                    ModuleSpec {
                        rated_power_dc: 410.,
                        temperature_coefficient: -0.0038,
                    },
                ),
            ]),
            assemblies: IndexMap::from([
                (
                    "Bifacial or glass-glass module on open rack".into(),
                    MountingAssembly::OpenRackGlassGlass,
                ),
                (
                    "Mono/polycrystalline module on open rack".into(),
                    MountingAssembly::OpenRackGlassPolymer,
                ),
                (
                    "Glass-glass module on close roof mount".into(),
                    MountingAssembly::CloseMountGlassGlass,
                ),
                (
                    "Standard module on close roof mount".into(),
                    MountingAssembly::CloseMountGlassGlass,
                ),
                (
                    "Module on insulated mount".into(),
                    MountingAssembly::InsulatedBackGlassPolymer,
                ),
            ]),
            inverters: IndexMap::from([
                ("Inverter A (96%)".into(), InverterEfficiency(0.96)),
                ("Inverter B (98%)".into(), InverterEfficiency(0.98)),
            ]),
        }
    }
}

/// A selection with every catalog key resolved, ready for the pipeline.
#[derive(Clone, Debug)]
pub struct ResolvedSelection {
    pub module: ModuleSpec,
    pub assembly: MountingAssembly,
    pub inverter: InverterEfficiency,
    pub tilt: f64,
    pub azimuth: f64,
    pub demand_goal: DemandGoal,
    pub reference_date: Option<NaiveDate>,
}

impl Catalogs {
    /// Resolve every key in the selection, failing on the first missing one
    /// before any computation starts.
    pub fn resolve(&self, selection: &Selection) -> anyhow::Result<ResolvedSelection> {
        let module = *self.modules.get(&selection.module).ok_or_else(|| {
            PvCalcError::InvalidCatalogKey {
                kind: CatalogKind::Module,
                key: selection.module.clone(),
            }
        })?;
        module
            .validate()
            .map_err(|errors| anyhow!("module \"{}\" is invalid: {errors}", selection.module))?;
        let assembly = *self.assemblies.get(&selection.assembly).ok_or_else(|| {
            PvCalcError::InvalidCatalogKey {
                kind: CatalogKind::Assembly,
                key: selection.assembly.clone(),
            }
        })?;
        let inverter = *self.inverters.get(&selection.inverter).ok_or_else(|| {
            PvCalcError::InvalidCatalogKey {
                kind: CatalogKind::Inverter,
                key: selection.inverter.clone(),
            }
        })?;
        inverter.validate().map_err(|errors| {
            anyhow!("inverter \"{}\" is invalid: {errors}", selection.inverter)
        })?;

        Ok(ResolvedSelection {
            module,
            assembly,
            inverter,
            tilt: selection.tilt,
            azimuth: selection.azimuth,
            demand_goal: selection.demand_goal,
            reference_date: selection.reference_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn selection() -> Selection {
        Selection {
            module: "JA Solar 550W Mono".into(),
            assembly: "Mono/polycrystalline module on open rack".into(),
            inverter: "Inverter B (98%)".into(),
            tilt: 19.4,
            azimuth: 180.,
            demand_goal: DemandGoal::Annual(1200.),
            reference_date: None,
        }
    }

    #[rstest]
    fn should_resolve_default_catalog_keys(selection: Selection) {
        let resolved = Catalogs::default().resolve(&selection).unwrap();
        assert_eq!(resolved.module.rated_power_dc, 550.);
        assert_eq!(resolved.module.temperature_coefficient, -0.004);
        assert_eq!(resolved.assembly, MountingAssembly::OpenRackGlassPolymer);
        assert_eq!(resolved.inverter.ratio(), 0.98);
    }

    #[rstest]
    fn should_fail_fast_on_unknown_module(mut selection: Selection) {
        selection.module = "Shiny 9000".into();
        let error = Catalogs::default().resolve(&selection).unwrap_err();
        let error = error.downcast_ref::<PvCalcError>().unwrap();
        assert!(matches!(error, PvCalcError::InvalidCatalogKey { kind, .. } if *kind == CatalogKind::Module));
    }

    #[rstest]
    fn should_sum_bimonthly_goals_to_annual() {
        let goal = DemandGoal::Bimonthly([200., 220., 250., 290., 180., 300.]);
        assert_eq!(goal.annual_kwh(), 1440.);
    }

    #[rstest]
    fn should_reject_out_of_range_inverter_efficiency() {
        assert!(InverterEfficiency::new(0.).is_err());
        assert!(InverterEfficiency::new(1.2).is_err());
        assert!(InverterEfficiency::new(0.98).is_ok());
    }

    #[rstest]
    fn should_parse_a_request_with_bimonthly_goal() {
        let json = r#"{
            "site": {"latitude": 18.85, "longitude": -99.23},
            "selection": {
                "module": "Longi 450W Mono",
                "assembly": "Mono/polycrystalline module on open rack",
                "inverter": "Inverter A (96%)",
                "tilt": 18.85,
                "azimuth": 180.0,
                "demand_goal": [200.0, 220.0, 250.0, 290.0, 180.0, 300.0],
                "reference_date": "2024-03-01"
            }
        }"#;
        let input = ingest_request(json.as_bytes()).unwrap();
        assert_eq!(input.site.ground_reflectivity, 0.2);
        assert_eq!(
            input.selection.demand_goal,
            DemandGoal::Bimonthly([200., 220., 250., 290., 180., 300.])
        );
        assert_eq!(
            input.selection.reference_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
    }
}
