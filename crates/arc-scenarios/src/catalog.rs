//! The named scenario catalog.

use arc_types::ParamMap;
use tracing::debug;

use crate::error::ScenarioError;
use crate::params::ScenarioParams;
use crate::scenario::{Scenario, ScenarioKind};

/// Build every scenario in catalog order from one parameter set.
pub fn build_scenarios(params: &ScenarioParams) -> Vec<Scenario> {
    let scenarios: Vec<Scenario> = ScenarioKind::ALL
        .into_iter()
        .map(|kind| Scenario::new(kind, params))
        .collect();
    debug!(
        count = scenarios.len(),
        horizon = params.horizon,
        shock_t = params.shock_t,
        "scenario catalog built"
    );
    scenarios
}

/// Build the scenario named `name` from a flat parameter mapping.
///
/// # Errors
///
/// Returns [`ScenarioError::Unknown`] if no scenario has that name, or
/// [`ScenarioError::Param`] if a scenario key is missing.
pub fn find(name: &str, params: &ParamMap) -> Result<Scenario, ScenarioError> {
    let kind = ScenarioKind::ALL
        .into_iter()
        .find(|kind| kind.name() == name)
        .ok_or_else(|| ScenarioError::Unknown {
            name: name.to_owned(),
        })?;
    let typed = ScenarioParams::from_map(params)?;
    Ok(Scenario::new(kind, &typed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn map() -> ParamMap {
        [
            ("horizon", 120.0),
            ("shock_t", 40.0),
            ("u_base", 0.2),
            ("u_shock", 0.8),
            ("pe_base", 0.1),
            ("pe_noise", 0.1),
            ("burst_len", 20.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn catalog_has_ten_distinct_names() {
        let scenarios = build_scenarios(&ScenarioParams::from_map(&map()).unwrap());
        assert_eq!(scenarios.len(), 10);
        let mut names: Vec<&str> = scenarios.iter().map(Scenario::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
        assert!(scenarios.iter().all(|s| s.horizon == 120));
    }

    #[test]
    fn find_resolves_by_name() {
        let sc = find("reward_flip", &map()).unwrap();
        assert_eq!(sc.kind, ScenarioKind::RewardFlip);
        assert_eq!(sc.onset, 40);
    }

    #[test]
    fn find_rejects_unknown_name() {
        let err = find("moon_landing", &map()).unwrap_err();
        assert!(matches!(err, ScenarioError::Unknown { ref name } if name == "moon_landing"));
    }

    #[test]
    fn find_propagates_missing_parameters() {
        let err = find("reward_flip", &ParamMap::new()).unwrap_err();
        assert!(matches!(err, ScenarioError::Param { .. }));
    }
}
