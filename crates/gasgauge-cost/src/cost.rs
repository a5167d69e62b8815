// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost model: prices an operation in usage percentage points.
//!
//! Linear kinds (context loads, discussions, searches) cost
//! `base + per_unit × units`, where units are KB, words or results. Scaled
//! kinds (code, artifacts, planning) cost `base × complexity × size`.
//! A categorical size for a linear kind is mapped to a unit count first.

use gasgauge_config::model::{
    ComplexityFactors, CostTableConfig, LinearCostConfig, ScaledCostConfig, SizeTable,
};
use gasgauge_core::{Complexity, GaugeError, Magnitude, OperationKind, OperationParams, SizeClass};
use serde::Serialize;

/// Price of one operation plus the inputs that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostQuote {
    pub kind: OperationKind,
    /// Cost in percentage points.
    pub cost: f64,
    /// Linear-term input (KB, words, results); `None` for scaled kinds.
    pub units: Option<f64>,
    pub complexity_factor: Option<f64>,
    pub size_factor: Option<f64>,
}

/// Pure, deterministic mapping from operation parameters to cost.
#[derive(Debug, Clone)]
pub struct CostModel {
    table: CostTableConfig,
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(&CostTableConfig::default())
    }
}

impl CostModel {
    /// Create a cost model from a (validated) cost table.
    pub fn new(table: &CostTableConfig) -> Self {
        Self {
            table: table.clone(),
        }
    }

    /// Cost of an operation in percentage points.
    pub fn cost(&self, kind: OperationKind, params: &OperationParams) -> Result<f64, GaugeError> {
        self.quote(kind, params).map(|q| q.cost)
    }

    /// Cost of an operation with the factors and units used.
    ///
    /// Fails with `InvalidParameterShape` when `params` do not belong to `kind`.
    pub fn quote(
        &self,
        kind: OperationKind,
        params: &OperationParams,
    ) -> Result<CostQuote, GaugeError> {
        params.validate_for(kind)?;

        let quote = match *params {
            OperationParams::ContextLoad { size_kb } => {
                linear(kind, &self.table.context_load, size_kb)
            }
            OperationParams::Discussion { words } => linear(kind, &self.table.discussion, words),
            OperationParams::Search { results } => linear(kind, &self.table.search, results),
            OperationParams::CodeGeneration { complexity, size } => {
                scaled(kind, &self.table.code_generation, complexity, Some(size))
            }
            OperationParams::ArtifactCreation { complexity, size } => {
                scaled(kind, &self.table.artifact_creation, complexity, Some(size))
            }
            OperationParams::Planning { complexity } => {
                scaled(kind, &self.table.planning, complexity, None)
            }
        };
        Ok(quote)
    }
}

fn linear(kind: OperationKind, cost: &LinearCostConfig, magnitude: Magnitude) -> CostQuote {
    let units = match magnitude {
        Magnitude::Exact(n) => n,
        Magnitude::Category(size) => size_value(&cost.size_units, size),
    };
    CostQuote {
        kind,
        cost: cost.base + cost.per_unit * units,
        units: Some(units),
        complexity_factor: None,
        size_factor: None,
    }
}

fn scaled(
    kind: OperationKind,
    cost: &ScaledCostConfig,
    complexity: Complexity,
    size: Option<SizeClass>,
) -> CostQuote {
    let complexity_factor = complexity_value(&cost.complexity, complexity);
    // Kinds without a size table (planning) scale by complexity alone.
    let size_factor = match (cost.size.as_ref(), size) {
        (Some(table), Some(size)) => Some(size_value(table, size)),
        _ => None,
    };
    CostQuote {
        kind,
        cost: cost.base * complexity_factor * size_factor.unwrap_or(1.0),
        units: None,
        complexity_factor: Some(complexity_factor),
        size_factor,
    }
}

fn complexity_value(factors: &ComplexityFactors, complexity: Complexity) -> f64 {
    match complexity {
        Complexity::Low => factors.low,
        Complexity::Medium => factors.medium,
        Complexity::High => factors.high,
    }
}

fn size_value(table: &SizeTable, size: SizeClass) -> f64 {
    match size {
        SizeClass::Small => table.small,
        SizeClass::Medium => table.medium,
        SizeClass::Large => table.large,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn cost_of(params: OperationParams) -> f64 {
        CostModel::default().cost(params.kind(), &params).unwrap()
    }

    #[test]
    fn context_load_is_base_plus_per_kb() {
        assert!(approx(cost_of(OperationParams::context_load(80.0)), 6.0));
        assert!(approx(cost_of(OperationParams::context_load(0.0)), 2.0));
    }

    #[test]
    fn context_load_category_maps_to_kb() {
        let params = OperationParams::ContextLoad {
            size_kb: Magnitude::Category(SizeClass::Large),
        };
        // 2.0 + 0.05 × 200
        assert!(approx(cost_of(params), 12.0));
    }

    #[test]
    fn code_generation_high_large_is_sixty() {
        let cost = cost_of(OperationParams::code(Complexity::High, SizeClass::Large));
        assert!(approx(cost, 60.0), "got {cost}");
    }

    #[test]
    fn code_generation_medium_medium() {
        // 3.0 × 2.0 × 2.5
        let cost = cost_of(OperationParams::code(Complexity::Medium, SizeClass::Medium));
        assert!(approx(cost, 15.0));
    }

    #[test]
    fn artifact_uses_its_own_factors() {
        // 5.0 × 3.5 × 2.0
        let cost = cost_of(OperationParams::artifact(Complexity::High, SizeClass::Medium));
        assert!(approx(cost, 35.0));
    }

    #[test]
    fn discussion_of_500_words_costs_six() {
        assert!(approx(cost_of(OperationParams::discussion(500)), 6.0));
    }

    #[test]
    fn discussion_category_maps_to_words() {
        let params = OperationParams::Discussion {
            words: Magnitude::Category(SizeClass::Small),
        };
        // 1.0 + 0.01 × 50
        assert!(approx(cost_of(params), 1.5));
    }

    #[test]
    fn search_is_base_plus_per_result() {
        assert!(approx(cost_of(OperationParams::search(5)), 6.5));
        assert!(approx(cost_of(OperationParams::search(0)), 4.0));
    }

    #[test]
    fn planning_scales_by_complexity_only() {
        let quote = CostModel::default()
            .quote(
                OperationKind::Planning,
                &OperationParams::planning(Complexity::High),
            )
            .unwrap();
        assert!(approx(quote.cost, 6.0));
        assert_eq!(quote.size_factor, None);
        assert_eq!(quote.complexity_factor, Some(3.0));
    }

    #[test]
    fn quote_reports_units_for_linear_kinds() {
        let quote = CostModel::default()
            .quote(OperationKind::Discussion, &OperationParams::discussion(120))
            .unwrap();
        assert_eq!(quote.units, Some(120.0));
        assert_eq!(quote.complexity_factor, None);
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        let err = CostModel::default()
            .cost(OperationKind::Search, &OperationParams::discussion(10))
            .unwrap_err();
        assert!(matches!(err, GaugeError::InvalidParameterShape { .. }));
    }

    #[test]
    fn custom_table_is_honored() {
        let mut table = CostTableConfig::default();
        table.search.base = 10.0;
        let model = CostModel::new(&table);
        let cost = model
            .cost(OperationKind::Search, &OperationParams::search(2))
            .unwrap();
        assert!(approx(cost, 11.0));
    }

    fn any_params() -> impl Strategy<Value = OperationParams> {
        let complexity = prop_oneof![
            Just(Complexity::Low),
            Just(Complexity::Medium),
            Just(Complexity::High)
        ];
        let size = prop_oneof![
            Just(SizeClass::Small),
            Just(SizeClass::Medium),
            Just(SizeClass::Large)
        ];
        prop_oneof![
            (0.0f64..10_000.0).prop_map(OperationParams::context_load),
            (complexity.clone(), size.clone()).prop_map(|(c, s)| OperationParams::code(c, s)),
            (complexity.clone(), size).prop_map(|(c, s)| OperationParams::artifact(c, s)),
            (0u32..100_000).prop_map(OperationParams::discussion),
            (0u32..1_000).prop_map(OperationParams::search),
            complexity.prop_map(OperationParams::planning),
        ]
    }

    proptest! {
        #[test]
        fn cost_is_never_negative(params in any_params()) {
            let cost = CostModel::default().cost(params.kind(), &params).unwrap();
            prop_assert!(cost >= 0.0);
        }

        #[test]
        fn cost_is_deterministic(params in any_params()) {
            let model = CostModel::default();
            let a = model.cost(params.kind(), &params).unwrap();
            let b = model.cost(params.kind(), &params).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
