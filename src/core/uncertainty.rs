/// Combines per-source relative uncertainties into one for the whole farm.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionOfUncertaintyCalculator;

impl ExpressionOfUncertaintyCalculator {
    pub const CH4_GLOBAL_WARMING_POTENTIAL: f64 = 28.0;
    pub const N2O_GLOBAL_WARMING_POTENTIAL: f64 = 265.0;

    /// `sqrt(Σ (e·u)²) / sqrt(Σ e²)` over (estimate, uncertainty %) pairs.
    ///
    /// Returns zero when every estimate is zero.
    pub fn calculate_uncertainty_associated_with_net_farm_emission_estimate(
        &self,
        estimates_with_uncertainty: &[(f64, f64)],
    ) -> f64 {
        let (numerator, denominator) = estimates_with_uncertainty.iter().fold(
            (0.0_f64, 0.0_f64),
            |(num, den), (estimate, uncertainty)| {
                let weighted = estimate * uncertainty;
                (num + weighted * weighted, den + estimate * estimate)
            },
        );

        if denominator <= 0.0 {
            return 0.0;
        }

        numerator.sqrt() / denominator.sqrt()
    }

    pub fn enteric_methane_uncertainty(&self) -> f64 {
        20.0
    }

    pub fn manure_methane_uncertainty(&self) -> f64 {
        20.0
    }

    pub fn manure_direct_nitrous_oxide_uncertainty(&self) -> f64 {
        40.0
    }

    pub fn manure_indirect_nitrous_oxide_uncertainty(&self) -> f64 {
        60.0
    }

    pub fn energy_carbon_dioxide_uncertainty(&self) -> f64 {
        40.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_single_source_keeps_its_uncertainty() {
        let calculator = ExpressionOfUncertaintyCalculator;
        let result =
            calculator.calculate_uncertainty_associated_with_net_farm_emission_estimate(&[(150.0, 40.0)]);
        assert_abs_diff_eq!(result, 40.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_equal_sources_combine_in_quadrature() {
        let calculator = ExpressionOfUncertaintyCalculator;
        let result = calculator
            .calculate_uncertainty_associated_with_net_farm_emission_estimate(&[(10.0, 20.0), (10.0, 20.0)]);
        assert_abs_diff_eq!(result, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_all_zero_estimates_give_zero() {
        let calculator = ExpressionOfUncertaintyCalculator;
        assert_eq!(
            calculator.calculate_uncertainty_associated_with_net_farm_emission_estimate(&[(0.0, 40.0)]),
            0.0
        );
        assert_eq!(
            calculator.calculate_uncertainty_associated_with_net_farm_emission_estimate(&[]),
            0.0
        );
    }
}
