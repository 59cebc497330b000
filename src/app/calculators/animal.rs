use chrono::{Datelike, Months, NaiveDate};

use crate::domain::enums::{ComponentCategory, HousingType};
use crate::domain::model::{AnimalComponent, AnimalGroup, Farm, ManagementPeriod};
use crate::domain::ports::AnimalResultsService;
use crate::domain::results::{
    AnimalComponentEmissionsResults, AnimalGroupEmissionResults, GroupEmissionsByMonth,
};
use crate::utils::error::Result;

/// kg N2O per kg N2O-N
pub const N2O_N_TO_N2O: f64 = 44.0 / 28.0;
/// kg CH4 per m³ CH4
const METHANE_DENSITY: f64 = 0.67;
/// kg C per kg CH4
const CARBON_IN_METHANE: f64 = 12.0 / 16.0;
/// kg volatile solids per kg dry matter eaten
const VOLATILE_SOLIDS_PER_DRY_MATTER: f64 = 0.3;
/// share of eaten carbon that is excreted
const FECAL_CARBON_FRACTION: f64 = 0.4;

/// One calendar month (or part of one) inside a management period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSegment {
    pub year: i32,
    pub month: u32,
    pub days: u32,
}

/// Splits an inclusive date range at month boundaries.
pub fn month_segments(start: NaiveDate, end: NaiveDate) -> Vec<MonthSegment> {
    let mut segments = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        let next_month = cursor
            .with_day(1)
            .and_then(|first| first.checked_add_months(Months::new(1)));
        let month_end = match next_month.and_then(|d| d.pred_opt()) {
            Some(last) => last.min(end),
            None => end,
        };

        segments.push(MonthSegment {
            year: cursor.year(),
            month: cursor.month(),
            days: ((month_end - cursor).num_days() + 1) as u32,
        });

        match month_end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    segments
}

/// 以管理期間的預設值估算每月糞肥氮、碳與排放
#[derive(Debug, Clone, Copy)]
pub struct ReferenceAnimalResultsService {
    category: ComponentCategory,
}

impl ReferenceAnimalResultsService {
    pub fn new(category: ComponentCategory) -> Self {
        Self { category }
    }

    fn group_results(&self, group: &AnimalGroup, farm: &Farm) -> AnimalGroupEmissionResults {
        let mut group_emissions_by_month = Vec::new();
        for period in &group.management_periods {
            for segment in month_segments(period.start, period.end) {
                group_emissions_by_month.push(monthly_emissions(period, segment, farm));
            }
        }

        AnimalGroupEmissionResults {
            animal_group_guid: group.guid,
            group_name: group.name.clone(),
            group_type: group.group_type,
            group_emissions_by_month,
        }
    }
}

fn monthly_emissions(period: &ManagementPeriod, segment: MonthSegment, farm: &Farm) -> GroupEmissionsByMonth {
    let details = &period.manure_details;
    let housing = &period.housing_details;
    let animal_days = period.number_of_animals * f64::from(segment.days);

    let nitrogen_excreted = animal_days * period.nitrogen_excretion_rate;
    let direct_n2o_n = nitrogen_excreted * details.n2o_direct_emission_factor;
    let volatilized_n = nitrogen_excreted * details.volatilization_fraction;
    let leached_n = nitrogen_excreted * details.leaching_fraction;
    let indirect_n2o_n = volatilized_n * details.emission_factor_volatilization
        + leached_n * details.emission_factor_leaching;

    let available_n = (nitrogen_excreted - direct_n2o_n - volatilized_n - leached_n).max(0.0);
    let tan = available_n * details.fraction_of_organic_nitrogen_mineralized;
    let organic_n = available_n - tan;

    let dry_matter = animal_days * period.dry_matter_intake;
    let volatile_solids = dry_matter * VOLATILE_SOLIDS_PER_DRY_MATTER;
    let methane = volatile_solids
        * details.methane_producing_capacity_of_manure
        * METHANE_DENSITY
        * details.methane_conversion_factor;

    let carbon_excreted = dry_matter * farm.defaults.carbon_concentration * FECAL_CARBON_FRACTION;
    let bedding_carbon =
        animal_days * housing.user_defined_bedding_rate * housing.total_carbon_kilograms_dry_matter_for_bedding;
    let stored_carbon = (carbon_excreted + bedding_carbon - methane * CARBON_IN_METHANE).max(0.0);

    let total_carbon_uptake = if housing.housing_type == HousingType::Pasture {
        dry_matter * farm.defaults.carbon_concentration
    } else {
        0.0
    };

    GroupEmissionsByMonth {
        year: segment.year,
        month: segment.month,
        days_in_month: segment.days,
        management_period_guid: period.guid,
        housing_type: housing.housing_type,
        monthly_organic_nitrogen_available_for_land_application: organic_n,
        monthly_tan_available_for_land_application: tan,
        monthly_nitrogen_available_for_land_application: available_n,
        total_amount_of_carbon_in_stored_manure: stored_carbon,
        total_carbon_uptake,
        monthly_manure_methane_emission: methane,
        monthly_manure_direct_n2o_emission: direct_n2o_n * N2O_N_TO_N2O,
        monthly_manure_indirect_n2o_emission: indirect_n2o_n * N2O_N_TO_N2O,
    }
}

impl AnimalResultsService for ReferenceAnimalResultsService {
    fn category(&self) -> ComponentCategory {
        self.category
    }

    fn calculate_results_for_animal_components(
        &self,
        components: &[&AnimalComponent],
        farm: &Farm,
    ) -> Result<Vec<AnimalComponentEmissionsResults>> {
        let results = components
            .iter()
            .map(|component| {
                let groups: Vec<AnimalGroupEmissionResults> = component
                    .groups
                    .iter()
                    .map(|group| self.group_results(group, farm))
                    .collect();

                let spread_nitrogen: f64 = groups
                    .iter()
                    .flat_map(|g| g.group_emissions_by_month.iter())
                    .filter(|m| m.housing_type != HousingType::Pasture)
                    .map(|m| m.monthly_nitrogen_available_for_land_application)
                    .sum();

                AnimalComponentEmissionsResults {
                    component_guid: component.guid,
                    component_name: component.name.clone(),
                    category: component.category,
                    emission_results_for_all_animal_groups_in_component: groups,
                    total_carbon_dioxide_emissions_from_manure_spreading: spread_nitrogen
                        * farm.defaults.manure_spreading_co2_per_kg_nitrogen,
                }
            })
            .collect();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::AnimalType;
    use approx::assert_abs_diff_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_segments_split_at_boundaries() {
        let segments = month_segments(date(2020, 1, 20), date(2020, 3, 5));
        assert_eq!(
            segments,
            vec![
                MonthSegment { year: 2020, month: 1, days: 12 },
                MonthSegment { year: 2020, month: 2, days: 29 },
                MonthSegment { year: 2020, month: 3, days: 5 },
            ]
        );
    }

    #[test]
    fn test_month_segments_across_year_end() {
        let segments = month_segments(date(2020, 12, 31), date(2021, 1, 1));
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].year, 2021);
        assert!(month_segments(date(2021, 1, 2), date(2021, 1, 1)).is_empty());
    }

    #[test]
    fn test_nitrogen_mass_balance() {
        let farm = Farm::new("Balance", 1);
        let mut period = ManagementPeriod::new("Jan", AnimalType::BeefCow, date(2021, 1, 1), date(2021, 1, 31));
        period.number_of_animals = 10.0;
        period.nitrogen_excretion_rate = 0.2;
        period.manure_details.volatilization_fraction = 0.25;
        period.manure_details.fraction_of_organic_nitrogen_mineralized = 0.4;

        let month = monthly_emissions(
            &period,
            MonthSegment { year: 2021, month: 1, days: 31 },
            &farm,
        );

        // 62 kg excreted, a quarter volatilized.
        assert_abs_diff_eq!(month.monthly_nitrogen_available_for_land_application, 46.5, epsilon = 1e-9);
        assert_abs_diff_eq!(month.monthly_tan_available_for_land_application, 18.6, epsilon = 1e-9);
        assert_abs_diff_eq!(
            month.monthly_organic_nitrogen_available_for_land_application
                + month.monthly_tan_available_for_land_application,
            month.monthly_nitrogen_available_for_land_application,
            epsilon = 1e-9
        );
        assert_eq!(month.total_carbon_uptake, 0.0);
    }

    #[test]
    fn test_only_pastured_months_take_up_carbon() {
        let farm = Farm::new("Grazing", 1);
        let mut period = ManagementPeriod::new("Summer", AnimalType::BeefCow, date(2021, 6, 1), date(2021, 6, 30));
        period.number_of_animals = 2.0;
        period.dry_matter_intake = 10.0;
        period.housing_details.housing_type = HousingType::Pasture;

        let month = monthly_emissions(
            &period,
            MonthSegment { year: 2021, month: 6, days: 30 },
            &farm,
        );

        assert_abs_diff_eq!(month.total_carbon_uptake, 600.0 * 0.45, epsilon = 1e-9);
    }
}
