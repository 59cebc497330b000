use crate::domain::enums::{AnimalType, ComponentCategory, HousingType, ManureLocationSourceType};
use crate::domain::model::Farm;
use crate::domain::results::{FarmEmissionResults, GroupEmissionsByMonth, ManureTank};
use crate::utils::error::{FarmError, Result};

/// Resets every tank to its stored totals, then debits the user-defined field applications.
pub fn update_storage_tanks(farm: &Farm, results: &mut FarmEmissionResults) -> Result<()> {
    initialize_all_manure_tanks(results);
    update_manure_tanks_from_user_defined_manure_applications(farm, results)?;
    update_remaining_amounts_after_applications(results);
    Ok(())
}

/// Sets each category's tank to the manure collected into storage, with no applications made.
pub fn initialize_all_manure_tanks(results: &mut FarmEmissionResults) {
    for category in ComponentCategory::ANIMAL_CATEGORIES {
        let Some(tank_type) = category.animal_type() else {
            continue;
        };

        let stored = stored_manure_totals(results, category);
        if let Some(tank) = results.get_manure_tank_by_animal_type_mut(tank_type) {
            set_starting_state_of_manure_tank(tank, &stored);
        }
    }
}

/// Totals of the months whose manure ends up in storage for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StoredManureTotals {
    pub organic_nitrogen: f64,
    pub tan: f64,
    pub carbon: f64,
    pub available_nitrogen: f64,
}

impl StoredManureTotals {
    fn add(&mut self, month: &GroupEmissionsByMonth) {
        self.organic_nitrogen += month.monthly_organic_nitrogen_available_for_land_application;
        self.tan += month.monthly_tan_available_for_land_application;
        self.carbon += month.total_amount_of_carbon_in_stored_manure;
        self.available_nitrogen += month.monthly_nitrogen_available_for_land_application;
    }
}

/// Pastured months are excluded: that manure is never collected.
pub fn stored_manure_totals(
    results: &FarmEmissionResults,
    category: ComponentCategory,
) -> StoredManureTotals {
    let mut totals = StoredManureTotals::default();

    results
        .animal_results_by_category(category)
        .into_iter()
        .flat_map(|c| c.emission_results_for_all_animal_groups_in_component.iter())
        .flat_map(|g| g.group_emissions_by_month.iter())
        .filter(|m| m.housing_type != HousingType::Pasture)
        .for_each(|m| totals.add(m));

    totals
}

pub fn set_starting_state_of_manure_tank(tank: &mut ManureTank, stored: &StoredManureTotals) {
    tank.nitrogen_sum_of_all_manure_applications_made = 0.0;
    tank.total_organic_nitrogen_available_for_land_application = stored.organic_nitrogen;
    tank.total_tan_available_for_land_application = stored.tan;
    tank.total_amount_of_carbon_in_stored_manure = stored.carbon;

    // No applications yet: both totals start at the baseline.
    tank.total_available_manure_nitrogen_available_for_land_application = stored.available_nitrogen;
    tank.total_available_manure_nitrogen_available_for_land_application_after_all_land_applications =
        stored.available_nitrogen;
}

/// Adds every own-livestock application on each field's current year to its tank's ledger.
pub fn update_manure_tanks_from_user_defined_manure_applications(
    farm: &Farm,
    results: &mut FarmEmissionResults,
) -> Result<()> {
    for field in farm.field_components() {
        let Some(view_item) = field.get_single_year_view_item() else {
            continue;
        };

        for application in &view_item.manure_application_view_items {
            if application.manure_location_source_type == ManureLocationSourceType::Imported
                || application.animal_type == AnimalType::NotSelected
            {
                continue;
            }

            let tank = results
                .get_manure_tank_by_animal_type_mut(application.animal_type)
                .ok_or(FarmError::ManureTankNotFound {
                    animal_type: application.animal_type,
                })?;

            let nitrogen_applied = application.amount_of_nitrogen_applied_per_hectare * view_item.area;
            tank.nitrogen_sum_of_all_manure_applications_made += nitrogen_applied;

            tracing::debug!(
                "🚜 {} kg N of {:?} manure applied to '{}' ({})",
                nitrogen_applied,
                application.animal_type,
                field.name,
                view_item.year
            );
        }
    }

    Ok(())
}

/// `after = max(baseline − ledger, 0)`.
pub fn update_remaining_amounts_after_applications(results: &mut FarmEmissionResults) {
    for tank in &mut results.manure_tanks {
        let baseline = tank.total_available_manure_nitrogen_available_for_land_application;
        let applied = tank.nitrogen_sum_of_all_manure_applications_made;

        if applied > baseline {
            tracing::warn!(
                "⚠️ {:?} manure applications ({:.2} kg N) exceed the stored amount ({:.2} kg N)",
                tank.animal_type,
                applied,
                baseline
            );
        }

        tank.total_available_manure_nitrogen_available_for_land_application_after_all_land_applications =
            (baseline - applied).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::CropType;
    use crate::domain::model::{Component, CropViewItem, FieldSystemComponent, ManureApplicationViewItem};
    use crate::domain::results::{AnimalComponentEmissionsResults, AnimalGroupEmissionResults};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn month(housing_type: HousingType, nitrogen: f64) -> GroupEmissionsByMonth {
        GroupEmissionsByMonth {
            housing_type,
            monthly_organic_nitrogen_available_for_land_application: nitrogen / 2.0,
            monthly_tan_available_for_land_application: nitrogen / 2.0,
            monthly_nitrogen_available_for_land_application: nitrogen,
            total_amount_of_carbon_in_stored_manure: nitrogen * 10.0,
            ..Default::default()
        }
    }

    fn animal_results(category: ComponentCategory, months: Vec<GroupEmissionsByMonth>) -> AnimalComponentEmissionsResults {
        AnimalComponentEmissionsResults {
            component_guid: Uuid::new_v4(),
            component_name: "Herd".to_string(),
            category,
            emission_results_for_all_animal_groups_in_component: vec![AnimalGroupEmissionResults {
                animal_group_guid: Uuid::new_v4(),
                group_name: "Group".to_string(),
                group_type: AnimalType::BeefCow,
                group_emissions_by_month: months,
            }],
            total_carbon_dioxide_emissions_from_manure_spreading: 0.0,
        }
    }

    fn application(animal_type: AnimalType, source: ManureLocationSourceType, rate: f64) -> ManureApplicationViewItem {
        ManureApplicationViewItem {
            date_of_application: NaiveDate::from_ymd_opt(2021, 5, 1).unwrap(),
            manure_location_source_type: source,
            animal_type,
            manure_state_type: Default::default(),
            amount_of_nitrogen_applied_per_hectare: rate,
        }
    }

    fn farm_with_applications(area: f64, applications: Vec<ManureApplicationViewItem>) -> Farm {
        let mut farm = Farm::new("Tanks", 1);
        let mut field = FieldSystemComponent::new("Home quarter");
        let mut item = CropViewItem::new(2021, CropType::Barley);
        item.area = area;
        item.manure_application_view_items = applications;
        field.crop_view_items.push(item);
        farm.components.push(Component::Field(field));
        farm
    }

    #[test]
    fn test_reset_excludes_pasture_months() {
        let farm = Farm::new("Reset", 1);
        let mut results = FarmEmissionResults::new(&farm);
        results.animal_component_emissions_results.push(animal_results(
            ComponentCategory::BeefProduction,
            vec![month(HousingType::HousedInBarn, 30.0), month(HousingType::Pasture, 100.0)],
        ));

        initialize_all_manure_tanks(&mut results);

        let tank = results.get_manure_tank_by_animal_type(AnimalType::Beef).unwrap();
        assert_eq!(tank.total_available_manure_nitrogen_available_for_land_application, 30.0);
        assert_eq!(
            tank.total_available_manure_nitrogen_available_for_land_application_after_all_land_applications,
            30.0
        );
        assert_eq!(tank.total_amount_of_carbon_in_stored_manure, 300.0);
        assert_eq!(tank.nitrogen_sum_of_all_manure_applications_made, 0.0);

        let dairy = results.get_manure_tank_by_animal_type(AnimalType::Dairy).unwrap();
        assert_eq!(dairy.total_available_manure_nitrogen_available_for_land_application, 0.0);
    }

    #[test]
    fn test_ledger_skips_imported_and_unset_sources() {
        let farm = farm_with_applications(
            4.0,
            vec![
                application(AnimalType::DairyLactatingCow, ManureLocationSourceType::Livestock, 10.0),
                application(AnimalType::Dairy, ManureLocationSourceType::Imported, 99.0),
                application(AnimalType::NotSelected, ManureLocationSourceType::Livestock, 99.0),
            ],
        );
        let mut results = FarmEmissionResults::new(&farm);

        update_storage_tanks(&farm, &mut results).unwrap();

        let dairy = results.get_manure_tank_by_animal_type(AnimalType::Dairy).unwrap();
        assert_eq!(dairy.nitrogen_sum_of_all_manure_applications_made, 40.0);
    }

    #[test]
    fn test_remaining_never_exceeds_baseline() {
        let farm = farm_with_applications(
            1.0,
            vec![application(AnimalType::Ewe, ManureLocationSourceType::Livestock, 30.0)],
        );
        let mut results = FarmEmissionResults::new(&farm);
        results
            .animal_component_emissions_results
            .push(animal_results(ComponentCategory::Sheep, vec![month(HousingType::HousedInBarn, 20.0)]));

        update_storage_tanks(&farm, &mut results).unwrap();

        let sheep = results.get_manure_tank_by_animal_type(AnimalType::Sheep).unwrap();
        assert_eq!(sheep.nitrogen_sum_of_all_manure_applications_made, 30.0);
        assert_eq!(
            sheep.total_available_manure_nitrogen_available_for_land_application_after_all_land_applications,
            0.0
        );
        for tank in &results.manure_tanks {
            assert!(
                tank.total_available_manure_nitrogen_available_for_land_application_after_all_land_applications
                    <= tank.total_available_manure_nitrogen_available_for_land_application
            );
        }
    }

    #[test]
    fn test_missing_tank_is_an_error() {
        let farm = farm_with_applications(
            1.0,
            vec![application(AnimalType::Horse, ManureLocationSourceType::Livestock, 5.0)],
        );
        let mut results = FarmEmissionResults::new(&farm);
        results
            .manure_tanks
            .retain(|t| t.animal_type != AnimalType::OtherLivestock);

        let error = update_manure_tanks_from_user_defined_manure_applications(&farm, &mut results)
            .unwrap_err();
        assert!(matches!(
            error,
            FarmError::ManureTankNotFound {
                animal_type: AnimalType::Horse
            }
        ));
    }

    #[test]
    fn test_only_latest_year_is_debited() {
        let mut farm = farm_with_applications(
            1.0,
            vec![application(AnimalType::SwineSow, ManureLocationSourceType::Livestock, 12.0)],
        );
        if let Some(field) = farm.field_components_mut().next() {
            let mut old = CropViewItem::new(2019, CropType::Wheat);
            old.manure_application_view_items =
                vec![application(AnimalType::SwineSow, ManureLocationSourceType::Livestock, 500.0)];
            field.crop_view_items.push(old);
        }
        let mut results = FarmEmissionResults::new(&farm);

        update_storage_tanks(&farm, &mut results).unwrap();

        let swine = results.get_manure_tank_by_animal_type(AnimalType::Swine).unwrap();
        assert_eq!(swine.nitrogen_sum_of_all_manure_applications_made, 12.0);
    }
}
