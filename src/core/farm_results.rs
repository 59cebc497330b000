use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::core::manure_tanks;
use crate::domain::events::FarmResultsEvents;
use crate::domain::model::{Farm, FieldSystemComponent};
use crate::domain::ports::{AnimalResultsService, EconomicsCalculator, FieldResultsService};
use crate::domain::results::{
    total_carbon_dioxide_emissions_from_manure_spreading, total_cropping_energy_emissions,
    AnimalComponentEmissionsResults, FarmEmissionResults,
};
use crate::providers::DefaultDataTables;
use crate::utils::error::{FarmError, Result};

/// 農場計算流程：依固定順序執行各階段，並以農場實例快取結果
///
/// Each call runs to completion on one farm. The cache is a plain map owned by the
/// service, so callers that share a service across threads must serialize access.
pub struct FarmResultsService {
    tables: Arc<DefaultDataTables>,
    field_results_service: Box<dyn FieldResultsService>,
    animal_results_services: Vec<Box<dyn AnimalResultsService>>,
    economics_calculator: Box<dyn EconomicsCalculator>,
    cache: HashMap<Uuid, Arc<FarmEmissionResults>>,
    events: FarmResultsEvents,
    stage_timings: Vec<(&'static str, Duration)>,
}

impl FarmResultsService {
    pub fn new(
        tables: Arc<DefaultDataTables>,
        field_results_service: Box<dyn FieldResultsService>,
        animal_results_services: Vec<Box<dyn AnimalResultsService>>,
        economics_calculator: Box<dyn EconomicsCalculator>,
    ) -> Self {
        Self {
            tables,
            field_results_service,
            animal_results_services,
            economics_calculator,
            cache: HashMap::new(),
            events: FarmResultsEvents::new(),
            stage_timings: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: FarmResultsEvents) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &FarmResultsEvents {
        &self.events
    }

    /// Stage durations of the most recent call; empty unless that call ran every stage.
    pub fn stage_timings(&self) -> &[(&'static str, Duration)] {
        &self.stage_timings
    }

    pub fn cached_results(&self, farm: &Farm) -> Option<Arc<FarmEmissionResults>> {
        self.cache.get(&farm.instance_id).cloned()
    }

    /// Forces the next computation for `farm`.
    pub fn invalidate(&mut self, farm: &mut Farm) {
        farm.mark_modified();
        self.cache.remove(&farm.instance_id);
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// A new farm carrying the current composition defaults.
    pub fn create_farm(&self, name: &str, polygon_id: u32) -> Farm {
        let mut farm = Farm::new(name, polygon_id);
        farm.default_manure_composition_data = self.tables.manure_composition.data().to_vec();
        farm.default_bedding_composition_data = self.tables.bedding.data().to_vec();
        farm
    }

    pub fn calculate_farm_emission_results_for_farms(
        &mut self,
        farms: &mut [Farm],
    ) -> Result<Vec<Arc<FarmEmissionResults>>> {
        farms
            .iter_mut()
            .map(|farm| self.calculate_farm_emission_results(farm))
            .collect()
    }

    /// Runs every stage for `farm`, or returns the cached results when the farm is unchanged.
    ///
    /// Writes the grazing carbon uptake back onto the farm's view items and sets its
    /// results-calculated flag. A farm without a soil polygon gets empty results.
    pub fn calculate_farm_emission_results(
        &mut self,
        farm: &mut Farm,
    ) -> Result<Arc<FarmEmissionResults>> {
        self.stage_timings.clear();

        if farm.polygon_id == 0 {
            tracing::warn!(
                "⚠️ Farm '{}' has no soil polygon, returning empty results",
                farm.name
            );
            return Ok(Arc::new(FarmEmissionResults::new(farm)));
        }

        if farm.results_calculated {
            if let Some(cached) = self.cache.get(&farm.instance_id) {
                tracing::info!("♻️ Using cached results for farm '{}'", farm.name);
                return Ok(Arc::clone(cached));
            }
        }
        self.cache.remove(&farm.instance_id);

        tracing::info!("🚀 Calculating results for farm '{}'", farm.name);
        let mut results = FarmEmissionResults::new(farm);

        let start = Instant::now();
        results.field_component_emission_results = self
            .field_results_service
            .calculate_results_for_field_components(farm)
            .map_err(in_stage("field components"))?;
        self.record_stage("field components", start);

        let start = Instant::now();
        for service in &self.animal_results_services {
            let components = farm.animal_components_by_category(service.category());
            tracing::debug!(
                "🐄 {:?}: {} component(s)",
                service.category(),
                components.len()
            );
            let category_results = service
                .calculate_results_for_animal_components(&components, farm)
                .map_err(in_stage("animal components"))?;
            results.animal_component_emissions_results.extend(category_results);
        }
        self.record_stage("animal components", start);

        let start = Instant::now();
        results.mineral_n2o_emissions_results = self
            .field_results_service
            .calculate_mineral_n2o_emissions_for_farm(farm, &results)
            .map_err(in_stage("mineral N2O"))?;
        results.manure_n2o_emission_results = self
            .field_results_service
            .calculate_manure_n2o_emissions_for_farm(farm, &results)
            .map_err(in_stage("manure N2O"))?;
        self.record_stage("nitrous oxide", start);

        let start = Instant::now();
        calculate_carbon_lost_by_grazing_animals(farm, &results.animal_component_emissions_results);
        self.record_stage("grazing carbon", start);

        let start = Instant::now();
        results.final_field_result_view_items = self
            .field_results_service
            .calculate_final_results(farm, &results)
            .map_err(in_stage("final field results"))?;
        self.record_stage("final field results", start);

        let start = Instant::now();
        manure_tanks::update_storage_tanks(farm, &mut results)?;
        self.record_stage("manure tanks", start);

        let start = Instant::now();
        results.farm_energy_results.energy_carbon_dioxide_from_manure_application =
            total_carbon_dioxide_emissions_from_manure_spreading(
                &results.animal_component_emissions_results,
            );
        results.farm_energy_results.total_cropping_energy_emissions_for_farm =
            total_cropping_energy_emissions(&results.field_component_emission_results);
        self.record_stage("energy", start);

        let start = Instant::now();
        results.economic_results_view_items = self
            .economics_calculator
            .calculate_crop_results(farm, &results.final_field_result_view_items)
            .map_err(in_stage("economics"))?;
        results.economics_profit = self
            .economics_calculator
            .get_total_profit(&results.economic_results_view_items);
        self.record_stage("economics", start);

        let results = Arc::new(results);
        self.cache.insert(farm.instance_id, Arc::clone(&results));
        farm.results_calculated = true;
        self.events.publish(Arc::clone(&results));

        tracing::info!("✅ Results for farm '{}': {}", farm.name, results);

        Ok(results)
    }

    fn record_stage(&mut self, stage: &'static str, start: Instant) {
        let elapsed = start.elapsed();
        tracing::debug!("⏱️ Stage '{}' took {:?}", stage, elapsed);
        self.stage_timings.push((stage, elapsed));
    }
}

fn in_stage(stage: &'static str) -> impl Fn(FarmError) -> FarmError {
    move |error| match error {
        FarmError::CalculationError { .. } => error,
        other => FarmError::calculation(stage, other.to_string()),
    }
}

/// Writes each field-year's total grazing carbon uptake from the matching animal groups.
///
/// Groups are matched by component and group identifiers. A grazing record that names a
/// component or group absent from `animal_results` adds nothing.
pub fn calculate_carbon_lost_by_grazing_animals(
    farm: &mut Farm,
    animal_results: &[AnimalComponentEmissionsResults],
) {
    let mut uptake_by_group: HashMap<Uuid, HashMap<Uuid, f64>> = HashMap::new();
    for component in animal_results {
        let groups = uptake_by_group.entry(component.component_guid).or_default();
        for group in &component.emission_results_for_all_animal_groups_in_component {
            *groups.entry(group.animal_group_guid).or_default() +=
                group.total_carbon_uptake_by_animals();
        }
    }

    for field in farm.field_components_mut() {
        write_grazing_uptake(field, &uptake_by_group);
    }
}

fn write_grazing_uptake(
    field: &mut FieldSystemComponent,
    uptake_by_group: &HashMap<Uuid, HashMap<Uuid, f64>>,
) {
    for view_item in &mut field.crop_view_items {
        let mut total = 0.0;
        for grazing in &view_item.grazing_view_items {
            let uptake = uptake_by_group
                .get(&grazing.animal_component_guid)
                .and_then(|groups| groups.get(&grazing.animal_group_guid));

            match uptake {
                Some(uptake) => total += uptake,
                None => tracing::debug!(
                    "Grazing record on '{}' ({}) references an animal group without results",
                    field.name,
                    view_item.year
                ),
            }
        }
        view_item.total_carbon_uptake_by_grazing_animals = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::{AnimalType, ComponentCategory, CropType};
    use crate::domain::model::{
        AnimalComponent, Component, CropViewItem, FieldSystemComponent, GrazingViewItem,
    };
    use crate::domain::results::{
        AnimalGroupEmissionResults, EconomicResultViewItem, FieldComponentEmissionResults,
        FinalFieldResult, GroupEmissionsByMonth, NitrousOxideResults,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingFieldService {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl FieldResultsService for CountingFieldService {
        fn calculate_results_for_field_components(
            &self,
            _farm: &Farm,
        ) -> Result<Vec<FieldComponentEmissionResults>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FarmError::ValidationError {
                    message: "bad field".to_string(),
                });
            }
            Ok(Vec::new())
        }

        fn calculate_mineral_n2o_emissions_for_farm(
            &self,
            _farm: &Farm,
            _results: &FarmEmissionResults,
        ) -> Result<NitrousOxideResults> {
            Ok(NitrousOxideResults::default())
        }

        fn calculate_manure_n2o_emissions_for_farm(
            &self,
            _farm: &Farm,
            _results: &FarmEmissionResults,
        ) -> Result<NitrousOxideResults> {
            Ok(NitrousOxideResults::default())
        }

        fn calculate_final_results(
            &self,
            _farm: &Farm,
            _results: &FarmEmissionResults,
        ) -> Result<Vec<FinalFieldResult>> {
            Ok(Vec::new())
        }
    }

    struct NoEconomics;

    impl EconomicsCalculator for NoEconomics {
        fn calculate_crop_results(
            &self,
            _farm: &Farm,
            _final_field_results: &[FinalFieldResult],
        ) -> Result<Vec<EconomicResultViewItem>> {
            Ok(Vec::new())
        }
    }

    fn service(field: CountingFieldService) -> FarmResultsService {
        FarmResultsService::new(
            DefaultDataTables::shared().unwrap(),
            Box::new(field),
            Vec::new(),
            Box::new(NoEconomics),
        )
    }

    fn group_results(guid: Uuid, uptake: f64) -> AnimalGroupEmissionResults {
        AnimalGroupEmissionResults {
            animal_group_guid: guid,
            group_name: "Group".to_string(),
            group_type: AnimalType::BeefCow,
            group_emissions_by_month: vec![GroupEmissionsByMonth {
                total_carbon_uptake: uptake,
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_second_call_returns_cached_object() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = service(CountingFieldService {
            calls: Arc::clone(&calls),
            fail: false,
        });
        let mut farm = Farm::new("Cached", 42);

        let first = service.calculate_farm_emission_results(&mut farm).unwrap();
        let second = service.calculate_farm_emission_results(&mut farm).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(farm.results_calculated);
    }

    #[test]
    fn test_modified_farm_is_recomputed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = service(CountingFieldService {
            calls: Arc::clone(&calls),
            fail: false,
        });
        let mut farm = Farm::new("Edited", 42);

        let first = service.calculate_farm_emission_results(&mut farm).unwrap();
        farm.mark_modified();
        let second = service.calculate_farm_emission_results(&mut farm).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_flag_without_cache_entry_recomputes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = service(CountingFieldService {
            calls: Arc::clone(&calls),
            fail: false,
        });
        let mut farm = Farm::new("Restarted", 42);
        farm.results_calculated = true;

        service.calculate_farm_emission_results(&mut farm).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        service.clear_cache();
        service.calculate_farm_emission_results(&mut farm).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_farm_without_polygon_gets_empty_results() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = service(CountingFieldService {
            calls: Arc::clone(&calls),
            fail: false,
        });
        let mut farm = Farm::new("Nowhere", 0);

        let results = service.calculate_farm_emission_results(&mut farm).unwrap();

        assert!(results.field_component_emission_results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(service.cached_results(&farm).is_none());
        assert!(!farm.results_calculated);
    }

    #[test]
    fn test_farms_read_from_the_same_json_are_cached_separately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut service = service(CountingFieldService {
            calls: Arc::clone(&calls),
            fail: false,
        });
        let mut saved = Farm::new("Saved", 42);
        saved.results_calculated = true;
        let json = serde_json::to_string(&saved).unwrap();

        let mut a: Farm = serde_json::from_str(&json).unwrap();
        let mut b: Farm = serde_json::from_str(&json).unwrap();
        assert_eq!(a.guid, b.guid);
        assert_ne!(a.instance_id, b.instance_id);

        let first = service.calculate_farm_emission_results(&mut a).unwrap();
        let second = service.calculate_farm_emission_results(&mut b).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(Arc::ptr_eq(&second, &service.cached_results(&b).unwrap()));
    }

    #[test]
    fn test_stage_timings_only_describe_the_latest_call() {
        let mut service = service(CountingFieldService::default());
        let mut farm = Farm::new("Timed", 42);

        service.calculate_farm_emission_results(&mut farm).unwrap();
        assert_eq!(service.stage_timings().len(), 8);

        service.calculate_farm_emission_results(&mut farm).unwrap();
        assert!(service.stage_timings().is_empty());

        let mut nowhere = Farm::new("Nowhere", 0);
        farm.mark_modified();
        service.calculate_farm_emission_results(&mut farm).unwrap();
        service.calculate_farm_emission_results(&mut nowhere).unwrap();
        assert!(service.stage_timings().is_empty());
    }

    #[test]
    fn test_collaborator_failure_names_the_stage() {
        let mut service = service(CountingFieldService {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        });
        let mut farm = Farm::new("Broken", 42);

        let error = service.calculate_farm_emission_results(&mut farm).unwrap_err();
        match error {
            FarmError::CalculationError { stage, .. } => assert_eq!(stage, "field components"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!farm.results_calculated);
    }

    #[test]
    fn test_grazing_uptake_is_summed_per_field_year() {
        let component = AnimalComponent::new("Cow-calf", ComponentCategory::BeefProduction);
        let (cows, calves, missing) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let mut farm = Farm::new("Grazing", 1);
        let mut field = FieldSystemComponent::new("Pasture");
        let mut item = CropViewItem::new(2021, CropType::TameGrass);
        item.total_carbon_uptake_by_grazing_animals = 1000.0;
        for group in [cows, calves, missing] {
            item.grazing_view_items.push(GrazingViewItem {
                animal_component_guid: component.guid,
                animal_group_guid: group,
                start: None,
                end: None,
            });
        }
        field.crop_view_items.push(item);
        farm.components.push(Component::Field(field));

        let animal_results = vec![AnimalComponentEmissionsResults {
            component_guid: component.guid,
            component_name: component.name.clone(),
            category: component.category,
            emission_results_for_all_animal_groups_in_component: vec![
                group_results(cows, 10.0),
                group_results(calves, 15.0),
            ],
            total_carbon_dioxide_emissions_from_manure_spreading: 0.0,
        }];

        calculate_carbon_lost_by_grazing_animals(&mut farm, &animal_results);
        // Running again must not accumulate onto the previous total.
        calculate_carbon_lost_by_grazing_animals(&mut farm, &animal_results);

        let item = &farm.field_components().next().unwrap().crop_view_items[0];
        assert_eq!(item.total_carbon_uptake_by_grazing_animals, 25.0);
    }

    #[test]
    fn test_create_farm_seeds_composition_defaults() {
        let service = service(CountingFieldService::default());
        let farm = service.create_farm("New", 7);
        assert!(!farm.default_manure_composition_data.is_empty());
        assert!(!farm.default_bedding_composition_data.is_empty());
    }
}
