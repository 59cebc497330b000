use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::model::{Component, Farm, StageState};

/// 複製農場：內容相同，識別碼全部重新產生
///
/// Grazing records that point at animals of the source farm are re-pointed to the copies.
/// The copy has not been calculated yet.
pub fn replicate_farm(farm: &Farm) -> Farm {
    let mut component_ids: HashMap<Uuid, Uuid> = HashMap::new();
    let mut group_ids: HashMap<Uuid, Uuid> = HashMap::new();

    let mut components: Vec<Component> = farm.components.clone();
    for component in &mut components {
        match component {
            Component::Animal(animal) => {
                let guid = Uuid::new_v4();
                component_ids.insert(animal.guid, guid);
                animal.guid = guid;

                for group in &mut animal.groups {
                    let guid = Uuid::new_v4();
                    group_ids.insert(group.guid, guid);
                    group.guid = guid;

                    for period in &mut group.management_periods {
                        period.guid = Uuid::new_v4();
                    }
                }
            }
            Component::Field(field) => {
                let guid = Uuid::new_v4();
                component_ids.insert(field.guid, guid);
                field.guid = guid;

                for item in &mut field.crop_view_items {
                    item.guid = Uuid::new_v4();
                }
            }
        }
    }

    for component in &mut components {
        let Component::Field(field) = component else {
            continue;
        };
        for item in &mut field.crop_view_items {
            for grazing in &mut item.grazing_view_items {
                if let Some(guid) = component_ids.get(&grazing.animal_component_guid) {
                    grazing.animal_component_guid = *guid;
                }
                if let Some(guid) = group_ids.get(&grazing.animal_group_guid) {
                    grazing.animal_group_guid = *guid;
                }
            }
        }
    }

    let stage_states = farm
        .stage_states
        .iter()
        .map(|state| match state {
            StageState::FieldSystemDetails(details) => {
                let mut details = details.clone();
                for item in &mut details.detail_view_items {
                    item.guid = Uuid::new_v4();
                }
                StageState::FieldSystemDetails(details)
            }
        })
        .collect();

    let mut replicated = Farm::new(&farm.name, farm.polygon_id);
    replicated.components = components;
    replicated.defaults = farm.defaults.clone();
    replicated.climate_data = farm.climate_data.clone();
    replicated.geographic_data = farm.geographic_data.clone();
    replicated.stage_states = stage_states;
    replicated.default_manure_composition_data = farm.default_manure_composition_data.clone();
    replicated.default_bedding_composition_data = farm.default_bedding_composition_data.clone();

    tracing::debug!(
        "📋 Replicated farm '{}' ({} -> {})",
        farm.name,
        farm.guid,
        replicated.guid
    );

    replicated
}

pub fn replicate_farms(farms: &[Farm]) -> Vec<Farm> {
    farms.iter().map(replicate_farm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::{AnimalType, ComponentCategory, CropType};
    use crate::domain::model::{
        AnimalComponent, AnimalGroup, CropViewItem, FieldSystemComponent, GrazingViewItem,
    };

    fn grazing_farm() -> Farm {
        let mut farm = Farm::new("Original", 42);
        let mut animal = AnimalComponent::new("Cow-calf", ComponentCategory::BeefProduction);
        let group = AnimalGroup::new("Cows", AnimalType::BeefCow);
        let grazing = GrazingViewItem {
            animal_component_guid: animal.guid,
            animal_group_guid: group.guid,
            start: None,
            end: None,
        };
        animal.groups.push(group);

        let mut field = FieldSystemComponent::new("Pasture");
        let mut item = CropViewItem::new(2021, CropType::TameGrass);
        item.grazing_view_items.push(grazing);
        field.crop_view_items.push(item);

        farm.components.push(Component::Animal(animal));
        farm.components.push(Component::Field(field));
        farm.results_calculated = true;
        farm
    }

    #[test]
    fn test_copy_has_fresh_identities() {
        let farm = grazing_farm();
        let copy = replicate_farm(&farm);

        assert_ne!(copy.guid, farm.guid);
        assert_eq!(copy.name, farm.name);
        assert_eq!(copy.components.len(), farm.components.len());
        for (original, replicated) in farm.components.iter().zip(&copy.components) {
            assert_ne!(original.guid(), replicated.guid());
            assert_eq!(original.name(), replicated.name());
        }
        assert!(!copy.results_calculated);
    }

    #[test]
    fn test_grazing_follows_replicated_animals() {
        let farm = grazing_farm();
        let copy = replicate_farm(&farm);

        let animal = copy.animal_components().next().unwrap();
        let grazing = &copy.field_components().next().unwrap().crop_view_items[0].grazing_view_items[0];

        assert_eq!(grazing.animal_component_guid, animal.guid);
        assert_eq!(grazing.animal_group_guid, animal.groups[0].guid);
    }

    #[test]
    fn test_replicate_many() {
        let farms = vec![grazing_farm(), Farm::new("Empty", 3)];
        let copies = replicate_farms(&farms);
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[1].name, "Empty");
    }
}
