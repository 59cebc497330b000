use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::model::Farm;
use crate::domain::ports::Storage;
use crate::domain::results::FarmEmissionResults;
use crate::utils::error::Result;

/// Files under a base directory; absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let data = fs::read(self.resolve(path))?;
        Ok(data)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

/// 從 JSON 讀取農場
pub fn load_farm<S: Storage + ?Sized>(storage: &S, path: &Path) -> Result<Farm> {
    let data = storage.read_file(path)?;
    let farm: Farm = serde_json::from_slice(&data)?;
    tracing::debug!("📥 Loaded farm '{}' from {}", farm.name, path.display());
    Ok(farm)
}

pub fn save_farm<S: Storage + ?Sized>(storage: &S, path: &Path, farm: &Farm) -> Result<()> {
    let data = serde_json::to_vec_pretty(farm)?;
    storage.write_file(path, &data)
}

pub fn save_results<S: Storage + ?Sized>(
    storage: &S,
    path: &Path,
    results: &FarmEmissionResults,
    pretty: bool,
) -> Result<()> {
    let data = if pretty {
        serde_json::to_vec_pretty(results)?
    } else {
        serde_json::to_vec(results)?
    };
    storage.write_file(path, &data)?;
    tracing::debug!("💾 Results for '{}' written to {}", results.farm_name, path.display());
    Ok(())
}

/// `<farm name>_<short id>_results.json`, with characters unsafe in file names replaced.
pub fn results_file_name(farm_name: &str, farm_guid: Uuid) -> String {
    let safe: String = farm_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let id = farm_guid.simple().to_string();
    format!("{}_{}_results.json", safe, &id[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enums::CropType;
    use crate::domain::model::{Component, CropViewItem, FieldSystemComponent};
    use tempfile::TempDir;

    #[test]
    fn test_farm_round_trips_through_storage() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let mut farm = Farm::new("Round trip", 851003);
        let mut field = FieldSystemComponent::new("Field 1");
        field.crop_view_items.push(CropViewItem::new(2021, CropType::Oats));
        farm.components.push(Component::Field(field));

        save_farm(&storage, Path::new("farms/farm.json"), &farm).unwrap();
        let loaded = load_farm(&storage, Path::new("farms/farm.json")).unwrap();

        assert_eq!(loaded.guid, farm.guid);
        assert_eq!(loaded.components, farm.components);
    }

    #[test]
    fn test_minimal_farm_json_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage
            .write_file(Path::new("minimal.json"), br#"{"name": "Minimal", "polygon_id": 7}"#)
            .unwrap();

        let farm = load_farm(&storage, Path::new("minimal.json")).unwrap();
        assert_eq!(farm.polygon_id, 7);
        assert_eq!(farm.defaults.carbon_concentration, 0.45);
        assert!(!farm.results_calculated);
    }

    #[test]
    fn test_results_are_written() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        let farm = Farm::new("Written", 1);
        let results = FarmEmissionResults::new(&farm);

        save_results(&storage, Path::new("out/results.json"), &results, false).unwrap();

        let raw = storage.read_file(Path::new("out/results.json")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["farm_name"], "Written");
        assert_eq!(value["manure_tanks"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_results_file_name_is_safe() {
        let guid = Uuid::parse_str("0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0").unwrap();
        assert_eq!(
            results_file_name("North / South farm", guid),
            "North___South_farm_0f1e2d3c_results.json"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(matches!(
            load_farm(&storage, Path::new("absent.json")),
            Err(crate::utils::error::FarmError::IoError(_))
        ));
    }
}
