use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentCategory {
    LandManagement,
    BeefProduction,
    Dairy,
    Swine,
    Sheep,
    Poultry,
    OtherLivestock,
}

impl ComponentCategory {
    /// 六種畜牧類別，每一類對應一個糞肥儲槽
    pub const ANIMAL_CATEGORIES: [ComponentCategory; 6] = [
        ComponentCategory::BeefProduction,
        ComponentCategory::Dairy,
        ComponentCategory::Swine,
        ComponentCategory::Sheep,
        ComponentCategory::Poultry,
        ComponentCategory::OtherLivestock,
    ];

    pub fn is_animal(self) -> bool {
        self != ComponentCategory::LandManagement
    }

    /// Category-level animal type used to key manure tanks.
    pub fn animal_type(self) -> Option<AnimalType> {
        match self {
            ComponentCategory::LandManagement => None,
            ComponentCategory::BeefProduction => Some(AnimalType::Beef),
            ComponentCategory::Dairy => Some(AnimalType::Dairy),
            ComponentCategory::Swine => Some(AnimalType::Swine),
            ComponentCategory::Sheep => Some(AnimalType::Sheep),
            ComponentCategory::Poultry => Some(AnimalType::Poultry),
            ComponentCategory::OtherLivestock => Some(AnimalType::OtherLivestock),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimalType {
    NotSelected,
    Beef,
    BeefCow,
    BeefBull,
    BeefCalf,
    BeefBackgrounder,
    BeefFinisher,
    Dairy,
    DairyLactatingCow,
    DairyDryCow,
    DairyHeifer,
    DairyCalf,
    Swine,
    SwineSow,
    SwineBoar,
    SwineGrower,
    SwineFinisher,
    Sheep,
    Ewe,
    Ram,
    Lamb,
    Poultry,
    ChickenLayer,
    ChickenBroiler,
    Turkey,
    OtherLivestock,
    Horse,
    Mule,
    Goat,
    Bison,
    Llama,
    Deer,
}

impl AnimalType {
    pub fn category(self) -> Option<ComponentCategory> {
        use AnimalType::*;
        match self {
            NotSelected => None,
            Beef | BeefCow | BeefBull | BeefCalf | BeefBackgrounder | BeefFinisher => {
                Some(ComponentCategory::BeefProduction)
            }
            Dairy | DairyLactatingCow | DairyDryCow | DairyHeifer | DairyCalf => {
                Some(ComponentCategory::Dairy)
            }
            Swine | SwineSow | SwineBoar | SwineGrower | SwineFinisher => {
                Some(ComponentCategory::Swine)
            }
            Sheep | Ewe | Ram | Lamb => Some(ComponentCategory::Sheep),
            Poultry | ChickenLayer | ChickenBroiler | Turkey => Some(ComponentCategory::Poultry),
            OtherLivestock | Horse | Mule | Goat | Bison | Llama | Deer => {
                Some(ComponentCategory::OtherLivestock)
            }
        }
    }

    /// The category-level type (`Beef`, `Dairy`, ...) this type rolls up to.
    pub fn category_type(self) -> Option<AnimalType> {
        self.category().and_then(ComponentCategory::animal_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HousingType {
    #[default]
    HousedInBarn,
    Pasture,
    ConfinedNoBarn,
    FreeStallBarn,
    TieStallBarn,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ManureStateType {
    #[default]
    NotSelected,
    Pasture,
    DailySpread,
    SolidStorage,
    DeepBedding,
    CompostIntensive,
    CompostPassive,
    LiquidNoCrust,
    LiquidWithNaturalCrust,
    LiquidWithSolidCover,
    DeepPit,
    AnaerobicDigester,
}

impl ManureStateType {
    pub fn is_liquid(self) -> bool {
        matches!(
            self,
            ManureStateType::LiquidNoCrust
                | ManureStateType::LiquidWithNaturalCrust
                | ManureStateType::LiquidWithSolidCover
                | ManureStateType::DeepPit
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ManureLocationSourceType {
    #[default]
    Livestock,
    Imported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BeddingMaterialType {
    #[default]
    None,
    Straw,
    WoodChip,
    Sawdust,
    Sand,
    SeparatedManureSolid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Province {
    Alberta,
    BritishColumbia,
    Saskatchewan,
    Manitoba,
    Ontario,
    Quebec,
    NewBrunswick,
    NovaScotia,
    PrinceEdwardIsland,
    NewfoundlandAndLabrador,
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilFunctionalCategory {
    Brown,
    DarkBrown,
    Black,
    EasternCanada,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TillageType {
    Intensive,
    #[default]
    Reduced,
    NoTill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropType {
    Barley,
    Wheat,
    Oats,
    Canola,
    GrainCorn,
    Soybeans,
    TameGrass,
    TameLegume,
    RangelandNative,
    SummerFallow,
}

/// Grouping used by the fuel energy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropGroup {
    Annual,
    Perennial,
    Fallow,
}

impl CropType {
    pub fn crop_group(self) -> CropGroup {
        match self {
            CropType::TameGrass | CropType::TameLegume | CropType::RangelandNative => {
                CropGroup::Perennial
            }
            CropType::SummerFallow => CropGroup::Fallow,
            _ => CropGroup::Annual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeSpecies {
    Caragana,
    GreenAsh,
    HybridPoplar,
    ManitobaMaple,
    ScotsPine,
    WhiteSpruce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardinessZone {
    H0,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    H7,
}
