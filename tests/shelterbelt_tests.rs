use approx::assert_abs_diff_eq;
use farm_ghg::domain::enums::{HardinessZone, TreeSpecies};
use farm_ghg::providers::shelterbelt::{Columns, SHELTERBELT_CUT_YEAR};
use farm_ghg::DefaultDataTables;

// Ecodistrict 703 belongs to cluster A.
const ECODISTRICT: u32 = 703;

fn caragana_tec(percent_mortality: f64, age: u32, year: i32) -> f64 {
    let tables = DefaultDataTables::shared().unwrap();
    tables.shelterbelt.get_interpolated_value(
        TreeSpecies::Caragana,
        HardinessZone::H3,
        ECODISTRICT,
        percent_mortality,
        0.0,
        50.0,
        age,
        Columns::TecMgCKm,
        year,
    )
}

#[test]
fn test_bounds_return_table_values_exactly() {
    assert_eq!(caragana_tec(0.0, 60, 2010), 178.782);
    assert_eq!(caragana_tec(50.0, 60, 2010), 125.147);
}

#[test]
fn test_midpoint_mortality_interpolates() {
    assert_abs_diff_eq!(caragana_tec(25.0, 60, 2010), (178.782 + 125.147) / 2.0, epsilon = 1e-9);
    assert!(caragana_tec(40.0, 60, 2010) < caragana_tec(10.0, 60, 2010));
}

#[test]
fn test_old_trees_are_treated_as_sixty() {
    assert_eq!(caragana_tec(20.0, 75, 2010), caragana_tec(20.0, 60, 2010));
    assert_eq!(caragana_tec(20.0, 200, 2030), caragana_tec(20.0, 60, 2030));
}

#[test]
fn test_cut_year_selects_future_rows() {
    assert_eq!(caragana_tec(0.0, 60, SHELTERBELT_CUT_YEAR), 187.721);
    assert_eq!(caragana_tec(0.0, 60, SHELTERBELT_CUT_YEAR - 1), 178.782);
}

#[test]
fn test_unknown_ecodistrict_gives_zero() {
    let tables = DefaultDataTables::shared().unwrap();
    let value = tables.shelterbelt.get_interpolated_value(
        TreeSpecies::Caragana,
        HardinessZone::H3,
        1,
        10.0,
        0.0,
        50.0,
        30,
        Columns::BiomMgCKm,
        2010,
    );
    assert_eq!(value, 0.0);
}

#[test]
fn test_missing_mortality_row_gives_zero() {
    let tables = DefaultDataTables::shared().unwrap();
    let value = tables.shelterbelt.get_interpolated_value(
        TreeSpecies::Caragana,
        HardinessZone::H3,
        ECODISTRICT,
        30.0,
        0.0,
        35.0,
        30,
        Columns::DomMgCKm,
        2010,
    );
    assert_eq!(value, 0.0);
}
