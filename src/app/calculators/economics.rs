use crate::domain::model::Farm;
use crate::domain::ports::EconomicsCalculator;
use crate::domain::results::{EconomicResultViewItem, FinalFieldResult};
use crate::utils::error::Result;

/// Revenue and variable cost per field-year; items without prices are left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEconomicsCalculator;

impl EconomicsCalculator for ReferenceEconomicsCalculator {
    fn calculate_crop_results(
        &self,
        farm: &Farm,
        final_field_results: &[FinalFieldResult],
    ) -> Result<Vec<EconomicResultViewItem>> {
        let mut items = Vec::new();

        for result in final_field_results {
            let view_item = farm
                .field_components()
                .find(|f| f.guid == result.field_guid)
                .and_then(|f| f.crop_view_items.iter().find(|i| i.year == result.year));

            let Some((item, economics)) =
                view_item.and_then(|i| i.crop_economic_data.as_ref().map(|e| (i, e)))
            else {
                continue;
            };

            // yield is kg ha^-1, price is per tonne
            let revenue = item.yield_per_hectare / 1000.0 * economics.price_per_tonne * item.area;
            let cost = economics.variable_cost_per_hectare * item.area;

            items.push(EconomicResultViewItem {
                field_guid: result.field_guid,
                field_name: result.field_name.clone(),
                year: result.year,
                crop_type: result.crop_type,
                revenue,
                cost,
                profit: revenue - cost,
            });
        }

        Ok(items)
    }
}
