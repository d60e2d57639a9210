use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce::{Coerced, CoercionSource, coerce_value};

pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiInput {
    pub invoices_per_month: f64,
    pub manual_mins_per_invoice: f64,
    pub automation_mins_per_invoice: f64,
    pub hourly_wage: f64,
    pub software_cost_per_month: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_cost_one_time: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRoiInput {
    pub invoices_per_month: Value,
    pub manual_mins_per_invoice: Value,
    pub automation_mins_per_invoice: Value,
    pub hourly_wage: Value,
    pub software_cost_per_month: Value,
    pub implementation_cost_one_time: Value,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDiagnostic {
    pub field: &'static str,
    pub coerced: Coerced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoercedInput {
    pub input: RoiInput,
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl RawRoiInput {
    pub fn coerce(&self) -> CoercedInput {
        let fields = [
            ("invoicesPerMonth", &self.invoices_per_month),
            ("manualMinsPerInvoice", &self.manual_mins_per_invoice),
            ("automationMinsPerInvoice", &self.automation_mins_per_invoice),
            ("hourlyWage", &self.hourly_wage),
            ("softwareCostPerMonth", &self.software_cost_per_month),
            ("implementationCostOneTime", &self.implementation_cost_one_time),
        ];
        let diagnostics: Vec<FieldDiagnostic> = fields
            .into_iter()
            .map(|(field, value)| FieldDiagnostic {
                field,
                coerced: coerce_value(value, 0.0),
            })
            .collect();

        let input = RoiInput {
            invoices_per_month: diagnostics[0].coerced.value,
            manual_mins_per_invoice: diagnostics[1].coerced.value,
            automation_mins_per_invoice: diagnostics[2].coerced.value,
            hourly_wage: diagnostics[3].coerced.value,
            software_cost_per_month: diagnostics[4].coerced.value,
            implementation_cost_one_time: Some(diagnostics[5].coerced.value),
        };

        CoercedInput { input, diagnostics }
    }
}

impl CoercedInput {
    // The implementation cost is optional, so only an unusable value counts.
    pub fn rejected_fields(&self) -> Vec<&'static str> {
        self.diagnostics
            .iter()
            .filter(|d| match d.field {
                "implementationCostOneTime" => d.coerced.source == CoercionSource::Invalid,
                _ => d.coerced.used_fallback(),
            })
            .map(|d| d.field)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub horizon_months: u32,
    pub monthly_volume_growth: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            monthly_volume_growth: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month: u32,
    pub manual: f64,
    pub automated: f64,
    pub cumulative_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiResult {
    pub monthly_manual_labor_cost: f64,
    pub monthly_automated_labor_cost: f64,
    pub monthly_software_cost: f64,
    pub monthly_total_manual: f64,
    pub monthly_total_automated: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub annual_software_cost: f64,
    pub roi_ratio: f64,
    pub roi_percent: f64,
    pub payback_months: Option<f64>,
    pub series: Vec<ProjectionPoint>,
}
