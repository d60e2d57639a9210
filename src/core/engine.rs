use super::coerce::finite_or;
use super::types::{ProjectionConfig, ProjectionPoint, RoiInput, RoiResult};

const MINUTES_PER_HOUR: f64 = 60.0;
const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy)]
struct CleanInput {
    invoices_per_month: f64,
    manual_mins_per_invoice: f64,
    automation_mins_per_invoice: f64,
    hourly_wage: f64,
    software_cost_per_month: f64,
    implementation_cost_one_time: f64,
}

impl CleanInput {
    fn from_input(input: &RoiInput) -> Self {
        Self {
            invoices_per_month: finite_or(input.invoices_per_month, 0.0),
            manual_mins_per_invoice: finite_or(input.manual_mins_per_invoice, 0.0),
            automation_mins_per_invoice: finite_or(input.automation_mins_per_invoice, 0.0),
            hourly_wage: finite_or(input.hourly_wage, 0.0),
            software_cost_per_month: finite_or(input.software_cost_per_month, 0.0),
            implementation_cost_one_time: finite_or(
                input.implementation_cost_one_time.unwrap_or(0.0),
                0.0,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MonthlyCosts {
    manual_labor: f64,
    automated_labor: f64,
    software: f64,
}

impl MonthlyCosts {
    fn for_volume(clean: &CleanInput, invoices: f64) -> Self {
        let manual_cost_per_invoice =
            (clean.manual_mins_per_invoice / MINUTES_PER_HOUR) * clean.hourly_wage;
        let automated_cost_per_invoice =
            (clean.automation_mins_per_invoice / MINUTES_PER_HOUR) * clean.hourly_wage;
        Self {
            manual_labor: invoices * manual_cost_per_invoice,
            automated_labor: invoices * automated_cost_per_invoice,
            software: clean.software_cost_per_month,
        }
    }

    // The manual path carries no software cost; the automated path always
    // pays for it, even when its labor cost is lower.
    fn total_manual(self) -> f64 {
        self.manual_labor
    }

    fn total_automated(self) -> f64 {
        self.automated_labor + self.software
    }

    fn savings(self) -> f64 {
        self.total_manual() - self.total_automated()
    }
}

pub fn calculate(input: &RoiInput) -> RoiResult {
    calculate_with(input, &ProjectionConfig::default())
}

pub fn calculate_with(input: &RoiInput, projection: &ProjectionConfig) -> RoiResult {
    let clean = CleanInput::from_input(input);
    let costs = MonthlyCosts::for_volume(&clean, clean.invoices_per_month);

    let monthly_total_manual = costs.total_manual();
    let monthly_total_automated = costs.total_automated();
    let monthly_savings = monthly_total_manual - monthly_total_automated;
    let annual_savings = monthly_savings * MONTHS_PER_YEAR;
    let annual_software_cost = costs.software * MONTHS_PER_YEAR;

    let roi_ratio = if annual_software_cost > 0.0 {
        annual_savings / annual_software_cost
    } else {
        0.0
    };

    RoiResult {
        monthly_manual_labor_cost: costs.manual_labor,
        monthly_automated_labor_cost: costs.automated_labor,
        monthly_software_cost: costs.software,
        monthly_total_manual,
        monthly_total_automated,
        monthly_savings,
        annual_savings,
        annual_software_cost,
        roi_ratio,
        roi_percent: roi_ratio * 100.0,
        payback_months: payback_months(clean.implementation_cost_one_time, monthly_savings),
        series: projection_series(&clean, costs, projection),
    }
}

fn payback_months(implementation_cost: f64, monthly_savings: f64) -> Option<f64> {
    if monthly_savings > 0.0 && implementation_cost > 0.0 {
        Some(implementation_cost / monthly_savings).filter(|months| months.is_finite())
    } else {
        None
    }
}

fn projection_series(
    clean: &CleanInput,
    base: MonthlyCosts,
    projection: &ProjectionConfig,
) -> Vec<ProjectionPoint> {
    let growth = volume_growth(projection.monthly_volume_growth);
    let mut series = Vec::with_capacity(projection.horizon_months as usize);
    let mut cumulative = 0.0;
    let mut invoices = clean.invoices_per_month;

    for month in 1..=projection.horizon_months {
        // Constant volume reuses the month-one figures so the series matches
        // the summary totals exactly.
        let costs = if growth == 0.0 {
            base
        } else {
            MonthlyCosts::for_volume(clean, invoices)
        };
        cumulative += costs.savings();
        series.push(ProjectionPoint {
            month,
            manual: costs.total_manual(),
            automated: costs.total_automated(),
            cumulative_savings: cumulative,
        });
        invoices *= 1.0 + growth;
    }

    series
}

fn volume_growth(raw: f64) -> f64 {
    if raw.is_finite() && raw >= -1.0 {
        raw
    } else {
        0.0
    }
}
