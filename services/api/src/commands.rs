use chrono::{DateTime, Utc};
use clap::Args;
use ops_scoring::analytics::{
    import, most_frequent_category, top_categories, AggregationReducer, KpiRecord, TimeWindow,
};
use ops_scoring::config::{AppConfig, ScoringConfig};
use ops_scoring::error::AppError;
use ops_scoring::scoring::catalog::ordered_categories;
use ops_scoring::scoring::CriterionRegistry;
use ops_scoring::service::{CandidateInput, WeightSetView, WeightingService};
use ops_scoring::settings::InMemorySettingsStore;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

/// Categories listed by `kpis --top-field`.
const TOP_CATEGORY_LIMIT: usize = 5;

#[derive(Args, Debug, Default)]
pub(crate) struct WeightsArgs {
    /// Only print this category
    #[arg(long)]
    pub(crate) category: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Category whose weights score the candidates
    #[arg(long)]
    pub(crate) category: String,
    /// JSON file holding an array of `{ "id", "features" }` objects
    #[arg(long)]
    pub(crate) candidates: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct KpiArgs {
    /// CSV export with `timestamp` and `category` columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Window start (inclusive), RFC 3339 or YYYY-MM-DD
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) from: DateTime<Utc>,
    /// Window end (exclusive), RFC 3339 or YYYY-MM-DD
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) to: DateTime<Utc>,
    /// Numeric field used to rank categories by impact
    #[arg(long)]
    pub(crate) top_field: Option<String>,
}

pub(crate) fn run_weights(args: WeightsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = default_service(config.scoring)?;
    for line in weights_report(&service, args.category.as_deref())? {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = default_service(config.scoring)?;

    let raw = std::fs::read(&args.candidates)?;
    let candidates: Vec<CandidateInput> = serde_json::from_slice(&raw).map_err(|err| {
        AppError::InvalidRequest(format!(
            "{} is not a candidate array: {err}",
            args.candidates.display()
        ))
    })?;

    let ranked = service.rank(&args.category, candidates)?;
    println!("Ranking for {}", args.category);
    for (position, candidate) in ranked.iter().enumerate() {
        println!(
            "{:>3}. {} ({:.2})",
            position + 1,
            candidate.id,
            candidate.score.total
        );
        for component in &candidate.score.breakdown {
            println!(
                "       - {}: {:.2} x {:.2} = {:.2}",
                component.key, component.weight, component.feature, component.contribution
            );
        }
    }
    Ok(())
}

pub(crate) fn run_kpis(args: KpiArgs) -> Result<(), AppError> {
    let file = File::open(&args.csv)?;
    let records = import::parse_records(file)?;
    let window = TimeWindow::new(args.from, args.to);
    for line in kpi_report(&records, window, args.top_field.as_deref()) {
        println!("{line}");
    }
    Ok(())
}

fn default_service(
    config: ScoringConfig,
) -> Result<WeightingService<InMemorySettingsStore>, AppError> {
    Ok(WeightingService::new(
        CriterionRegistry::standard(),
        Arc::new(InMemorySettingsStore::new()),
        config,
    )?)
}

fn weights_report(
    service: &WeightingService<InMemorySettingsStore>,
    only: Option<&str>,
) -> Result<Vec<String>, AppError> {
    let categories: Vec<&str> = match only {
        Some(category) => vec![category],
        None => ordered_categories().to_vec(),
    };

    let mut lines = Vec::new();
    for category in categories {
        let view = service.view(category)?;
        lines.extend(render_view(&view));
    }
    Ok(lines)
}

fn render_view(view: &WeightSetView) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: total {:.1} / {:.1} ({})",
        view.category, view.total_weight, view.target, view.health_label
    )];
    for weight in &view.weights {
        lines.push(format!(
            "  - {} [{}]: {:.1} (range {:.0}-{:.0}, {:.1} available)",
            weight.label, weight.key, weight.weight, weight.min_weight, weight.max_weight,
            weight.available
        ));
    }
    for warning in &view.warnings {
        lines.push(format!("  ! {warning}"));
    }
    lines
}

fn kpi_report(records: &[KpiRecord], window: TimeWindow, top_field: Option<&str>) -> Vec<String> {
    let summary = AggregationReducer::new().aggregate_window(records, window);
    let mut lines = vec![format!(
        "KPI summary {} -> {} ({} records)",
        window.start.to_rfc3339(),
        window.end.to_rfc3339(),
        summary.record_count()
    )];

    if summary.is_empty() {
        lines.push("  no records in window".to_string());
        return lines;
    }

    lines.push("Counts:".to_string());
    lines.extend(
        summary
            .counts
            .iter()
            .map(|(category, count)| format!("  - {category}: {count}")),
    );
    if !summary.rates.is_empty() {
        lines.push("Rates:".to_string());
        lines.extend(
            summary
                .rates
                .iter()
                .map(|(flag, rate)| format!("  - {flag}: {:.1}%", rate * 100.0)),
        );
    }
    if !summary.totals.is_empty() {
        lines.push("Fields (total / average):".to_string());
        lines.extend(summary.totals.iter().map(|(field, total)| {
            format!("  - {field}: {total:.1} / {:.2}", summary.average(field))
        }));
    }

    if let Some(busiest) = most_frequent_category(records, window) {
        lines.push(format!(
            "Most frequent: {} ({} records, {} impact)",
            busiest.category,
            busiest.records,
            busiest.impact.label()
        ));
    }

    if let Some(field) = top_field {
        lines.push(format!("Top categories by {field}:"));
        for entry in top_categories(records, window, field, TOP_CATEGORY_LIMIT) {
            lines.push(format!(
                "  - {}: {:.0} ({} impact)",
                entry.category,
                entry.field_total,
                entry.impact.label()
            ));
        }
    }

    lines
}
