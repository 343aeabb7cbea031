//! The module responsible for writing output data to disk.
use crate::appraisal::Appraisal;
use crate::appraisal::classify::{FeasibilityCategory, RiskCategory};
use crate::entity::EntityID;
use crate::portfolio::PortfolioSummary;
use crate::regional::{RegionID, RegionalSummary, recommend};
use crate::scenario::ScenarioType;
use anyhow::{Context, Result, ensure};
use csv::{Writer, WriterBuilder};
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;
use metadata::write_metadata;

/// The output file name for feasibility records
const FEASIBILITY_FILE_NAME: &str = "feasibility.csv";

/// The output file name for the exported priority ranking
const PRIORITY_RANKING_FILE_NAME: &str = "priority_ranking.csv";

/// The output file name for regional summaries
const REGIONS_FILE_NAME: &str = "regions.csv";

/// The output file name for the recommended regions
const RECOMMENDED_REGIONS_FILE_NAME: &str = "recommended_regions.csv";

/// The output file name for entities which were skipped
const SKIPPED_ENTITIES_FILE_NAME: &str = "skipped_entities.csv";

/// The output file name for the scenario comparison
const SCENARIO_COMPARISON_FILE_NAME: &str = "scenario_comparison.csv";

/// Marker written in place of an undefined payback period
pub const PAYBACK_UNDEFINED: &str = "N/A";

/// Get the default output directory for the model specified.
pub fn get_output_dir(model_dir: &Path, results_root: PathBuf) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([results_root, model_name.into()].iter().collect())
}

/// Create a new output directory for the model, optionally overwriting existing data.
///
/// # Arguments
///
/// * `output_dir` - The output directory to create/overwrite
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// True if the output dir contained existing data that was deleted, false if not, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir).context("Could not delete folder")?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Serialise a payback period, writing [`PAYBACK_UNDEFINED`] if it is undefined
fn serialize_payback<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(payback) => serializer.serialize_f64(*payback),
        None => serializer.serialize_str(PAYBACK_UNDEFINED),
    }
}

/// Round a value to two decimal places for display
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Represents a row in the feasibility output CSV file
#[derive(Serialize)]
struct FeasibilityRow<'a> {
    entity_id: &'a EntityID,
    name: &'a str,
    population: u64,
    commodity_revenue: f64,
    electricity_revenue: f64,
    carbon_revenue: f64,
    total_revenue: f64,
    investment: f64,
    operating_cost: f64,
    net_profit: f64,
    #[serde(serialize_with = "serialize_payback")]
    payback_years: Option<f64>,
    npv: f64,
    co2_reduction: f64,
    feasibility: FeasibilityCategory,
    risk: RiskCategory,
    economic_score: f64,
    environmental_score: f64,
    composite_score: f64,
}

/// Represents a row in the exported priority ranking, which has fixed column names
#[derive(Serialize)]
struct PriorityExportRow<'a> {
    #[serde(rename = "Municipality")]
    municipality: &'a str,
    #[serde(rename = "Priority Score")]
    priority_score: f64,
    #[serde(rename = "Payback (years)", serialize_with = "serialize_payback")]
    payback_years: Option<f64>,
    #[serde(rename = "Investment (BRL)")]
    investment: f64,
    #[serde(rename = "Revenue (BRL/year)")]
    revenue: f64,
    #[serde(rename = "CO2 Reduction (tons/year)")]
    co2_reduction: f64,
}

/// Represents a row in the regions output CSV file
#[derive(Serialize)]
struct RegionRow<'a> {
    rank: usize,
    region_id: &'a RegionID,
    entity_count: usize,
    total_investment: f64,
    total_revenue: f64,
    #[serde(serialize_with = "serialize_payback")]
    mean_payback_years: Option<f64>,
    feasible_count: usize,
    total_co2_reduction: f64,
    total_npv: f64,
    development_priority: f64,
}

/// Represents a row in the skipped entities output CSV file
#[derive(Serialize)]
struct SkippedEntityRow<'a> {
    entity_id: &'a EntityID,
    name: &'a str,
    reason: &'a str,
}

/// Represents a row in the scenario comparison output CSV file
#[derive(Serialize)]
struct ScenarioComparisonRow {
    scenario: ScenarioType,
    entity_count: usize,
    skipped_count: usize,
    total_investment: f64,
    total_revenue: f64,
    total_npv: f64,
    total_co2_reduction: f64,
    #[serde(serialize_with = "serialize_payback")]
    mean_payback_years: Option<f64>,
    highly_feasible: usize,
    feasible: usize,
    marginal: usize,
    not_feasible: usize,
}

/// Create a CSV writer for a file in the output directory
fn new_csv_writer(output_path: &Path, file_name: &str) -> Result<Writer<fs::File>> {
    let file_path = output_path.join(file_name);
    Writer::from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))
}

/// Write the feasibility records, in input order
fn write_feasibility(output_path: &Path, appraisal: &Appraisal) -> Result<()> {
    let mut writer = new_csv_writer(output_path, FEASIBILITY_FILE_NAME)?;
    for record in &appraisal.records {
        let financials = &record.financials;
        writer.serialize(FeasibilityRow {
            entity_id: &record.entity_id,
            name: &record.name,
            population: record.population,
            commodity_revenue: financials.revenue.commodity,
            electricity_revenue: financials.revenue.electricity,
            carbon_revenue: financials.revenue.carbon,
            total_revenue: financials.revenue.total,
            investment: financials.investment,
            operating_cost: financials.operating_cost,
            net_profit: financials.net_profit,
            payback_years: financials.payback_years,
            npv: financials.npv,
            co2_reduction: financials.co2_reduction,
            feasibility: record.feasibility,
            risk: record.risk,
            economic_score: record.scores.economic,
            environmental_score: record.scores.environmental,
            composite_score: record.scores.composite,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the tabular export of entities, highest priority first
fn write_priority_ranking(output_path: &Path, appraisal: &Appraisal) -> Result<()> {
    let mut writer = new_csv_writer(output_path, PRIORITY_RANKING_FILE_NAME)?;
    for record in appraisal.records_by_priority() {
        let financials = &record.financials;
        writer.serialize(PriorityExportRow {
            municipality: &record.name,
            priority_score: round2(record.scores.composite),
            payback_years: financials.payback_years.map(round2),
            investment: round2(financials.investment),
            revenue: round2(financials.revenue.total),
            co2_reduction: round2(financials.co2_reduction),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write regional summaries in ranked order
fn write_regions<'a, I>(output_path: &Path, file_name: &str, regions: I) -> Result<()>
where
    I: IntoIterator<Item = &'a RegionalSummary>,
{
    let mut writer = new_csv_writer(output_path, file_name)?;
    for (index, summary) in regions.into_iter().enumerate() {
        writer.serialize(RegionRow {
            rank: index + 1,
            region_id: &summary.region_id,
            entity_count: summary.entity_count,
            total_investment: summary.total_investment,
            total_revenue: summary.total_revenue,
            mean_payback_years: summary.mean_payback_years,
            feasible_count: summary.feasible_count,
            total_co2_reduction: summary.total_co2_reduction,
            total_npv: summary.total_npv,
            development_priority: summary.development_priority,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the entities which were skipped. The header is always written.
fn write_skipped(output_path: &Path, appraisal: &Appraisal) -> Result<()> {
    let file_path = output_path.join(SKIPPED_ENTITIES_FILE_NAME);
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(&file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    writer.write_record(["entity_id", "name", "reason"])?;
    for skipped in &appraisal.skipped {
        writer.serialize(SkippedEntityRow {
            entity_id: &skipped.id,
            name: &skipped.name,
            reason: &skipped.reason,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write all the results of an appraisal to the output directory.
///
/// # Arguments
///
/// * `output_path` - Folder in which to write files
/// * `model_path` - Path to the model which was appraised (recorded in the metadata)
/// * `appraisal` - The results to write
/// * `top_n_regions` - How many regions to write as recommendations
pub fn write_appraisal(
    output_path: &Path,
    model_path: &Path,
    appraisal: &Appraisal,
    top_n_regions: usize,
) -> Result<()> {
    write_metadata(output_path, model_path, Some(appraisal))?;
    write_feasibility(output_path, appraisal)?;
    write_priority_ranking(output_path, appraisal)?;
    write_regions(output_path, REGIONS_FILE_NAME, &appraisal.regions)?;
    write_regions(
        output_path,
        RECOMMENDED_REGIONS_FILE_NAME,
        recommend(&appraisal.regions, top_n_regions),
    )?;
    write_skipped(output_path, appraisal)?;

    Ok(())
}

/// Write a comparison of portfolio summaries across scenarios
pub fn write_scenario_comparison(
    output_path: &Path,
    model_path: &Path,
    summaries: &[PortfolioSummary],
) -> Result<()> {
    write_metadata(output_path, model_path, None)?;
    let mut writer = new_csv_writer(output_path, SCENARIO_COMPARISON_FILE_NAME)?;
    for summary in summaries {
        writer.serialize(ScenarioComparisonRow {
            scenario: summary.scenario,
            entity_count: summary.entity_count,
            skipped_count: summary.skipped_count,
            total_investment: summary.total_investment,
            total_revenue: summary.total_revenue,
            total_npv: summary.total_npv,
            total_co2_reduction: summary.total_co2_reduction,
            mean_payback_years: summary.mean_payback_years,
            highly_feasible: summary.count(FeasibilityCategory::HighlyFeasible),
            feasible: summary.count(FeasibilityCategory::Feasible),
            marginal: summary.count(FeasibilityCategory::Marginal),
            not_feasible: summary.count(FeasibilityCategory::NotFeasible),
        })?;
    }
    writer.flush()?;

    Ok(())
}
