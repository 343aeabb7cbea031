//! Tests of the output files written for the bundled examples.
use biogas_feasibility::cli::RunOpts;
use biogas_feasibility::cli::example::handle_example_run_command;
use biogas_feasibility::settings::Settings;
use itertools::Itertools;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Run an example with default settings, writing to `output_dir`
fn run_example(name: &str, output_dir: &Path) {
    unsafe { env::set_var("BIOGAS_FEASIBILITY_LOG_LEVEL", "off") };

    let opts = RunOpts {
        output_dir: Some(output_dir.to_path_buf()),
        ..RunOpts::default()
    };
    handle_example_run_command(name, &opts, Some(Settings::default())).unwrap();
}

/// Read a CSV file into rows of fields, including the header
fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect_vec())
        .collect()
}

#[test]
fn simple_example_outputs() {
    let tmp = tempdir().unwrap();
    let output_dir = tmp.path().join("simple");
    run_example("simple", &output_dir);

    // Guarulhos has no energy potential, so it is reported rather than appraised
    let skipped = read_rows(&output_dir.join("skipped_entities.csv"));
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[1][0], "3518800");
    assert_eq!(skipped[1][2], "missing or unreadable value for daily_energy_potential");

    let feasibility = read_rows(&output_dir.join("feasibility.csv"));
    assert_eq!(feasibility.len(), 12);
    assert_eq!(feasibility[1][1], "São Paulo");

    let ranking = read_rows(&output_dir.join("priority_ranking.csv"));
    assert_eq!(
        ranking[0],
        [
            "Municipality",
            "Priority Score",
            "Payback (years)",
            "Investment (BRL)",
            "Revenue (BRL/year)",
            "CO2 Reduction (tons/year)"
        ]
    );
    assert_eq!(ranking.len(), 12);
    assert_eq!(ranking[1][0], "São Paulo");
    let last = ranking.last().unwrap();
    assert_eq!(last[0], "Americana");
    assert_eq!(last[2], "N/A");

    // Scores are sorted in descending order
    let scores = ranking[1..]
        .iter()
        .map(|row| row[1].parse::<f64>().unwrap())
        .collect_vec();
    assert!(scores.iter().tuple_windows().all(|(a, b)| a >= b));

    // Campinas is the only region with an entity which is not feasible
    let regions = read_rows(&output_dir.join("regions.csv"));
    assert_eq!(regions.len(), 9);
    let campinas = regions.last().unwrap();
    assert_eq!(campinas[0], "8");
    assert_eq!(campinas[1], "Campinas");
    assert_eq!(campinas[2], "4");
    assert_eq!(campinas[9].parse::<f64>().unwrap(), 75.0);

    let recommended = read_rows(&output_dir.join("recommended_regions.csv"));
    assert_eq!(recommended.len(), Settings::default().top_n_regions + 1);
    assert_eq!(recommended[1..], regions[1..recommended.len()]);
}

#[test]
fn simulated_regions_example_outputs() {
    let tmp = tempdir().unwrap();
    let output_dir = tmp.path().join("simulated_regions");
    run_example("simulated_regions", &output_dir);

    // Regions are ranked by the supplied priorities
    let regions = read_rows(&output_dir.join("regions.csv"));
    let ranked = regions[1..].iter().map(|row| row[1].as_str()).collect_vec();
    assert_eq!(ranked, ["Sul", "Norte", "Centro"]);

    // Eight entities shared round-robin between three regions
    let counts = regions[1..].iter().map(|row| row[2].as_str()).collect_vec();
    assert_eq!(counts, ["2", "3", "3"]);

    let skipped = read_rows(&output_dir.join("skipped_entities.csv"));
    assert_eq!(skipped, [["entity_id", "name", "reason"]]);

    let metadata = fs::read_to_string(output_dir.join("metadata.toml")).unwrap();
    assert!(metadata.contains("scenario = \"optimistic\""));
}
