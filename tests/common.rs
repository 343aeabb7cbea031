use assert_cmd::cargo_bin_cmd;
use biogas_feasibility::example::Example;
use biogas_feasibility::input::load_model;
use biogas_feasibility::model::Model;
use tempfile::TempDir;

/// Run the program with default settings and check that it succeeds
#[allow(dead_code)]
pub fn assert_program_runs(args: &[&str]) {
    cargo_bin_cmd!("biogas-feasibility")
        .env("BIOGAS_FEASIBILITY_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .success();
}

/// Run the program with default settings and check that it fails
#[allow(dead_code)]
pub fn assert_program_fails(args: &[&str]) {
    cargo_bin_cmd!("biogas-feasibility")
        .env("BIOGAS_FEASIBILITY_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .failure();
}

/// Run the program with default settings and return what it wrote to stdout
#[allow(dead_code)]
pub fn get_program_stdout(args: &[&str]) -> String {
    let output = cargo_bin_cmd!("biogas-feasibility")
        .env("BIOGAS_FEASIBILITY_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());

    String::from_utf8(output.stdout).unwrap()
}

/// Extract a bundled example and load it.
///
/// The temporary directory must outlive any use of the model's path.
#[allow(dead_code)]
pub fn load_example(name: &str) -> (TempDir, Model) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    Example::from_name(name).unwrap().extract(&path).unwrap();
    let model = load_model(&path).unwrap();

    (tmp, model)
}
