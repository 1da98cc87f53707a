use std::fs;
use std::path::Path;
use std::sync::Arc;

use ad_llm::{ScriptedGenerator, SimulatedGenerator};
use adflow::config::{AppConfig, EnvSecrets, Mode};
use adflow::{run_with, AppError, ConfigError};
use serde_json::Value;

const CSV: &str = "\
ad_id,campaign_name,spend,impressions,clicks,ctr,purchases,revenue,roas,date
A1,Men Basics,120.0,10000,30,0.3,2,120.0,1.0,2024-01-01
A2,Women Seamless,80.0,8000,72,0.9,5,160.0,2.0,2024-01-02
";

fn config_in(root: &Path, data: &str) -> AppConfig {
    fs::create_dir_all(root.join("prompts")).expect("prompts");
    fs::write(root.join("prompts/planner_prompt.md"), "Plan as JSON.").expect("planner");
    fs::write(root.join("prompts/creative_prompt.md"), "Creatives as JSON.").expect("creative");
    fs::write(root.join("ads.csv"), data).expect("csv");
    let yaml = format!("project:\n  mode: simulated\npaths:\n  data: {r}/ads.csv\n  reports: {r}/reports\n  logs: {r}/logs\n  prompts: {r}/prompts\n",
                       r = root.display());
    AppConfig::from_yaml(&yaml, EnvSecrets::default()).expect("config")
}

#[test]
fn simulated_run_writes_outputs_and_system_log() {
    let dir = tempfile::tempdir().expect("tmp");
    let cfg = config_in(dir.path(), CSV);
    let outcome = run_with(&cfg, "Analyze ROAS drop", Arc::new(SimulatedGenerator::new())).expect("run");
    assert!(outcome.is_completed());

    for file in adflow::app::OUTPUTS {
        assert!(cfg.paths.reports.join(file).exists(), "{file}");
    }
    let log = fs::read_to_string(cfg.paths.logs.join("system.log")).expect("log");
    let first: Value = serde_json::from_str(log.lines().next().expect("line")).expect("json");
    assert_eq!(first["agent"], "System");
    assert_eq!(first["event"], "initialized");
    assert_eq!(first["details"]["query"], "Analyze ROAS drop");
}

#[test]
fn stage_failure_is_not_a_setup_error() {
    let dir = tempfile::tempdir().expect("tmp");
    let cfg = config_in(dir.path(), "");
    let gen = Arc::new(ScriptedGenerator::new());
    let outcome = run_with(&cfg, "q", gen).expect("contained abort");
    assert!(!outcome.is_completed());
    assert!(cfg.paths.reports.join("plan.json").exists());
    assert!(!cfg.paths.reports.join("data_summary.json").exists());
    assert!(!cfg.paths.reports.join("report.md").exists());
}

#[test]
fn config_file_is_loaded_from_disk() {
    let dir = tempfile::tempdir().expect("tmp");
    let path = dir.path().join("config.yaml");
    fs::write(&path, "paths:\n  data: data/sample_ads.csv\nthresholds:\n  low_roas: 1.1\n").expect("yaml");
    let cfg = AppConfig::load_from(&path).expect("load");
    assert_eq!(cfg.project.mode, Mode::Simulated);
    assert_eq!(cfg.thresholds.low_roas, 1.1);

    let missing = AppConfig::load_from(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Read { .. }));
}

#[test]
fn live_mode_without_key_fails_before_any_stage() {
    let cfg = AppConfig::from_yaml("project:\n  mode: live\npaths:\n  data: x.csv\n", EnvSecrets::default());
    let err: AppError = cfg.unwrap_err().into();
    assert!(matches!(err, AppError::Config(ConfigError::MissingSecret(_))));
}
