//! Output formatting for run reports

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::error::ContractResult;
use crate::runner::{Outcome, RunReport};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Render a report in the requested format
pub fn render(report: &RunReport, format: OutputFormat) -> ContractResult<String> {
    match format {
        OutputFormat::Table => Ok(render_table(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
    }
}

fn outcome_label(outcome: Outcome) -> String {
    match outcome {
        Outcome::Passed => "PASS".green().to_string(),
        Outcome::Failed => "FAIL".red().bold().to_string(),
        Outcome::Skipped => "SKIP".yellow().to_string(),
    }
}

fn render_table(report: &RunReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["Suite", "Case", "Result", "Time (ms)", "Detail"]);
    for suite in &report.suites {
        for result in &suite.results {
            table.add_row(vec![
                suite.suite.clone(),
                result.name.clone(),
                outcome_label(result.outcome),
                result.duration_ms.to_string(),
                result.error.clone().unwrap_or_default(),
            ]);
        }
    }

    format!(
        "{table}\n{} passed, {} failed, {} skipped against {} ({})",
        report.passed(),
        report.failed(),
        report.skipped(),
        report.base_uri,
        report.environment
    )
}

/// Print a report to stdout
pub fn print_report(report: &RunReport, format: OutputFormat) -> ContractResult<()> {
    println!("{}", render(report, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{SuiteResult, TestResult};
    use apitest_common::Environment;

    fn report() -> RunReport {
        RunReport {
            environment: Environment::Test,
            base_uri: "http://localhost".to_string(),
            started_at: chrono::Utc::now(),
            duration_ms: 12,
            suites: vec![SuiteResult {
                suite: "comments".to_string(),
                total: 2,
                passed: 1,
                failed: 0,
                skipped: 1,
                duration_ms: 12,
                results: vec![
                    TestResult {
                        name: "getAllComments".to_string(),
                        outcome: Outcome::Passed,
                        duration_ms: 10,
                        error: None,
                    },
                    TestResult {
                        name: "checkCommentsCount".to_string(),
                        outcome: Outcome::Skipped,
                        duration_ms: 0,
                        error: Some("prerequisite 'getAllComments' failed".to_string()),
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_table_lists_every_case() {
        colored::control::set_override(false);
        let out = render(&report(), OutputFormat::Table).unwrap();
        assert!(out.contains("getAllComments"));
        assert!(out.contains("checkCommentsCount"));
        assert!(out.contains("SKIP"));
        assert!(out.contains("1 passed, 0 failed, 1 skipped"));
    }

    #[test]
    fn test_json_round_trips_outcome() {
        let out = render(&report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["suites"][0]["results"][1]["outcome"], "skipped");
        assert_eq!(value["environment"], "test");
    }

    #[test]
    fn test_yaml_output() {
        let out = render(&report(), OutputFormat::Yaml).unwrap();
        assert!(out.contains("base_uri:"));
        assert!(out.contains("http://localhost"));
    }
}
