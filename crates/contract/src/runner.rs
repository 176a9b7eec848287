//! Test runner that executes groups in prerequisite order

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use apitest_common::{Environment, EnvironmentConfig};

use crate::case::Suite;
use crate::error::{ContractError, ContractResult};
use crate::graph::CaseGraph;
use crate::spec::RequestSpec;

/// Outcome of a single case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Passed => write!(f, "passed"),
            Outcome::Failed => write!(f, "failed"),
            Outcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of running a single case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub outcome: Outcome,
    pub duration_ms: u64,
    /// Failure message, or the skip reason
    pub error: Option<String>,
}

/// Result of running one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub suite: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl SuiteResult {
    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn outcome(&self, name: &str) -> Option<Outcome> {
        self.get(name).map(|r| r.outcome)
    }
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub environment: Environment,
    pub base_uri: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub suites: Vec<SuiteResult>,
}

impl RunReport {
    /// True when no executed case failed; skipped cases do not count
    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    pub fn passed(&self) -> usize {
        self.suites.iter().map(|s| s.passed).sum()
    }

    pub fn failed(&self) -> usize {
        self.suites.iter().map(|s| s.failed).sum()
    }

    pub fn skipped(&self) -> usize {
        self.suites.iter().map(|s| s.skipped).sum()
    }
}

/// Contract test runner
#[derive(Debug)]
pub struct TestRunner {
    config: EnvironmentConfig,

    /// Output directory for results
    output_dir: PathBuf,
}

impl TestRunner {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            config,
            output_dir: PathBuf::from("test-results"),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Run every case of every group
    pub async fn run_all(&self, suites: &[Suite]) -> ContractResult<RunReport> {
        self.run_report(suites, None).await
    }

    /// Run one case by name, plus its prerequisites, from whichever group
    /// declares it
    pub async fn run_named(&self, suites: &[Suite], name: &str) -> ContractResult<RunReport> {
        let suite = suite_for_case(suites, name)?;
        self.run_report(std::slice::from_ref(suite), Some(name)).await
    }

    async fn run_report(&self, suites: &[Suite], only: Option<&str>) -> ContractResult<RunReport> {
        let started_at = Utc::now();
        let start = Instant::now();

        info!("Test Execution Started");
        info!(
            "Environment: {} ({})",
            self.config.environment, self.config.base_uri
        );

        let mut results = Vec::with_capacity(suites.len());
        for suite in suites {
            results.push(self.run_selected(suite, only).await?);
        }

        let report = RunReport {
            environment: self.config.environment,
            base_uri: self.config.base_uri.clone(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            suites: results,
        };

        info!(
            "Test Execution Completed: {} passed, {} failed, {} skipped ({} ms)",
            report.passed(),
            report.failed(),
            report.skipped(),
            report.duration_ms
        );
        Ok(report)
    }

    /// Run every case of one group
    pub async fn run_suite(&self, suite: &Suite) -> ContractResult<SuiteResult> {
        self.run_selected(suite, None).await
    }

    /// Run one case by name, together with the cases it depends on
    pub async fn run_case(&self, suite: &Suite, name: &str) -> ContractResult<SuiteResult> {
        self.run_selected(suite, Some(name)).await
    }

    async fn run_selected(&self, suite: &Suite, only: Option<&str>) -> ContractResult<SuiteResult> {
        let graph = CaseGraph::build(&suite.cases)?;
        let selected: Option<HashSet<usize>> = match only {
            Some(name) => Some(graph.with_ancestors(name)?),
            None => None,
        };

        // Each group gets its own spec built from the shared config
        let spec = RequestSpec::new(&self.config)?;

        let start = Instant::now();
        let mut outcomes: HashMap<usize, Outcome> = HashMap::new();
        let mut results = Vec::new();

        info!("Running suite '{}'...", suite.name);

        for idx in graph.execution_order() {
            if let Some(selected) = &selected {
                if !selected.contains(&idx) {
                    continue;
                }
            }

            let case = graph.case(idx);
            let blocked = graph
                .dependencies(idx)
                .find(|dep| outcomes.get(dep) != Some(&Outcome::Passed));

            let result = match blocked {
                Some(dep) => {
                    let prerequisite = graph.case(dep).name;
                    let state = outcomes.get(&dep).copied().unwrap_or(Outcome::Skipped);
                    warn!("- {} (skipped: prerequisite '{}' {})", case.name, prerequisite, state);
                    TestResult {
                        name: case.name.to_string(),
                        outcome: Outcome::Skipped,
                        duration_ms: 0,
                        error: Some(format!("prerequisite '{}' {}", prerequisite, state)),
                    }
                }
                None => {
                    debug!("Running case: {}", case.name);
                    let case_start = Instant::now();
                    let run = case.run(&spec).await;
                    let duration_ms = case_start.elapsed().as_millis() as u64;

                    match run {
                        Ok(()) => {
                            info!("✓ {} ({} ms)", case.name, duration_ms);
                            TestResult {
                                name: case.name.to_string(),
                                outcome: Outcome::Passed,
                                duration_ms,
                                error: None,
                            }
                        }
                        Err(e) => {
                            error!("✗ {} - {}", case.name, e);
                            TestResult {
                                name: case.name.to_string(),
                                outcome: Outcome::Failed,
                                duration_ms,
                                error: Some(e.to_string()),
                            }
                        }
                    }
                }
            };

            outcomes.insert(idx, result.outcome);
            results.push(result);
        }

        let count = |o: Outcome| results.iter().filter(|r| r.outcome == o).count();
        let (passed, failed, skipped) = (
            count(Outcome::Passed),
            count(Outcome::Failed),
            count(Outcome::Skipped),
        );
        let summary = SuiteResult {
            suite: suite.name.to_string(),
            total: results.len(),
            passed,
            failed,
            skipped,
            duration_ms: start.elapsed().as_millis() as u64,
            results,
        };

        info!(
            "Suite '{}': {} passed, {} failed, {} skipped ({} ms)",
            summary.suite, summary.passed, summary.failed, summary.skipped, summary.duration_ms
        );
        Ok(summary)
    }

    /// Write the run report to `test-results.json` in the output directory
    pub fn write_results(&self, report: &RunReport) -> ContractResult<PathBuf> {
        write_report(&self.output_dir, report)
    }
}

fn write_report(dir: &Path, report: &RunReport) -> ContractResult<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join("test-results.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

/// Find the single group that declares `name`
pub fn suite_for_case<'a>(suites: &'a [Suite], name: &str) -> ContractResult<&'a Suite> {
    suites
        .iter()
        .find(|s| s.contains(name))
        .ok_or_else(|| ContractError::CaseNotFound(name.to_string()))
}
