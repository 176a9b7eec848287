//! APITest Contract Suite
//!
//! Dependency-gated contract tests for a posts/comments REST fixture:
//! - Resolves the base URI for the selected environment
//! - Builds one request spec per resource group
//! - Runs each group's cases in prerequisite order, skipping cases whose
//!   prerequisite did not pass
//! - Reports every case individually
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  EnvironmentConfig (apitest-common)                         │
//! │    └── {env}Url from config/endpoints.toml                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── run_all(suites) -> RunReport                         │
//! │    ├── run_suite(suite) -> SuiteResult                      │
//! │    │     ├── CaseGraph::build(cases)  (validate, order)     │
//! │    │     ├── RequestSpec::new(config)                       │
//! │    │     └── case.run(spec) | skip on unmet prerequisite    │
//! │    └── write_results(report)                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Suites: posts (15 cases), comments (4 cases)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod case;
pub mod error;
pub mod expect;
pub mod graph;
pub mod output;
pub mod runner;
pub mod spec;
pub mod suites;

pub use case::{Suite, TestCase};
pub use error::{ContractError, ContractResult};
pub use runner::{Outcome, RunReport, SuiteResult, TestResult, TestRunner};
pub use spec::RequestSpec;
