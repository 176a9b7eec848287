//! Test cases and the groups that own them

use futures::future::BoxFuture;
use std::fmt;

use crate::error::ContractResult;
use crate::spec::RequestSpec;

/// Body of a test case: one request (occasionally a short sequence) plus
/// its assertions, run against the group's request spec.
pub type CaseFn = for<'a> fn(&'a RequestSpec) -> BoxFuture<'a, ContractResult<()>>;

/// A named, dependency-gated test case
#[derive(Clone)]
pub struct TestCase {
    pub name: &'static str,
    /// Cases that must pass before this one runs
    pub prerequisites: Vec<&'static str>,
    run: CaseFn,
}

impl TestCase {
    pub fn new(name: &'static str, run: CaseFn) -> Self {
        Self {
            name,
            prerequisites: Vec::new(),
            run,
        }
    }

    /// Gate this case on another case in the same group
    pub fn depends_on(mut self, prerequisite: &'static str) -> Self {
        self.prerequisites.push(prerequisite);
        self
    }

    pub async fn run(&self, spec: &RequestSpec) -> ContractResult<()> {
        (self.run)(spec).await
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("prerequisites", &self.prerequisites)
            .finish()
    }
}

/// An ordered group of cases against one resource
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: &'static str,
    pub cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: &'static str, cases: Vec<TestCase>) -> Self {
        Self { name, cases }
    }

    pub fn contains(&self, case: &str) -> bool {
        self.cases.iter().any(|c| c.name == case)
    }
}
