//! Canned GraphQL responses for unit tests.

use std::cell::RefCell;

use serde_json::Value;

use super::GraphQlClient;

struct Stub {
    operation: String,
    data: Value,
    used: bool,
}

/// A [`GraphQlClient`] that answers each registered operation once, in
/// registration order, and records every call.
#[derive(Default)]
pub(crate) struct StubClient {
    stubs: RefCell<Vec<Stub>>,
    calls: RefCell<Vec<(String, Value)>>,
}

impl StubClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer the next `operation` query with `data` (the `data` object, as JSON).
    pub(crate) fn register(&self, operation: &str, data: &str) {
        let data = serde_json::from_str(data)
            .unwrap_or_else(|e| panic!("invalid stub JSON for {operation}: {e}"));
        self.stubs.borrow_mut().push(Stub {
            operation: operation.to_string(),
            data,
            used: false,
        });
    }

    /// `(operation, variables)` for each query made so far.
    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }

    /// Panic unless every registered stub was consumed.
    pub(crate) fn verify(&self) {
        let unused: Vec<_> = self
            .stubs
            .borrow()
            .iter()
            .filter(|s| !s.used)
            .map(|s| s.operation.clone())
            .collect();
        assert!(unused.is_empty(), "unmatched stubs: {unused:?}");
    }
}

impl GraphQlClient for StubClient {
    fn query(
        &self,
        _host: &str,
        operation: &str,
        query: &str,
        variables: &Value,
    ) -> anyhow::Result<Value> {
        assert!(
            query.contains(&format!("query {operation}(")),
            "query text does not declare {operation}: {query}"
        );
        self.calls
            .borrow_mut()
            .push((operation.to_string(), variables.clone()));

        let mut stubs = self.stubs.borrow_mut();
        match stubs
            .iter_mut()
            .find(|s| !s.used && s.operation == operation)
        {
            Some(stub) => {
                stub.used = true;
                Ok(stub.data.clone())
            }
            None => anyhow::bail!("no stub registered for {operation}"),
        }
    }
}
