//! Test utilities and mocks for slipway unit tests.
//!
//! This module is only available in test builds. It provides a recording
//! [`ToolDriver`] so the probe engine can be exercised without a real
//! compiler, and so tests can assert on the exact trial source text the
//! engine asked to compile.

use std::cell::RefCell;

use anyhow::Result;

use crate::toolchain::{CompileInput, CompileMode, LinkInput, ToolDriver};

/// A scripted, recording compile/link primitive.
///
/// Verdicts are fixed up front; every compile captures the trial source
/// text (read back from the path the engine wrote) along with the input,
/// and every link captures its input. `fail_source_containing` flips the
/// compile verdict to "no" for trial sources containing a marker, which
/// lets one probe in a sequence fail while the rest succeed.
#[derive(Debug)]
pub struct FakeDriver {
    compile_result: bool,
    link_result: bool,
    fail_source_containing: Option<String>,
    compiles: RefCell<Vec<(String, CompileMode, CompileInput)>>,
    links: RefCell<Vec<LinkInput>>,
}

impl FakeDriver {
    /// A driver that accepts every trial.
    pub fn accepting() -> Self {
        FakeDriver {
            compile_result: true,
            link_result: true,
            fail_source_containing: None,
            compiles: RefCell::new(Vec::new()),
            links: RefCell::new(Vec::new()),
        }
    }

    /// A driver that rejects every trial.
    pub fn rejecting() -> Self {
        FakeDriver {
            compile_result: false,
            link_result: false,
            ..FakeDriver::accepting()
        }
    }

    /// Override the link verdict.
    pub fn with_link_result(mut self, ok: bool) -> Self {
        self.link_result = ok;
        self
    }

    /// Reject any compile whose trial source contains `marker`.
    pub fn failing_source_containing(mut self, marker: impl Into<String>) -> Self {
        self.fail_source_containing = Some(marker.into());
        self
    }

    /// Trial source texts in compile order.
    pub fn compiled_sources(&self) -> Vec<String> {
        self.compiles
            .borrow()
            .iter()
            .map(|(src, _, _)| src.clone())
            .collect()
    }

    /// Compile inputs in call order.
    pub fn compile_inputs(&self) -> Vec<CompileInput> {
        self.compiles
            .borrow()
            .iter()
            .map(|(_, _, input)| input.clone())
            .collect()
    }

    /// Link inputs in call order.
    pub fn link_inputs(&self) -> Vec<LinkInput> {
        self.links.borrow().clone()
    }

    /// Number of compile invocations.
    pub fn compile_count(&self) -> usize {
        self.compiles.borrow().len()
    }

    /// Number of link invocations.
    pub fn link_count(&self) -> usize {
        self.links.borrow().len()
    }
}

impl ToolDriver for FakeDriver {
    fn compile(&self, input: &CompileInput, mode: CompileMode) -> Result<bool> {
        let source = std::fs::read_to_string(&input.source).unwrap_or_default();
        let verdict = match &self.fail_source_containing {
            Some(marker) if source.contains(marker) => false,
            _ => self.compile_result,
        };
        self.compiles
            .borrow_mut()
            .push((source, mode, input.clone()));
        Ok(verdict)
    }

    fn link(&self, input: &LinkInput) -> Result<bool> {
        self.links.borrow_mut().push(input.clone());
        Ok(self.link_result)
    }
}
