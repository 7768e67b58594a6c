//! Per-caller session holding the latest analysis and optimization.
//!
//! At most one optimization is pending per session. A second request while
//! one is running is rejected, and a failed run leaves earlier results as
//! they were.

use crate::error::{PromptForgeError, Result};
use crate::knowledge::KnowledgeBase;
use crate::pipeline::{self, OptimizationResult};
use crate::scoring::{self, AnalysisResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct OptimizerSession {
    kb: Arc<KnowledgeBase>,
    pending: AtomicBool,
    analysis: Mutex<Option<AnalysisResult>>,
    result: Mutex<Option<OptimizationResult>>,
}

/// Clears the pending flag when dropped, including on early return.
struct PendingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PromptForgeError::OptimizationInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl OptimizerSession {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self {
            kb,
            pending: AtomicBool::new(false),
            analysis: Mutex::new(None),
            result: Mutex::new(None),
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Score `prompt` and remember the result as the latest analysis.
    pub fn analyze(&self, prompt: &str, tool_id: &str, framework_id: &str) -> AnalysisResult {
        let analysis = scoring::analyze(prompt, tool_id, framework_id, &self.kb);
        *lock(&self.analysis) = Some(analysis.clone());
        analysis
    }

    pub fn optimize(
        &self,
        prompt: &str,
        tool_id: &str,
        framework_id: &str,
    ) -> Result<OptimizationResult> {
        let _guard = PendingGuard::acquire(&self.pending)?;
        let result = pipeline::optimize(prompt, tool_id, framework_id, &self.kb)?;
        *lock(&self.result) = Some(result.clone());
        tracing::debug!(
            "Optimization complete: {} techniques, {}/{} checks passed",
            result.applied_techniques.len(),
            result.passed_checks(),
            result.validation.len()
        );
        Ok(result)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn latest_analysis(&self) -> Option<AnalysisResult> {
        lock(&self.analysis).clone()
    }

    pub fn latest_result(&self) -> Option<OptimizationResult> {
        lock(&self.result).clone()
    }
}
