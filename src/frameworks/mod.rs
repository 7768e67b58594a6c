//! Stage 4: framework formatting.
//!
//! Each framework with a dedicated strategy synthesizes its own labeled
//! document from the original prompt and the intent profile. Frameworks
//! known to the catalog but without a strategy go through [`generic::Generic`].

pub mod ape;
pub mod costar;
pub mod crispe;
pub mod depth;
pub mod formatter;
pub mod generic;
pub mod risen;
pub mod rtf;
pub mod star;

use crate::error::{PromptForgeError, Result};
use crate::knowledge::{FrameworkDef, ToolDef};
use crate::pipeline::StageOutcome;
use crate::pipeline::intent::IntentProfile;
use formatter::{FormatContext, FrameworkFormatter};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

pub const STAGE: &str = "Framework Formatting";

/// Strategy map keyed by framework id, with the generic strategy as the
/// default entry.
pub struct FormatterRegistry {
    strategies: HashMap<String, Arc<dyn FrameworkFormatter>>,
    fallback: Arc<dyn FrameworkFormatter>,
}

static BUILTIN_STRATEGIES: Lazy<Vec<Arc<dyn FrameworkFormatter>>> = Lazy::new(|| {
    vec![
        Arc::new(crispe::Crispe),
        Arc::new(risen::Risen),
        Arc::new(costar::CoStar),
        Arc::new(rtf::Rtf),
        Arc::new(star::Star),
        Arc::new(ape::Ape),
        Arc::new(depth::Depth),
    ]
});

static DEFAULT_REGISTRY: Lazy<FormatterRegistry> = Lazy::new(FormatterRegistry::default);

impl Default for FormatterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for strategy in BUILTIN_STRATEGIES.iter() {
            registry.register(strategy.clone());
        }
        registry
    }
}

impl FormatterRegistry {
    /// Registry holding only the generic fallback.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
            fallback: Arc::new(generic::Generic),
        }
    }

    pub fn register(&mut self, strategy: Arc<dyn FrameworkFormatter>) {
        self.strategies.insert(strategy.id().to_uppercase(), strategy);
    }

    /// Strategy for `id`, matched case-insensitively, or the fallback.
    pub fn get(&self, id: &str) -> &Arc<dyn FrameworkFormatter> {
        self.strategies.get(&id.to_uppercase()).unwrap_or(&self.fallback)
    }

    pub fn has_dedicated(&self, id: &str) -> bool {
        self.strategies.contains_key(&id.to_uppercase())
    }

    /// Restructure `text` under the selected framework.
    ///
    /// An id missing from the catalog leaves the text untouched.
    pub fn apply(
        &self,
        text: &str,
        task: &str,
        framework_id: &str,
        framework: Option<&FrameworkDef>,
        intent: &IntentProfile,
        tool: Option<&ToolDef>,
    ) -> Result<StageOutcome> {
        let Some(framework) = framework else {
            tracing::warn!("Framework '{}' not in catalog, skipping formatting", framework_id);
            return Ok(StageOutcome::unchanged(text));
        };

        let strategy = self.get(framework_id);
        let ctx = FormatContext {
            text,
            task,
            framework,
            intent,
            tool,
        };
        let mut formatted = strategy.format(&ctx);
        if formatted.trim().is_empty() {
            return Err(PromptForgeError::pipeline(
                STAGE,
                format!("strategy '{}' produced no output", strategy.id()),
            ));
        }
        let carried = ctx.carried_context(&formatted);
        if !carried.is_empty() {
            formatted = format!("{}\n\n{}", carried.join("\n"), formatted);
        }
        tracing::debug!(
            "Formatted with '{}' strategy for {}, {} context lines carried",
            strategy.id(),
            framework_id,
            carried.len()
        );

        let mut outcome = StageOutcome::unchanged(&formatted);
        outcome.applied = true;
        outcome.technique(format!("framework:{}", framework_id));
        outcome.detail = Some(serde_json::json!({
            "framework": framework_id,
            "strategy": strategy.id(),
        }));
        Ok(outcome)
    }
}

/// Stage 4 through the built-in registry.
pub fn apply_framework(
    text: &str,
    task: &str,
    framework_id: &str,
    framework: Option<&FrameworkDef>,
    intent: &IntentProfile,
    tool: Option<&ToolDef>,
) -> Result<StageOutcome> {
    DEFAULT_REGISTRY.apply(text, task, framework_id, framework, intent, tool)
}

pub fn registry() -> &'static FormatterRegistry {
    &DEFAULT_REGISTRY
}
