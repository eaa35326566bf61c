//! The analyzer service: one loaded pack answering protocol requests.

use crate::PLUGIN_VERSION;
use regopack_domain::{
    AnalyzeError, PolicyPack, RuleEngine, evaluate, produce_diagnostics, stack_diagnostics,
    translate_properties,
};
use regopack_types::{
    AnalyzeRequest, AnalyzeResponse, AnalyzeStackRequest, AnalyzerInfo, ConfigureRequest,
    PluginInfo,
};

/// Everything a request needs: the engine, its compiled rule set and the
/// classified pack. Built once at startup and never mutated, so it can be
/// shared across concurrent requests behind an `Arc`.
pub struct PackContext<E: RuleEngine> {
    engine: E,
    handle: E::Handle,
    pack: PolicyPack,
}

impl<E: RuleEngine> PackContext<E> {
    pub fn new(engine: E, handle: E::Handle, pack: PolicyPack) -> Self {
        Self {
            engine,
            handle,
            pack,
        }
    }

    pub fn pack(&self) -> &PolicyPack {
        &self.pack
    }

    /// Evaluate every classified rule against one resource.
    pub fn analyze(&self, req: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalyzeError> {
        let input = translate_properties(&req.properties)?;
        let results = evaluate(&self.engine, &self.handle, &self.pack, &input)?;
        let diagnostics = produce_diagnostics(results, &self.pack.version, &req.urn);

        tracing::debug!(
            urn = %req.urn,
            resource_type = %req.resource_type,
            diagnostics = diagnostics.len(),
            "analyzed resource"
        );
        Ok(AnalyzeResponse { diagnostics })
    }

    /// Stack-level analysis reports nothing; resources were analyzed one by one.
    pub fn analyze_stack(&self, req: &AnalyzeStackRequest) -> AnalyzeResponse {
        tracing::debug!(resources = req.resources.len(), "stack analysis skipped");
        AnalyzeResponse {
            diagnostics: stack_diagnostics(),
        }
    }

    pub fn analyzer_info(&self) -> AnalyzerInfo {
        self.pack.to_info()
    }

    pub fn plugin_info(&self) -> PluginInfo {
        PluginInfo {
            version: PLUGIN_VERSION.to_string(),
        }
    }

    /// Accepted for protocol compatibility. Rules take no configuration.
    pub fn configure(&self, req: &ConfigureRequest) {
        tracing::debug!(
            policies = req.policy_config.len(),
            "ignoring policy configuration"
        );
    }

    pub fn cancel(&self) {
        tracing::debug!("cancel requested; nothing in flight to stop");
    }

    pub fn close(&self) {
        tracing::debug!("analyzer closed");
    }
}
