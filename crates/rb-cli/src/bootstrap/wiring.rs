//! # Dependency wiring / 依赖装配
//!
//! Builds the infrastructure adapters from configuration and hands them to the
//! use cases. This is the only place that knows concrete adapter types.

use std::sync::Arc;

use anyhow::Context;
use rb_app::{AppDeps, NavigateResult, Scheduler, SchedulerConfig};
use rb_core::ports::{MessengerPort, ResultCachePort};
use rb_core::AppConfig;
use rb_infra::{
    CalculatorCredentials, CalculatorInvocation, InMemoryResultCache, JsonArtifactStore,
    ProcessJobRunner, SystemClock,
};
use tracing::info;

/// Use cases ready to be driven by a front end.
pub struct AppRuntime {
    pub scheduler: Arc<Scheduler>,
    pub navigate: NavigateResult,
    pub result_cache: Arc<dyn ResultCachePort>,
}

/// Wire the calculator runner, artifact store and result cache.
///
/// Creates the artifact directory when it does not exist yet.
pub fn wire_app(
    config: &AppConfig,
    credentials: CalculatorCredentials,
    messenger: Arc<dyn MessengerPort>,
) -> anyhow::Result<AppRuntime> {
    let calculator = &config.calculator;
    std::fs::create_dir_all(&calculator.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            calculator.output_dir.display()
        )
    })?;

    let artifacts = Arc::new(JsonArtifactStore::new(calculator.output_dir.clone()));
    let invocation = CalculatorInvocation::from_config(calculator, credentials);
    let job_runner = Arc::new(ProcessJobRunner::new(invocation, artifacts, calculator));
    let result_cache: Arc<dyn ResultCachePort> =
        Arc::new(InMemoryResultCache::new(&config.cache, Arc::new(SystemClock)));

    let deps = AppDeps {
        job_runner,
        messenger,
        result_cache: result_cache.clone(),
    };

    info!(
        program = %calculator.program,
        working_dir = %calculator.working_dir.display(),
        output_dir = %calculator.output_dir.display(),
        "Application wired"
    );

    Ok(AppRuntime {
        scheduler: Arc::new(Scheduler::new(&deps, SchedulerConfig::from(config))),
        navigate: NavigateResult::new(&deps),
        result_cache,
    })
}
