//! Workflow and activity registry.
//!
//! Implementations are registered under their external names as boxed trait
//! objects; typed `async fn`s are adapted through [`WorkflowFn`] and
//! [`ActivityFn`], which handle payload (de)serialization.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use dashmap::DashMap;
use dyn_clone::DynClone;
use serde::{de::DeserializeOwned, Serialize};

use conveyor_activity::{ActivityContext, ActivityError};
use conveyor_workflow::{WorkflowContext, WorkflowError};

/// Workflow trait over raw payloads
pub trait Workflow: Send + Sync + DynClone {
    fn execute(
        &self,
        ctx: WorkflowContext,
        input: Option<Vec<u8>>,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>, WorkflowError>> + Send>>;
}

dyn_clone::clone_trait_object!(Workflow);

/// Activity trait over raw payloads
pub trait Activity: Send + Sync + DynClone {
    fn execute(
        &self,
        ctx: ActivityContext,
        input: Option<Vec<u8>>,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>, ActivityError>> + Send>>;
}

dyn_clone::clone_trait_object!(Activity);

/// Adapter turning a typed workflow function into a [`Workflow`]
pub struct WorkflowFn<F, Fut, I, O> {
    f: Arc<F>,
    _marker: PhantomData<fn(I) -> (Fut, O)>,
}

impl<F, Fut, I, O> WorkflowFn<F, Fut, I, O>
where
    F: Fn(WorkflowContext, I) -> Fut,
{
    pub fn new(f: F) -> Self {
        Self {
            f: Arc::new(f),
            _marker: PhantomData,
        }
    }
}

impl<F, Fut, I, O> Clone for WorkflowFn<F, Fut, I, O> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F, Fut, I, O> Workflow for WorkflowFn<F, Fut, I, O>
where
    F: Fn(WorkflowContext, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, WorkflowError>> + Send + 'static,
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
{
    fn execute(
        &self,
        ctx: WorkflowContext,
        input: Option<Vec<u8>>,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>, WorkflowError>> + Send>> {
        let f = self.f.clone();
        Box::pin(async move {
            let input_bytes = input.unwrap_or_else(|| b"null".to_vec());
            let typed: I = serde_json::from_slice(&input_bytes)
                .map_err(|e| WorkflowError::Serialization(e.to_string()))?;
            let output = f(ctx, typed).await?;
            let output_bytes = serde_json::to_vec(&output)
                .map_err(|e| WorkflowError::Serialization(e.to_string()))?;
            Ok(Some(output_bytes))
        })
    }
}

/// Adapter turning a typed activity function into an [`Activity`]
pub struct ActivityFn<F, Fut, I, O> {
    f: Arc<F>,
    _marker: PhantomData<fn(I) -> (Fut, O)>,
}

impl<F, Fut, I, O> ActivityFn<F, Fut, I, O>
where
    F: Fn(ActivityContext, I) -> Fut,
{
    pub fn new(f: F) -> Self {
        Self {
            f: Arc::new(f),
            _marker: PhantomData,
        }
    }
}

impl<F, Fut, I, O> Clone for ActivityFn<F, Fut, I, O> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F, Fut, I, O> Activity for ActivityFn<F, Fut, I, O>
where
    F: Fn(ActivityContext, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, ActivityError>> + Send + 'static,
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
{
    fn execute(
        &self,
        ctx: ActivityContext,
        input: Option<Vec<u8>>,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Vec<u8>>, ActivityError>> + Send>> {
        let f = self.f.clone();
        Box::pin(async move {
            let input_bytes = input.unwrap_or_else(|| b"null".to_vec());
            let typed: I = serde_json::from_slice(&input_bytes).map_err(|e| {
                ActivityError::ExecutionFailed(format!("input deserialization failed: {}", e))
            })?;
            let output = f(ctx, typed).await?;
            let output_bytes = serde_json::to_vec(&output).map_err(|e| {
                ActivityError::ExecutionFailed(format!("output serialization failed: {}", e))
            })?;
            Ok(Some(output_bytes))
        })
    }
}

/// Workflow registration options
#[derive(Debug, Clone)]
pub struct WorkflowRegisterOptions {
    /// External name the workflow is registered and triggered under
    pub name: String,
}

/// Activity registration options
#[derive(Debug, Clone)]
pub struct ActivityRegisterOptions {
    /// External name the activity is invoked under
    pub name: String,
    /// Send heartbeats automatically while the activity runs
    pub enable_auto_heartbeat: bool,
}

/// An activity together with its registration-time settings
#[derive(Clone)]
pub struct RegisteredActivity {
    pub activity: Box<dyn Activity>,
    pub auto_heartbeat: bool,
}

/// Registry of workflows and activities hosted by one worker
#[derive(Default)]
pub struct WorkerRegistry {
    workflows: DashMap<String, Box<dyn Workflow>>,
    activities: DashMap<String, RegisteredActivity>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_workflow(&self, options: WorkflowRegisterOptions, workflow: Box<dyn Workflow>) {
        self.workflows.insert(options.name, workflow);
    }

    pub fn register_activity(&self, options: ActivityRegisterOptions, activity: Box<dyn Activity>) {
        self.activities.insert(
            options.name,
            RegisteredActivity {
                activity,
                auto_heartbeat: options.enable_auto_heartbeat,
            },
        );
    }

    pub fn get_workflow(&self, name: &str) -> Option<Box<dyn Workflow>> {
        self.workflows.get(name).map(|entry| entry.value().clone())
    }

    pub fn get_activity(&self, name: &str) -> Option<RegisteredActivity> {
        self.activities.get(name).map(|entry| entry.value().clone())
    }

    pub fn registered_workflows(&self) -> Vec<String> {
        self.workflows.iter().map(|e| e.key().clone()).collect()
    }

    pub fn registered_activities(&self) -> Vec<String> {
        self.activities.iter().map(|e| e.key().clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty() && self.activities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_names_are_listed() {
        let registry = WorkerRegistry::new();
        assert!(registry.is_empty());

        registry.register_activity(
            ActivityRegisterOptions {
                name: "SimpleActivity".to_string(),
                enable_auto_heartbeat: true,
            },
            Box::new(ActivityFn::new(
                |_ctx: ActivityContext, value: String| async move {
                    Ok::<_, ActivityError>(value)
                },
            )),
        );

        assert!(!registry.is_empty());
        assert_eq!(registry.registered_activities(), vec!["SimpleActivity"]);
        let registered = registry.get_activity("SimpleActivity").unwrap();
        assert!(registered.auto_heartbeat);
        assert!(registry.get_activity("Other").is_none());
    }
}
