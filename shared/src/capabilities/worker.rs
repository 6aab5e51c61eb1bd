use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerOperation {
    Register { script_url: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerOutput {
    Registered { scope: String },
    Failed { reason: String },
}

impl Operation for WorkerOperation {
    type Output = WorkerOutput;
}

/// Offline-caching service worker registration.
pub struct Worker<Ev> {
    context: CapabilityContext<WorkerOperation, Ev>,
}

impl<Ev> Capability<Ev> for Worker<Ev> {
    type Operation = WorkerOperation;
    type MappedSelf<MappedEv> = Worker<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Worker::new(self.context.map_event(f))
    }
}

impl<Ev> Worker<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<WorkerOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn register<F>(&self, script_url: impl Into<String>, make_event: F)
    where
        F: FnOnce(WorkerOutput) -> Ev + Send + 'static,
    {
        let operation = WorkerOperation::Register {
            script_url: script_url.into(),
        };
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(operation).await;
            ctx.update_app(make_event(output));
        });
    }
}
