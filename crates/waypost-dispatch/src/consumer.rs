//! The single command consumer
//!
//! Owns the surface registry and the pending buffer outright; every
//! mutation arrives as a message on the dispatcher channel, so the three
//! maps never need a lock between them and a registration's buffer flush
//! cannot race a concurrent submit.

use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use waypost_command::{Command, SurfaceTag};
use waypost_registry::{PendingBuffer, SharedResultRegistry, SurfaceRegistry, SurfaceState};

use crate::context::ExecutionContext;
use crate::engine::{EngineHandle, NavigationEngine};
use crate::executor::Executor;
use crate::observer::{CommandObserver, Disposition};
use crate::panic_message;

/// Messages on the dispatcher channel
pub(crate) enum Envelope {
    Command(Command),
    Register {
        tag: SurfaceTag,
        engine: EngineHandle,
    },
    Unregister(SurfaceTag),
    Lookup {
        tag: SurfaceTag,
        reply: oneshot::Sender<Option<EngineHandle>>,
    },
    Pending {
        tag: SurfaceTag,
        reply: oneshot::Sender<Vec<Command>>,
    },
    /// Answered once every earlier message has been handled
    Settle(oneshot::Sender<()>),
    /// Stops the consumer; anything queued behind it is never handled
    PoisonPill,
}

pub(crate) struct Consumer {
    surfaces: SurfaceRegistry<EngineHandle>,
    pending: PendingBuffer,
    results: SharedResultRegistry,
    context: Arc<dyn ExecutionContext>,
    executor: Arc<dyn Executor>,
    observer: Option<Arc<dyn CommandObserver>>,
}

/// Clears the running flag however the consumer exits, panics included
pub(crate) struct RunningGuard(pub(crate) Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Consumer {
    pub(crate) fn new(
        results: SharedResultRegistry,
        context: Arc<dyn ExecutionContext>,
        executor: Arc<dyn Executor>,
        observer: Option<Arc<dyn CommandObserver>>,
    ) -> Self {
        Self {
            surfaces: SurfaceRegistry::new(),
            pending: PendingBuffer::new(),
            results,
            context,
            executor,
            observer,
        }
    }

    pub(crate) async fn run(
        mut self,
        mut receiver: mpsc::UnboundedReceiver<Envelope>,
        running: Arc<AtomicBool>,
    ) {
        let _guard = RunningGuard(running);
        tracing::debug!("Command consumer started");

        while let Some(envelope) = receiver.recv().await {
            let flow = panic::catch_unwind(AssertUnwindSafe(|| self.handle(envelope)));
            match flow {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => {
                    tracing::debug!(
                        buffered = self.pending.total(),
                        "Poison pill received, command consumer stopping"
                    );
                    return;
                }
                Err(panic) => {
                    tracing::error!(
                        panic = %panic_message(panic.as_ref()),
                        "Message handling panicked, command consumer continuing"
                    );
                }
            }
        }

        tracing::debug!("Dispatcher dropped, command consumer stopping");
    }

    fn handle(&mut self, envelope: Envelope) -> ControlFlow<()> {
        match envelope {
            Envelope::Command(command) => self.process(command),
            Envelope::Register { tag, engine } => self.register(tag, engine),
            Envelope::Unregister(tag) => {
                if self.surfaces.unregister(&tag).is_some() {
                    tracing::debug!(
                        surface = %tag,
                        state = %SurfaceState::Unregistered,
                        "Surface state changed"
                    );
                }
            }
            Envelope::Lookup { tag, reply } => {
                let _ = reply.send(self.surfaces.get(&tag).cloned());
            }
            Envelope::Pending { tag, reply } => {
                let _ = reply.send(self.pending.pending(&tag).to_vec());
            }
            Envelope::Settle(reply) => {
                let _ = reply.send(());
            }
            Envelope::PoisonPill => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Attach the engine, then replay the surface's buffered commands.
    ///
    /// Replay happens before the next channel message is read. Anything still
    /// queued for this surface was submitted after the buffered commands, so
    /// this keeps per-surface submission order.
    fn register(&mut self, tag: SurfaceTag, engine: EngineHandle) {
        let previous = self.surfaces.state(&tag);
        self.surfaces.register(tag.clone(), engine);
        tracing::debug!(
            surface = %tag,
            from = %previous,
            state = %SurfaceState::Registered,
            "Surface state changed"
        );

        let replay = self.pending.take(&tag);
        if replay.is_empty() {
            return;
        }

        tracing::debug!(surface = %tag, count = replay.len(), "Replaying pending commands");
        for command in replay {
            self.process(command);
        }
    }

    fn process(&mut self, command: Command) {
        let tag = command.surface();
        let engine = if self.surfaces.state(tag).buffers_commands() {
            None
        } else {
            self.surfaces.get(tag).cloned()
        };

        match engine {
            Some(engine) => {
                self.observe(&command, Disposition::Dispatched);
                self.dispatch(command, engine);
            }
            None => {
                self.observe(&command, Disposition::Buffered);
                self.pending.push(command);
            }
        }
    }

    fn observe(&self, command: &Command, disposition: Disposition) {
        let Some(observer) = &self.observer else {
            return;
        };
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| observer.on_command(command, disposition)));
        if let Err(panic) = outcome {
            tracing::error!(
                command = %command,
                panic = %panic_message(panic.as_ref()),
                "Command observer panicked"
            );
        }
    }

    /// Post the execution to the context and return without waiting
    fn dispatch(&self, command: Command, engine: EngineHandle) {
        let executor = Arc::clone(&self.executor);
        let results = self.results.clone();
        let observer = self.observer.clone();

        self.context.post(Box::new(move || {
            execute(
                executor.as_ref(),
                &command,
                engine.as_ref(),
                &results,
                observer.as_deref(),
            );
        }));
    }
}

/// Runs on the execution context. Never lets a failure escape.
fn execute(
    executor: &dyn Executor,
    command: &Command,
    engine: &dyn NavigationEngine,
    results: &SharedResultRegistry,
    observer: Option<&dyn CommandObserver>,
) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        tracing::debug!(command = %command, "Executing command");

        match executor.execute(command, engine) {
            Ok(executed) => {
                tracing::trace!(
                    command = %command,
                    popped = executed.popped,
                    pushed = executed.pushed,
                    "Command executed"
                );
                deliver_result(command, results, observer);
            }
            Err(err) => {
                tracing::error!(
                    command = %command,
                    error = %err,
                    "Navigation rejected by engine"
                );
            }
        }
    }));

    if let Err(panic) = outcome {
        tracing::error!(
            command = %command,
            panic = %panic_message(panic.as_ref()),
            "Command execution panicked"
        );
    }
}

fn deliver_result(
    command: &Command,
    results: &SharedResultRegistry,
    observer: Option<&dyn CommandObserver>,
) {
    let Command::BackWithResult {
        result_code,
        payload,
        ..
    } = command
    else {
        return;
    };

    let delivered = results.deliver(result_code, payload);
    if delivered > 0 {
        tracing::debug!(result_code = %result_code, listeners = delivered, "Result delivered");
        return;
    }

    tracing::warn!(
        result_code = %result_code,
        payload = %payload,
        "No result listener registered, result dropped"
    );
    if let Some(observer) = observer {
        observer.on_result_dropped(command, payload);
    }
}
