//! Dispatcher handle
//!
//! Producers on any thread submit commands and lifecycle changes into one
//! unbounded FIFO; a single consumer task drains it, one message at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::{JoinError, JoinHandle};

use waypost_command::{Command, ResultCode, SurfaceTag};
use waypost_registry::{ListenerHandle, SharedResultRegistry};

use crate::consumer::{Consumer, Envelope};
use crate::context::ExecutionContext;
use crate::engine::EngineHandle;
use crate::error::DispatchError;
use crate::executor::{Executor, StandardExecutor};
use crate::observer::CommandObserver;
use crate::Result;

pub struct DispatcherBuilder {
    context: Arc<dyn ExecutionContext>,
    executor: Arc<dyn Executor>,
    observer: Option<Arc<dyn CommandObserver>>,
}

impl DispatcherBuilder {
    /// Replace the [`StandardExecutor`]
    pub fn executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CommandObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Start the consumer on the current tokio runtime
    pub fn spawn(self) -> Result<Dispatcher> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| DispatchError::NoRuntime)?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let results = SharedResultRegistry::new();
        let running = Arc::new(AtomicBool::new(true));

        let consumer = Consumer::new(
            results.clone(),
            self.context,
            self.executor,
            self.observer,
        );
        let handle = runtime.spawn(consumer.run(receiver, Arc::clone(&running)));

        tracing::info!("Dispatcher started");

        Ok(Dispatcher {
            sender,
            results,
            consumer: Arc::new(Mutex::new(ConsumerState::Running(handle))),
            running,
        })
    }
}

/// Consumer task, or how it ended (the panic message, if any)
enum ConsumerState {
    Running(JoinHandle<()>),
    Stopped(Option<String>),
}

/// Cloneable handle to the command queue and registries
pub struct Dispatcher {
    sender: mpsc::UnboundedSender<Envelope>,
    results: SharedResultRegistry,
    consumer: Arc<Mutex<ConsumerState>>,
    running: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn builder(context: Arc<dyn ExecutionContext>) -> DispatcherBuilder {
        DispatcherBuilder {
            context,
            executor: Arc::new(StandardExecutor),
            observer: None,
        }
    }

    /// Start a dispatcher with the standard executor and no observer
    pub fn spawn(context: Arc<dyn ExecutionContext>) -> Result<Self> {
        Self::builder(context).spawn()
    }

    /// Queue a command at the tail of the FIFO. Never blocks.
    pub fn submit(&self, command: Command) -> Result<()> {
        tracing::debug!(command = %command, "Command submitted");
        self.send(Envelope::Command(command))
    }

    /// Attach `engine` to `tag`, replacing any previous engine.
    ///
    /// Commands buffered for `tag` replay, in arrival order, as soon as the
    /// consumer reaches this registration.
    pub fn register_surface(
        &self,
        tag: impl Into<SurfaceTag>,
        engine: EngineHandle,
    ) -> Result<()> {
        let tag = tag.into();
        tracing::debug!(surface = %tag, "Registering surface");
        self.send(Envelope::Register { tag, engine })
    }

    /// Detach the engine for `tag`.
    ///
    /// Buffered commands for `tag` are kept; commands already handed to the
    /// execution context still run.
    pub fn unregister_surface(&self, tag: impl Into<SurfaceTag>) -> Result<()> {
        let tag = tag.into();
        tracing::debug!(surface = %tag, "Unregistering surface");
        self.send(Envelope::Unregister(tag))
    }

    /// Engine registered for `tag` once all earlier messages are handled
    pub async fn surface(&self, tag: impl Into<SurfaceTag>) -> Option<EngineHandle> {
        let (reply, answer) = oneshot::channel();
        self.send(Envelope::Lookup {
            tag: tag.into(),
            reply,
        })
        .ok()?;
        answer.await.ok().flatten()
    }

    /// Commands buffered for `tag` once all earlier messages are handled
    pub async fn pending(&self, tag: impl Into<SurfaceTag>) -> Vec<Command> {
        let (reply, answer) = oneshot::channel();
        if self
            .send(Envelope::Pending {
                tag: tag.into(),
                reply,
            })
            .is_err()
        {
            return Vec::new();
        }
        answer.await.unwrap_or_default()
    }

    /// Resolves once the consumer has handled every earlier message.
    ///
    /// Executions may still be queued on the execution context.
    pub async fn settled(&self) -> Result<()> {
        let (reply, answer) = oneshot::channel();
        self.send(Envelope::Settle(reply))?;
        answer.await.map_err(|_| DispatchError::Closed)
    }

    /// Returns false if the listener instance was already registered
    pub fn add_result_listener(
        &self,
        code: impl Into<ResultCode>,
        listener: ListenerHandle,
    ) -> bool {
        self.results.add(code.into(), listener)
    }

    pub fn remove_result_listener(
        &self,
        code: impl Into<ResultCode>,
        listener: &ListenerHandle,
    ) -> bool {
        self.results.remove(&code.into(), listener)
    }

    /// True iff at least one listener was registered for `code`
    pub fn remove_result_listeners(&self, code: impl Into<ResultCode>) -> bool {
        self.results.remove_all(&code.into())
    }

    pub fn results(&self) -> &SharedResultRegistry {
        &self.results
    }

    /// Queue the poison pill.
    ///
    /// Everything submitted before it is handled; the consumer then exits
    /// and anything submitted afterwards is never processed.
    pub fn shutdown(&self) -> Result<()> {
        tracing::info!("Dispatcher shutdown requested");
        self.send(Envelope::PoisonPill)
    }

    /// Wait for the consumer task to finish.
    ///
    /// Any number of clones may join; each waits for the consumer to stop and
    /// sees the same outcome.
    pub async fn join(&self) -> Result<()> {
        let mut state = self.consumer.lock().await;
        let panic = match &mut *state {
            ConsumerState::Stopped(panic) => panic.clone(),
            ConsumerState::Running(handle) => {
                let panic = consumer_panic(handle.await);
                *state = ConsumerState::Stopped(panic.clone());
                panic
            }
        };

        match panic {
            None => Ok(()),
            Some(message) => Err(DispatchError::ConsumerPanicked(message)),
        }
    }

    /// False once the consumer has exited for any reason
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn send(&self, envelope: Envelope) -> Result<()> {
        self.sender.send(envelope).map_err(|_| DispatchError::Closed)
    }
}

fn consumer_panic(outcome: std::result::Result<(), JoinError>) -> Option<String> {
    match outcome {
        Ok(()) => {
            tracing::info!("Dispatcher stopped");
            None
        }
        Err(err) if err.is_panic() => {
            let message = crate::panic_message(err.into_panic().as_ref());
            tracing::error!(panic = %message, "Command consumer panicked");
            Some(message)
        }
        Err(err) => {
            tracing::error!(error = %err, "Command consumer cancelled");
            Some(err.to_string())
        }
    }
}

impl Clone for Dispatcher {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            results: self.results.clone(),
            consumer: Arc::clone(&self.consumer),
            running: Arc::clone(&self.running),
        }
    }
}
