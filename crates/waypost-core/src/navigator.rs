//! Navigator: the process-wide navigation hub
//!
//! Owns the dispatcher and, unless one is supplied, the thread every engine
//! call runs on. Hands out a [`Router`] per surface.

use std::sync::Arc;

use waypost_command::SurfaceTag;
use waypost_dispatch::{
    CommandObserver, Dispatcher, EngineHandle, ExecutionContext, Executor, NavigationEngine,
    ThreadContext,
};
use waypost_stack::DebouncedEngine;

use crate::config::Config;
use crate::observer::{ObserverSet, ScreenViewLogger};
use crate::router::Router;
use crate::Result;

pub struct NavigatorBuilder {
    config: Config,
    context: Option<Arc<dyn ExecutionContext>>,
    executor: Option<Arc<dyn Executor>>,
    observers: ObserverSet,
}

impl NavigatorBuilder {
    /// Run engine calls on `context` instead of a dedicated thread
    pub fn context(mut self, context: Arc<dyn ExecutionContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CommandObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Start the dispatcher. Must be called inside a tokio runtime.
    pub fn start(self) -> Result<Navigator> {
        let NavigatorBuilder {
            config,
            context,
            executor,
            mut observers,
        } = self;
        config.validate()?;

        let (context, thread) = match context {
            Some(context) => (context, None),
            None => {
                let thread = Arc::new(ThreadContext::spawn(config.context_thread_name.clone())?);
                let context: Arc<dyn ExecutionContext> = thread.clone();
                (context, Some(thread))
            }
        };

        if config.log_screen_views {
            observers.push(Arc::new(ScreenViewLogger));
        }

        let mut builder = Dispatcher::builder(context);
        if let Some(executor) = executor {
            builder = builder.executor(executor);
        }
        if !observers.is_empty() {
            builder = builder.observer(Arc::new(observers));
        }
        let dispatcher = builder.spawn()?;

        tracing::info!(
            context = thread.as_ref().map(|t| t.name()).unwrap_or("external"),
            debounce_ms = config.debounce_window_ms,
            "Navigator started"
        );

        Ok(Navigator {
            config,
            dispatcher,
            thread,
        })
    }
}

pub struct Navigator {
    config: Config,
    dispatcher: Dispatcher,
    /// Present when the navigator spawned its own execution thread
    thread: Option<Arc<ThreadContext>>,
}

impl Navigator {
    pub fn builder(config: Config) -> NavigatorBuilder {
        NavigatorBuilder {
            config,
            context: None,
            executor: None,
            observers: ObserverSet::new(),
        }
    }

    /// Start with a dedicated execution thread and the default executor
    pub fn start(config: Config) -> Result<Self> {
        Self::builder(config).start()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn router(&self, tag: impl Into<SurfaceTag>) -> Router {
        Router::new(tag, self.dispatcher.clone())
    }

    pub fn register_surface(&self, tag: impl Into<SurfaceTag>, engine: EngineHandle) -> Result<()> {
        let tag = tag.into();
        tracing::info!(surface = %tag, "Surface registered");
        self.dispatcher.register_surface(tag, engine)?;
        Ok(())
    }

    pub fn unregister_surface(&self, tag: impl Into<SurfaceTag>) -> Result<()> {
        let tag = tag.into();
        tracing::info!(surface = %tag, "Surface unregistered");
        self.dispatcher.unregister_surface(tag)?;
        Ok(())
    }

    pub async fn surface(&self, tag: impl Into<SurfaceTag>) -> Option<EngineHandle> {
        self.dispatcher.surface(tag).await
    }

    /// Wrap `engine` so repeated pushes inside the configured window are dropped
    pub fn debounce<E: NavigationEngine>(&self, engine: E) -> DebouncedEngine<E> {
        DebouncedEngine::new(engine, self.config.debounce_window())
    }

    /// Resolves once every message sent so far has been routed and, on the
    /// navigator's own thread, every resulting engine call has run
    pub async fn settled(&self) -> Result<()> {
        self.dispatcher.settled().await?;
        if let Some(thread) = &self.thread {
            thread.idle().await;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.dispatcher.is_running()
    }

    /// Queue the poison pill; commands submitted after this never run
    pub fn shutdown(&self) -> Result<()> {
        self.dispatcher.shutdown()?;
        Ok(())
    }

    /// Wait for the consumer to stop, then drain and stop the execution thread
    pub async fn join(&self) -> Result<()> {
        self.dispatcher.join().await?;

        if let Some(thread) = self.thread.clone() {
            tokio::task::spawn_blocking(move || thread.shutdown()).await?;
        }
        Ok(())
    }
}
