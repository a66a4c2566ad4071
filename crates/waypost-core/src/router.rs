//! Per-surface navigation facade
//!
//! A [`Router`] is bound to one surface tag and turns calls into
//! [`Command`]s on the shared dispatcher. Navigation calls are fire and
//! forget: they return before anything runs, and a dispatcher that has
//! shut down only produces a log line.

use waypost_command::{Args, Command, DestinationId, ResultCode, ScreenInfo, SurfaceTag, Value};
use waypost_dispatch::Dispatcher;
use waypost_registry::ListenerHandle;

#[derive(Clone)]
pub struct Router {
    tag: SurfaceTag,
    dispatcher: Dispatcher,
}

impl Router {
    pub fn new(tag: impl Into<SurfaceTag>, dispatcher: Dispatcher) -> Self {
        Self {
            tag: tag.into(),
            dispatcher,
        }
    }

    pub fn tag(&self) -> &SurfaceTag {
        &self.tag
    }

    pub fn navigate_to(&self, destination: DestinationId, args: Option<Args>) {
        self.submit(Command::navigate(self.tag.clone(), destination, args));
    }

    /// Navigate and report the screen it lands on to observers
    pub fn navigate_to_screen(
        &self,
        destination: DestinationId,
        args: Option<Args>,
        screen: ScreenInfo,
    ) {
        self.submit(Command::navigate_screen(
            self.tag.clone(),
            destination,
            args,
            screen,
        ));
    }

    pub fn back(&self) {
        self.submit(Command::back(self.tag.clone()));
    }

    pub fn back_to(&self, destination: DestinationId, inclusive: bool) {
        self.submit(Command::back_to(self.tag.clone(), destination, inclusive));
    }

    /// Pop back to `destination` if it is on the stack, otherwise push it
    pub fn back_or_navigate_to(&self, destination: DestinationId, args: Option<Args>) {
        self.submit(Command::back_or_navigate(
            self.tag.clone(),
            destination,
            args,
        ));
    }

    /// Go back and hand `payload` to every listener registered for `code`.
    ///
    /// With a destination this pops back to it; otherwise it pops once.
    pub fn back_with_result(
        &self,
        code: impl Into<ResultCode>,
        payload: impl Into<Value>,
        destination: Option<DestinationId>,
        inclusive: bool,
    ) {
        self.submit(Command::back_with_result(
            self.tag.clone(),
            code,
            payload,
            destination,
            inclusive,
        ));
    }

    /// Returns false if this listener instance was already registered
    pub fn add_result_listener(
        &self,
        code: impl Into<ResultCode>,
        listener: ListenerHandle,
    ) -> bool {
        self.dispatcher.add_result_listener(code, listener)
    }

    /// Register a closure, returning the handle needed to remove it
    pub fn add_result_fn<F>(&self, code: impl Into<ResultCode>, f: F) -> ListenerHandle
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let listener = ListenerHandle::from_fn(f);
        self.dispatcher.add_result_listener(code, listener.clone());
        listener
    }

    pub fn remove_result_listener(
        &self,
        code: impl Into<ResultCode>,
        listener: &ListenerHandle,
    ) -> bool {
        self.dispatcher.remove_result_listener(code, listener)
    }

    /// Drop every listener for each code; true if any code had listeners
    pub fn remove_result_listeners<I, C>(&self, codes: I) -> bool
    where
        I: IntoIterator<Item = C>,
        C: Into<ResultCode>,
    {
        codes.into_iter().fold(false, |removed, code| {
            self.dispatcher.remove_result_listeners(code) | removed
        })
    }

    fn submit(&self, command: Command) {
        let kind = command.kind();
        if let Err(err) = self.dispatcher.submit(command) {
            tracing::warn!(
                surface = %self.tag,
                command = %kind,
                error = %err,
                "Navigation command dropped"
            );
        }
    }
}
