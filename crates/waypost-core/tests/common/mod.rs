#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use waypost_core::{
    Args, Config, DestinationId, EngineError, InlineContext, NavigationEngine, Navigator,
    SurfaceTag,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Push(DestinationId, Option<Args>),
    Pop,
    PopTo(DestinationId, bool),
}

/// Calls from every recorder sharing it, in execution order
pub type Log = Arc<Mutex<Vec<(SurfaceTag, Call)>>>;

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Engine that records every call into a shared log
pub struct Recorder {
    tag: SurfaceTag,
    log: Log,
    pop_to_result: bool,
}

impl Recorder {
    pub fn new(tag: &str, log: &Log) -> Arc<Self> {
        Arc::new(Self {
            tag: SurfaceTag::from(tag),
            log: log.clone(),
            pop_to_result: true,
        })
    }

    /// A recorder whose `pop_to` always reports nothing was popped
    pub fn missing_destinations(tag: &str, log: &Log) -> Arc<Self> {
        Arc::new(Self {
            tag: SurfaceTag::from(tag),
            log: log.clone(),
            pop_to_result: false,
        })
    }

    fn record(&self, call: Call) {
        self.log.lock().push((self.tag.clone(), call));
    }
}

impl NavigationEngine for Recorder {
    fn push(&self, destination: DestinationId, args: Option<&Args>) -> Result<(), EngineError> {
        self.record(Call::Push(destination, args.cloned()));
        Ok(())
    }

    fn pop(&self) -> bool {
        self.record(Call::Pop);
        true
    }

    fn pop_to(&self, destination: DestinationId, inclusive: bool) -> bool {
        self.record(Call::PopTo(destination, inclusive));
        self.pop_to_result
    }
}

/// Calls recorded for one surface
pub fn calls_for(log: &Log, tag: &str) -> Vec<Call> {
    log.lock()
        .iter()
        .filter(|(t, _)| t.as_str() == tag)
        .map(|(_, call)| call.clone())
        .collect()
}

pub fn inline_navigator() -> Navigator {
    Navigator::builder(Config::default())
        .context(Arc::new(InlineContext))
        .start()
        .unwrap()
}

pub fn push(id: u32) -> Call {
    Call::Push(DestinationId(id), None)
}
