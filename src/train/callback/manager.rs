//! Callback manager for dispatching events to multiple callbacks

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::error::Result;
use crate::io::Checkpointable;
use std::path::Path;

/// Manages multiple callbacks and dispatches events in registration order
#[derive(Default)]
pub struct CallbackManager {
    callbacks: Vec<Box<dyn TrainerCallback>>,
}

impl CallbackManager {
    /// Create new callback manager
    pub fn new() -> Self {
        Self { callbacks: Vec::new() }
    }

    /// Add a callback
    pub fn add<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    /// Add an already boxed callback
    pub fn add_boxed(&mut self, callback: Box<dyn TrainerCallback>) {
        self.callbacks.push(callback);
    }

    /// Check if no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Get number of callbacks
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Names of the registered callbacks, in dispatch order
    pub fn names(&self) -> Vec<&'static str> {
        self.callbacks.iter().map(|cb| cb.name()).collect()
    }

    /// Fire train begin event
    pub fn on_train_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        for cb in &mut self.callbacks {
            if cb.on_train_begin(ctx) == CallbackAction::Stop {
                return CallbackAction::Stop;
            }
        }
        CallbackAction::Continue
    }

    /// Fire train end event
    pub fn on_train_end(&mut self, ctx: &CallbackContext) {
        for cb in &mut self.callbacks {
            cb.on_train_end(ctx);
        }
    }

    /// Fire epoch begin event
    pub fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        for cb in &mut self.callbacks {
            match cb.on_epoch_begin(ctx) {
                CallbackAction::Stop => return CallbackAction::Stop,
                CallbackAction::SkipEpoch => return CallbackAction::SkipEpoch,
                CallbackAction::Continue => {}
            }
        }
        CallbackAction::Continue
    }

    /// Fire epoch end event
    pub fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        // Every callback sees the event; the first Stop wins
        let mut action = CallbackAction::Continue;
        for cb in &mut self.callbacks {
            if cb.on_epoch_end(ctx) == CallbackAction::Stop {
                action = CallbackAction::Stop;
            }
        }
        action
    }

    /// Fire step end event
    pub fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        for cb in &mut self.callbacks {
            match cb.on_step_end(ctx) {
                CallbackAction::Continue => {}
                other => return other,
            }
        }
        CallbackAction::Continue
    }

    /// Fire validation end event, propagating the first callback error
    pub fn on_validation_end(&mut self, ctx: &CallbackContext, model: &dyn Checkpointable) -> Result<CallbackAction> {
        let mut action = CallbackAction::Continue;
        for cb in &mut self.callbacks {
            if cb.on_validation_end(ctx, model)? == CallbackAction::Stop {
                action = CallbackAction::Stop;
            }
        }
        Ok(action)
    }

    /// Best checkpoint reported by any registered callback
    pub fn best_checkpoint(&self) -> Option<&Path> {
        self.callbacks.iter().find_map(|cb| cb.best_checkpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::callback::EarlyStopping;
    use std::sync::{Arc, Mutex};

    /// Records every event it sees
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
        tag: &'static str,
        stop_on_epoch_end: bool,
    }

    impl TrainerCallback for Recorder {
        fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
            self.events.lock().unwrap().push(format!("{}:epoch_end:{}", self.tag, ctx.epoch));
            if self.stop_on_epoch_end {
                CallbackAction::Stop
            } else {
                CallbackAction::Continue
            }
        }

        fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
            self.events.lock().unwrap().push(format!("{}:step_end:{}", self.tag, ctx.step));
            CallbackAction::Continue
        }

        fn name(&self) -> &'static str {
            self.tag
        }
    }

    #[test]
    fn test_callback_manager_dispatch() {
        let mut manager = CallbackManager::new();
        manager.add(EarlyStopping::new(1, 0.001));

        let mut ctx = CallbackContext { loss: 1.0, ..Default::default() };
        assert_eq!(manager.on_epoch_end(&ctx), CallbackAction::Continue);

        // No improvement with patience 1
        ctx.epoch = 1;
        assert_eq!(manager.on_epoch_end(&ctx), CallbackAction::Stop);
    }

    #[test]
    fn test_dispatch_order_and_stop_reaches_everyone() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut manager = CallbackManager::new();
        manager.add(Recorder { events: events.clone(), tag: "a", stop_on_epoch_end: true });
        manager.add_boxed(Box::new(Recorder { events: events.clone(), tag: "b", stop_on_epoch_end: false }));

        let ctx = CallbackContext { step: 2, ..Default::default() };
        assert_eq!(manager.on_step_end(&ctx), CallbackAction::Continue);
        assert_eq!(manager.on_epoch_end(&ctx), CallbackAction::Stop);

        let events = events.lock().unwrap();
        assert_eq!(*events, vec!["a:step_end:2", "b:step_end:2", "a:epoch_end:0", "b:epoch_end:0"]);
        assert_eq!(manager.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_manager() {
        let mut manager = CallbackManager::default();
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
        assert_eq!(manager.on_train_begin(&CallbackContext::default()), CallbackAction::Continue);
        assert!(manager.best_checkpoint().is_none());
    }
}
