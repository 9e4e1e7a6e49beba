//! Message processing
//!
//! Runs a message through the TEA update function, dispatches the resulting
//! action and follows up with any chained message.

use crate::actions::{handle_action, ActionContext};
use crate::handler;
use crate::message::Message;
use crate::services::VersionStore;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<S>(state: &mut AppState, message: Message, actions: &mut ActionContext<S>)
where
    S: VersionStore + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, actions);
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
