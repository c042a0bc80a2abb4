pub mod callback;
pub mod document;
pub mod general_message;
pub mod message;

use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::bot::commands::Command;
use crate::bot::HandlerError;
use crate::state::AppState;

pub struct BotHandler {
    pub state: AppState,
}

impl BotHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Commands first, then plan uploads, then plain text (pending comments),
    /// and inline button presses.
    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        use teloxide::dispatching::UpdateFilterExt;

        let command_state = self.state.clone();
        let document_state = self.state.clone();
        let text_state = self.state.clone();
        let callback_state = self.state.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot, msg, cmd| {
                        let state = command_state.clone();
                        async move { message::command_handler(bot, msg, cmd, state).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| msg.document().is_some())
                    .endpoint(move |bot, msg| {
                        let state = document_state.clone();
                        async move { document::handle_document(bot, msg, state).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot, msg| {
                let state = text_state.clone();
                async move { general_message::handle_general_message(bot, msg, state).await }
            }))
            .branch(Update::filter_callback_query().endpoint(move |bot, q| {
                let state = callback_state.clone();
                async move { callback::callback_handler(bot, q, state).await }
            }))
    }
}
