use tracing::debug;

use super::{App, AppAction, AppCommand};

pub(super) fn handle_streaming_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitMessage { message } => submit_message(app, &message),
        AppAction::AppendResponseChunk { content, stream_id } => {
            if app.is_current_stream(stream_id) {
                app.conversation().append_to_response(&content);
            }
            None
        }
        AppAction::StreamCompleted { stream_id } => {
            if app.is_current_stream(stream_id) {
                app.conversation().finalize_response();
            }
            None
        }
        AppAction::StreamErrored { message, stream_id } => {
            if app.is_current_stream(stream_id) {
                app.conversation().fail_response(&message);
            } else {
                debug!(stream_id, "ignoring error from a retired stream");
            }
            None
        }
        _ => unreachable!("non-streaming action routed to streaming handler"),
    }
}

fn submit_message(app: &mut App, message: &str) -> Option<AppCommand> {
    match app.conversation().begin_reply(message) {
        Ok((stream_id, message)) => {
            app.ui.clear_input();
            Some(AppCommand::StartReply {
                stream_id,
                epoch: app.session.epoch(),
                message,
            })
        }
        Err(rejection) => {
            debug!(%rejection, "submission ignored");
            None
        }
    }
}
