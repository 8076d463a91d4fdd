use super::{App, AppAction, AppCommand};

pub(super) fn handle_dialog_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::RequestReset => {
            app.ui.reset_prompt_open = true;
        }
        AppAction::ConfirmReset => {
            app.ui.reset_prompt_open = false;
            app.conversation().reset();
        }
        AppAction::CancelReset => {
            app.ui.reset_prompt_open = false;
        }
        AppAction::OpenSettings => app.settings().open(),
        AppAction::SaveSettings => app.settings().save(),
        AppAction::UseDemoMode => app.settings().use_demo_mode(),
        AppAction::CloseSettings => app.settings().close(),
        _ => unreachable!("non-dialog action routed to dialog handler"),
    }
    None
}
