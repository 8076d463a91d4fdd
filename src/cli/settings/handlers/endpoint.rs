use crate::cli::settings::{success_set, success_unset, SetContext, SettingError, SettingHandler};
use crate::utils::url::is_http_url;

/// Handler for the `endpoint` setting.
pub struct EndpointHandler;

impl SettingHandler for EndpointHandler {
    fn key(&self) -> &'static str {
        "endpoint"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let Some(url) = args.first().map(|arg| arg.trim()).filter(|arg| !arg.is_empty()) else {
            return Err(SettingError::MissingArgs {
                hint: "To use a real backend, specify its URL:",
                example: "orange-coach set endpoint https://your-worker.example.com/chat",
            });
        };
        if !is_http_url(url) {
            return Err(SettingError::InvalidValue {
                key: "endpoint",
                input: url.to_string(),
                reason: "The endpoint must be a valid http:// or https:// URL with a host",
            });
        }

        let url = url.to_string();
        let message = success_set("endpoint", &url);
        ctx.mutate(move |config| config.set_endpoint(&url), message)
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        ctx.mutate(
            |config| config.backend_endpoint = None,
            format!("{} (demo mode)", success_unset("endpoint")),
        )
    }
}
