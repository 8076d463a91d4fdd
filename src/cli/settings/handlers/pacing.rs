//! Handlers for the simulated streaming pace.

use std::str::FromStr;

use crate::cli::settings::{success_set, success_unset, SetContext, SettingError, SettingHandler};

fn parse_number<T: FromStr>(
    key: &'static str,
    args: &[String],
    example: &'static str,
) -> Result<T, SettingError> {
    let Some(input) = args.first() else {
        return Err(SettingError::MissingArgs {
            hint: "Specify a number:",
            example,
        });
    };
    input.trim().parse().map_err(|_| SettingError::InvalidValue {
        key,
        input: input.clone(),
        reason: "Expected a non-negative whole number",
    })
}

/// Handler for the `chunk-size` setting.
pub struct ChunkSizeHandler;

impl SettingHandler for ChunkSizeHandler {
    fn key(&self) -> &'static str {
        "chunk-size"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let size: usize = parse_number(self.key(), args, "orange-coach set chunk-size 24")?;
        if size == 0 {
            return Err(SettingError::InvalidValue {
                key: "chunk-size",
                input: size.to_string(),
                reason: "Fragments need at least one character",
            });
        }
        ctx.mutate(
            move |config| config.stream_chunk_size = Some(size),
            success_set("chunk-size", &size.to_string()),
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        ctx.mutate(
            |config| config.stream_chunk_size = None,
            success_unset("chunk-size"),
        )
    }
}

/// Handler for the `delay-ms` setting.
pub struct DelayMsHandler;

impl SettingHandler for DelayMsHandler {
    fn key(&self) -> &'static str {
        "delay-ms"
    }

    fn set(&self, args: &[String], ctx: &SetContext<'_>) -> Result<String, SettingError> {
        let delay: u64 = parse_number(self.key(), args, "orange-coach set delay-ms 15")?;
        ctx.mutate(
            move |config| config.stream_delay_ms = Some(delay),
            success_set("delay-ms", &delay.to_string()),
        )
    }

    fn unset(&self, ctx: &SetContext<'_>) -> Result<String, SettingError> {
        ctx.mutate(
            |config| config.stream_delay_ms = None,
            success_unset("delay-ms"),
        )
    }
}
