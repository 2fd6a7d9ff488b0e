//! Argument sequence for one additional instance of a service.

use crate::model::ServiceSpec;

pub const LOG_LEVEL_FLAG: &str = "--loglevel";
pub const PORT_FLAG: &str = "--port";
pub const IMPLEMENTATION_FLAG: &str = "--implementation";

/// Builds `[program, flags...]` for `spec`.
///
/// Order: the program (`path` joined with `executable`), the log level scoped to every logger
/// (`--loglevel *:<level>`), the port, the implementation variant, then one pair per option in
/// configuration order. Each flag appears at most once; an option naming a flag that was
/// already emitted is skipped.
pub fn build_arguments(spec: &ServiceSpec) -> Vec<String> {
    let mut args = vec![spec.program().to_string_lossy().into_owned()];
    let mut emitted: Vec<String> = Vec::new();

    let mut push = |flag: String, value: String| {
        if emitted.contains(&flag) {
            return;
        }
        args.push(flag.clone());
        args.push(value);
        emitted.push(flag);
    };

    if let Some(level) = spec.log_level() {
        push(LOG_LEVEL_FLAG.to_string(), format!("*:{level}"));
    }
    if let Some(port) = spec.port() {
        push(PORT_FLAG.to_string(), port.to_string());
    }
    if let Some(variant) = spec.implementation() {
        push(IMPLEMENTATION_FLAG.to_string(), variant.to_string());
    }
    for (key, value) in spec.options() {
        push(option_flag(key), value.clone());
    }

    args
}

fn option_flag(key: &str) -> String {
    if key.starts_with('-') {
        key.to_string()
    } else {
        format!("--{key}")
    }
}
