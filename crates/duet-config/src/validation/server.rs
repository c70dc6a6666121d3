use super::helpers::validate_range;
use crate::schema::RelayConfig;

pub(super) fn validate_server(errors: &mut Vec<String>, config: &RelayConfig) {
    if config.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".into());
    }
    if config.server.port == 0 {
        errors.push("server.port must not be 0".into());
    }
    validate_range(
        errors,
        "server.outbound_queue",
        config.server.outbound_queue,
        1,
        65536,
    );
}
