//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# duet relay configuration
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "0.0.0.0"
# port = 3000
# outbound_queue = 256   # 1-65536, messages buffered per connection

[cors]
# Browser origin allowed to open the WebSocket, or "*" for any.
# Clients that send no Origin header are always accepted.
# allowed_origin = "http://localhost:5173"
# allowed_methods = ["GET", "POST"]   # must include GET
"##
    .to_string()
}
