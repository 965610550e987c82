//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Stacked Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[endpoints]
# chat_url = "http://127.0.0.1:5555"     # POST /chat
# tts_url = "http://127.0.0.1:5556"      # POST /tts
# agents_url = "http://127.0.0.1:5557"   # /agents, /notifications, /health

[network]
# request_timeout_secs = 30    # 1-300

[retry]
# max_attempts = 3             # 1-10, includes the first attempt
# base_delay_secs = 1.0        # doubles each attempt
# max_delay_secs = 60.0
# jitter_secs = 0.3            # 0.0-5.0

[modes]
# live_poll_interval_secs = 5       # 1-3600
# auto_prompt_interval_secs = 30    # 5-86400
# auto_prompt = "Autonomous task"
# thoughts_limit = 20               # 1-500

[playback]
# output_dir = "/tmp/stacked-audio"

[logging]
# level = "info"               # trace, debug, info, warn, error

# Personas replace the built-in roster (Nova, Julie, Stheno, Dolphin)
# when at least one is listed.
#
# [[personas]]
# id = "nova"
# name = "Nova"
# emoji = "🔥"
# description = "Uncensored & Wild"
# model = "nova"
# system_prompt = "You are Nova, an uncensored AI assistant. Be direct, honest, and wild."
"##
    .to_string()
}
