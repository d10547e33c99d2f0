use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub live: LiveConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub enabled: bool,
    pub match_count: usize,
    pub tick_ms: u64,          // Interval between simulated score ticks
    pub ticks_per_quarter: u32, // Quarter advances after this many ticks
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    pub api_host: String,
    pub model: String,
    pub api_key: Option<String>,
    pub poll_secs: u64, // Interval between live scoreboard fetches
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_topic_id: Option<String>,
    pub discord_webhook_url: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            match_count: 3,
            tick_ms: 3000,
            ticks_per_quarter: 24,
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            api_host: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-2.0-flash".into(),
            api_key: None,
            poll_secs: 60,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_topic_id: None,
            discord_webhook_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            live: LiveConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (.env file) with defaults.
    ///
    /// Optional env vars:
    ///   GEMINI_API_KEY — enables the live scoreboard sync loop
    ///   GEMINI_MODEL — override the default model
    ///   LIVE_POLL_SECS — live fetch interval (default: 60)
    ///   SIM_ENABLED — set to "false"/"0" to disable the simulator
    ///   SIM_MATCH_COUNT, SIM_TICK_MS — simulator shape
    ///   TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID, TELEGRAM_TOPIC_ID — push alerts
    ///   DISCORD_WEBHOOK_URL — push alerts
    ///   RUST_LOG — log level (default: info)
    pub fn load_or_default() -> Self {
        // Load .env file if present
        let _ = dotenv::dotenv();

        let mut config = Self::default();

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() && key != "your_api_key_here" {
                config.live.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.is_empty() {
                config.live.model = model;
            }
        }
        if let Ok(secs) = std::env::var("LIVE_POLL_SECS") {
            if let Ok(v) = secs.parse() {
                config.live.poll_secs = v;
            }
        }

        if let Ok(enabled) = std::env::var("SIM_ENABLED") {
            config.simulation.enabled = !(enabled == "false" || enabled == "0");
        }
        if let Ok(count) = std::env::var("SIM_MATCH_COUNT") {
            if let Ok(v) = count.parse() {
                config.simulation.match_count = v;
            }
        }
        if let Ok(ms) = std::env::var("SIM_TICK_MS") {
            if let Ok(v) = ms.parse() {
                config.simulation.tick_ms = v;
            }
        }

        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            if !token.is_empty() && token != "your_bot_token" {
                config.telemetry.telegram_bot_token = Some(token);
            }
        }
        if let Ok(chat) = std::env::var("TELEGRAM_CHAT_ID") {
            if !chat.is_empty() && chat != "your_chat_id" {
                config.telemetry.telegram_chat_id = Some(chat);
            }
        }
        if let Ok(topic) = std::env::var("TELEGRAM_TOPIC_ID") {
            if !topic.is_empty() {
                config.telemetry.telegram_topic_id = Some(topic);
            }
        }
        if let Ok(url) = std::env::var("DISCORD_WEBHOOK_URL") {
            if !url.is_empty() && url != "your_webhook_url" {
                config.telemetry.discord_webhook_url = Some(url);
            }
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.telemetry.log_level = level;
        }

        if config.live.api_key.is_none() {
            tracing::warn!("No GEMINI_API_KEY set — live score sync disabled");
        }

        config
    }

    /// True when the live scoreboard sync loop can run.
    pub fn live_enabled(&self) -> bool {
        self.live.api_key.is_some()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.simulation.match_count > 0,
            "SIM_MATCH_COUNT must be at least 1"
        );
        anyhow::ensure!(self.simulation.tick_ms >= 100, "SIM_TICK_MS must be >= 100");
        anyhow::ensure!(
            self.simulation.ticks_per_quarter > 0,
            "ticks_per_quarter must be at least 1"
        );
        anyhow::ensure!(self.live.poll_secs >= 10, "LIVE_POLL_SECS must be >= 10");
        anyhow::ensure!(
            self.simulation.enabled || self.live_enabled(),
            "Nothing to do: simulator disabled and no GEMINI_API_KEY set"
        );
        Ok(())
    }
}
