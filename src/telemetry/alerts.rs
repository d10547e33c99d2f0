use crate::config::TelemetryConfig;
use crate::models::signal::{SignalEvent, SignalKind};
use anyhow::Result;
use tracing::{error, info};

/// Delivers strategy signals via Telegram or Discord webhooks.
///
/// Delivery is best-effort: a transport failure is logged and never
/// propagated back toward the engine.
pub struct AlertManager {
    config: TelemetryConfig,
    http: reqwest::Client,
}

impl AlertManager {
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Push one engine signal to every configured transport.
    pub async fn dispatch(&self, event: &SignalEvent) {
        info!("SIGNAL [{}] {}", event.match_id, event.message);

        let text = Self::decorate(event);

        if let Err(e) = self.send_telegram(&text).await {
            error!("Telegram alert failed: {e}");
        }

        if let Err(e) = self.send_discord(&text).await {
            error!("Discord alert failed: {e}");
        }
    }

    fn decorate(event: &SignalEvent) -> String {
        let icon = match event.kind {
            SignalKind::BuyAlert => "🚨",
            SignalKind::FlipAlert => "⚡",
            SignalKind::ProfitPull => "💰",
        };
        format!("{icon} {}", event.message)
    }

    async fn send_telegram(&self, message: &str) -> Result<()> {
        let (Some(token), Some(chat_id)) = (
            &self.config.telegram_bot_token,
            &self.config.telegram_chat_id,
        ) else {
            return Ok(()); // Not configured
        };

        let url = format!("https://api.telegram.org/bot{token}/sendMessage");
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": format!("🏀 *COURTSIDE ALERT*\n\n{message}"),
            "parse_mode": "Markdown"
        });
        if let Some(topic_id) = &self.config.telegram_topic_id {
            body["message_thread_id"] = serde_json::json!(topic_id);
        }

        self.http.post(&url).json(&body).send().await?;
        Ok(())
    }

    async fn send_discord(&self, message: &str) -> Result<()> {
        let Some(webhook_url) = &self.config.discord_webhook_url else {
            return Ok(());
        };

        let body = serde_json::json!({
            "content": format!("🏀 **COURTSIDE**: {message}")
        });

        self.http.post(webhook_url).json(&body).send().await?;
        Ok(())
    }
}
