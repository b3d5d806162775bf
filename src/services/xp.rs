//! XP service client
//!
//! Awards XP via webhooks keyed by event kind (`milestone/complete`,
//! `project/complete`, ...). The XP amounts themselves live in the XP
//! service; the core only reports that an event happened.

use serde::Serialize;

use crate::effects::XpAward;
use crate::types::Result;

/// Client for the XP/achievement service webhooks
#[derive(Debug, Clone)]
pub struct XpClient {
    http: reqwest::Client,
    base_url: String,
}

/// Wire body for an award-XP webhook
#[derive(Debug, Serialize)]
struct AwardXpBody<'a> {
    user_id: &'a str,
    entity_id: &'a str,
}

impl XpClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fire the award webhook for one XP event
    pub async fn award(&self, award: &XpAward) -> Result<()> {
        let body = AwardXpBody {
            user_id: &award.user_id,
            entity_id: &award.entity_id,
        };

        self.http
            .post(format!(
                "{}/webhooks/xp/{}",
                self.base_url,
                award.event.webhook_path()
            ))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
