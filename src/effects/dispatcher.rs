//! Side-effect dispatcher
//!
//! Fire-and-forget execution of [`Effect`]s, decoupled from the operations
//! that produce them. The triggering operation has already committed and
//! returned by the time an effect runs; a failed or timed-out delivery is
//! logged and dropped, never surfaced back.
//!
//! There is no durable queue or retry: an effect whose target service is
//! down at call time is permanently lost. The one guarantee is isolation -
//! no downstream outage can fail, undo, or delay the transition that
//! produced the effect.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Args;
use crate::services::{IdentityClient, NotificationClient, XpClient};
use crate::types::Result;

use super::Effect;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Base URL of the notification service
    pub notification_url: String,
    /// Base URL of the XP service
    pub xp_url: String,
    /// Base URL of the identity service
    pub identity_url: String,
    /// Per-call timeout for outbound deliveries
    pub timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            notification_url: "http://localhost:8070".to_string(),
            xp_url: "http://localhost:8071".to_string(),
            identity_url: "http://localhost:8072".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl DispatcherConfig {
    /// Build dispatcher configuration from parsed service args
    pub fn from_args(args: &Args) -> Self {
        Self {
            notification_url: args.downstream.notification_url.clone(),
            xp_url: args.downstream.xp_url.clone(),
            identity_url: args.downstream.identity_url.clone(),
            timeout: args.dispatch_timeout(),
        }
    }
}

/// Handle used by domain operations to enqueue effects.
///
/// Cheap to clone; enqueueing never fails into the caller.
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    tx: mpsc::UnboundedSender<Effect>,
}

impl DispatcherHandle {
    /// Enqueue one effect for asynchronous delivery.
    ///
    /// If the dispatcher has shut down the effect is logged and dropped -
    /// the caller's operation has already succeeded either way.
    pub fn enqueue(&self, effect: Effect) {
        let label = effect.label();
        if self.tx.send(effect).is_err() {
            warn!(effect = label, "Dispatcher stopped; effect dropped");
        }
    }

    /// Enqueue a batch of effects, each delivered independently
    pub fn enqueue_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.enqueue(effect);
        }
    }
}

/// Downstream clients shared by all deliveries
#[derive(Clone)]
struct DispatchTargets {
    notifications: NotificationClient,
    xp: XpClient,
    identity: IdentityClient,
}

/// Start the dispatcher.
///
/// Returns the enqueue handle and the worker task handle. The worker drains
/// the channel and runs every delivery on its own detached task, so one slow
/// call never blocks the queue.
pub fn spawn_dispatcher(config: DispatcherConfig) -> Result<(DispatcherHandle, JoinHandle<()>)> {
    let http = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()?;

    let targets = DispatchTargets {
        notifications: NotificationClient::new(http.clone(), config.notification_url),
        xp: XpClient::new(http.clone(), config.xp_url),
        identity: IdentityClient::new(http, config.identity_url),
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<Effect>();

    let worker = tokio::spawn(async move {
        while let Some(effect) = rx.recv().await {
            let targets = targets.clone();
            tokio::spawn(async move {
                deliver(&targets, effect).await;
            });
        }
        debug!("Dispatcher channel closed, worker exiting");
    });

    Ok((DispatcherHandle { tx }, worker))
}

/// Deliver a single effect, absorbing all failures
async fn deliver(targets: &DispatchTargets, effect: Effect) {
    let dispatch_id = Uuid::new_v4();

    match effect {
        Effect::Notify(notification) => {
            // Fan out per recipient; each call succeeds or fails on its own
            for recipient in notification.recipients.clone() {
                let client = targets.notifications.clone();
                let notification = notification.clone();
                tokio::spawn(async move {
                    match client.create_for(&recipient, &notification).await {
                        Ok(()) => debug!(
                            %dispatch_id,
                            user_id = %recipient,
                            notification_type = %notification.notification_type,
                            "Notification delivered"
                        ),
                        Err(e) => warn!(
                            %dispatch_id,
                            user_id = %recipient,
                            error = %e,
                            "Notification dispatch failed; effect dropped"
                        ),
                    }
                });
            }
        }
        Effect::AwardXp(award) => match targets.xp.award(&award).await {
            Ok(()) => debug!(
                %dispatch_id,
                user_id = %award.user_id,
                event = award.event.webhook_path(),
                "XP awarded"
            ),
            Err(e) => warn!(
                %dispatch_id,
                user_id = %award.user_id,
                event = award.event.webhook_path(),
                error = %e,
                "XP dispatch failed; effect dropped"
            ),
        },
        Effect::ElevateRole(grant) => match targets.identity.grant_role(&grant).await {
            Ok(()) => debug!(
                %dispatch_id,
                user_id = %grant.user_id,
                role = %grant.role,
                "Role granted"
            ),
            Err(e) => warn!(
                %dispatch_id,
                user_id = %grant.user_id,
                role = %grant.role,
                error = %e,
                "Role grant dispatch failed; effect dropped"
            ),
        },
    }
}
