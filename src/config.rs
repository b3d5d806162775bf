//! Configuration for Launchpad
//!
//! CLI arguments and environment variable handling using clap. The external
//! service binary parses these and hands them to [`crate::Platform::connect`].

use clap::Parser;
use std::time::Duration;
use uuid::Uuid;

/// Launchpad - membership lifecycle and progress engine
#[derive(Parser, Debug, Clone)]
#[command(name = "launchpad")]
#[command(about = "Membership lifecycle and progress engine for the Launchpad venture program")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "launchpad")]
    pub mongodb_db: String,

    /// Downstream service endpoints
    #[command(flatten)]
    pub downstream: DownstreamArgs,

    /// Timeout for a single side-effect dispatch call, in milliseconds
    #[arg(long, env = "DISPATCH_TIMEOUT_MS", default_value = "5000")]
    pub dispatch_timeout_ms: u64,

    /// Enable development mode (missing downstream URLs only warn)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Endpoints of the services the dispatcher delivers effects to
#[derive(Parser, Debug, Clone)]
pub struct DownstreamArgs {
    /// Base URL of the notification service
    #[arg(long, env = "NOTIFICATION_URL", default_value = "http://localhost:8070")]
    pub notification_url: String,

    /// Base URL of the XP/achievement webhook service
    #[arg(long, env = "XP_URL", default_value = "http://localhost:8071")]
    pub xp_url: String,

    /// Base URL of the identity service (role grants)
    #[arg(long, env = "IDENTITY_URL", default_value = "http://localhost:8072")]
    pub identity_url: String,
}

impl Args {
    /// Parse arguments, honoring a local `.env` file if present
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse()
    }

    /// Dispatch timeout as a [`Duration`]
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.dispatch_timeout_ms == 0 {
            return Err("DISPATCH_TIMEOUT_MS must be greater than zero".to_string());
        }

        for (name, url) in [
            ("NOTIFICATION_URL", &self.downstream.notification_url),
            ("XP_URL", &self.downstream.xp_url),
            ("IDENTITY_URL", &self.downstream.identity_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["launchpad"])
    }

    #[test]
    fn test_defaults_validate() {
        let args = base_args();
        assert!(args.validate().is_ok());
        assert_eq!(args.dispatch_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut args = base_args();
        args.dispatch_timeout_ms = 0;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_non_http_url_rejected() {
        let mut args = base_args();
        args.downstream.xp_url = "nats://localhost:4222".to_string();
        assert!(args.validate().is_err());
    }
}
