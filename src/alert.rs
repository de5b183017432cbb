//! SMS alerts through AWS SNS

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sns::config::Credentials;
use aws_sdk_sns::error::DisplayErrorContext;
use serde::Serialize;

use crate::config::GatewayConfig;
use crate::inference::PredictionResult;
use crate::models::DisasterType;

#[derive(Debug, thiserror::Error)]
#[error("notification gateway error: {0}")]
pub struct GatewayError(pub String);

/// Notification gateway: deliver `message` to `destination`, return the
/// delivery id.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn publish(&self, destination: &str, message: &str) -> Result<String, GatewayError>;
}

/// What the dispatcher did for one prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertOutcome {
    /// Low risk, nothing to send
    NotRequired,
    /// High risk but the contact field was empty
    MissingDestination,
    Sent { delivery_id: String },
}

/// Send the track's alert if `result` is high risk and a destination was given.
///
/// Gateway failures are returned as-is; there is no retry.
pub async fn dispatch(
    gateway: &dyn SmsGateway,
    result: PredictionResult,
    track: DisasterType,
    destination: &str,
) -> Result<AlertOutcome, GatewayError> {
    if !result.is_high_risk() {
        return Ok(AlertOutcome::NotRequired);
    }

    let destination = destination.trim();
    if destination.is_empty() {
        tracing::warn!(track = track.as_str(), "High risk without destination, alert skipped");
        return Ok(AlertOutcome::MissingDestination);
    }

    let delivery_id = gateway
        .publish(destination, track.alert_message())
        .await
        .map_err(|e| {
            tracing::error!(
                track = track.as_str(),
                destination = %mask_destination(destination),
                "Failed to send alert: {}", e
            );
            e
        })?;

    tracing::info!(
        track = track.as_str(),
        destination = %mask_destination(destination),
        delivery_id = %delivery_id,
        "Alert sent"
    );

    Ok(AlertOutcome::Sent { delivery_id })
}

/// Keep only the last four characters of a phone number for logs
pub fn mask_destination(destination: &str) -> String {
    let chars: Vec<char> = destination.chars().collect();
    let keep = chars.len().min(4);
    let hidden = chars.len() - keep;
    std::iter::repeat('*')
        .take(hidden)
        .chain(chars[hidden..].iter().copied())
        .collect()
}

/// AWS SNS direct-to-phone publishing
pub struct SnsGateway {
    client: aws_sdk_sns::Client,
}

impl SnsGateway {
    /// Build the client from explicit region and static credentials. The
    /// default AWS credential chain is not consulted.
    pub async fn new(config: &GatewayConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            config.session_token.clone(),
            None,
            "disaster-risk-env",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        tracing::info!("SNS gateway configured for region {}", config.region);

        Self {
            client: aws_sdk_sns::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl SmsGateway for SnsGateway {
    async fn publish(&self, destination: &str, message: &str) -> Result<String, GatewayError> {
        let output = self
            .client
            .publish()
            .phone_number(destination)
            .message(message)
            .send()
            .await
            .map_err(|e| GatewayError(format!("SNS Publish error: {}", DisplayErrorContext(&e))))?;

        output
            .message_id()
            .map(str::to_string)
            .ok_or_else(|| GatewayError("SNS Publish returned no MessageId".to_string()))
    }
}
