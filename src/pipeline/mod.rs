//! Failure-absorbing gateways in front of the external capabilities
//!
//! Both gateways bound each external call with a timeout and reduce every
//! failure to an absent result, so callers never see capability errors.

mod localization;
mod recognition;

pub use localization::{base_language, LocalizationPipeline, Localized};
pub use recognition::RecognitionGateway;

use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;

/// Run `call`, treating an elapsed `limit` as an error
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| anyhow!("timed out after {}ms", limit.as_millis()))?
}
