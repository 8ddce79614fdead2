//! Routing service client used to backfill missing travel distances.
//!
//! The bearer credential is obtained outside this crate and passed in through
//! configuration.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::RoutingConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::Coordinates;

use super::RouteLookup;

const DIRECTIONS_PATH: &str = "routing/v1/directions";
const OPERATION: &str = "lookup_route_distance_km";

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    /// Meters.
    distance: f64,
}

impl DirectionsResponse {
    fn first_leg_km(&self) -> EngineResult<Decimal> {
        let meters = self
            .routes
            .first()
            .and_then(|r| r.legs.first())
            .map(|l| l.distance)
            .ok_or_else(|| EngineError::io(OPERATION, "response contained no route"))?;

        let meters = Decimal::try_from(meters)
            .map_err(|e| EngineError::io(OPERATION, format!("invalid distance {}: {}", meters, e)))?;
        Ok(meters / Decimal::from(1000))
    }
}

fn format_position(position: Coordinates) -> String {
    format!("{},{}", position.latitude, position.longitude)
}

/// HTTP client for the directions endpoint of the routing service.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl RoutingClient {
    /// Creates a client for the routing service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Creates a client from the `routing` configuration section.
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.base_url.clone(), config.access_token.clone())
    }
}

#[async_trait]
impl RouteLookup for RoutingClient {
    async fn lookup_route_distance_km(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> EngineResult<Decimal> {
        let request_id = Uuid::new_v4();
        debug!(request_id = %request_id, ?from, ?to, "Route lookup");

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, DIRECTIONS_PATH))
            .bearer_auth(&self.access_token)
            .header("X-Request-Id", request_id.to_string())
            .header("X-Correlation-Id", Uuid::new_v4().to_string())
            .query(&[
                ("origin", format_position(from)),
                ("destination", format_position(to)),
                ("alternatives", "false".to_string()),
                ("steps", "false".to_string()),
                ("overview", "full".to_string()),
                ("language", "en".to_string()),
                ("traffic_metadata", "false".to_string()),
            ])
            .send()
            .await
            .map_err(|e| EngineError::io(OPERATION, e))?
            .error_for_status()
            .map_err(|e| EngineError::io(OPERATION, e))?;

        let directions: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| EngineError::io(OPERATION, e))?;
        directions.first_leg_km()
    }
}
