//! Requests to the simulation server.
//!
//! Every numeric field travels as a string, exactly as typed into the form;
//! parsing and validation are the server's business.

use crate::error::{DashboardError, Result};
use crate::summary::{SimulationKind, SimulationResponse};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRequest {
    pub initial_price: String,
    pub volatility: String,
    pub num_days: String,
    pub num_simulations: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRequest {
    pub initial_inventory: String,
    pub avg_daily_demand: String,
    pub demand_volatility: String,
    pub lead_time_days: String,
    pub num_days: String,
    pub num_simulations: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationRequest {
    Price(PriceRequest),
    Inventory(InventoryRequest),
    RealStock { symbol: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Where a request goes: HTTP method plus path segments under the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub segments: Vec<String>,
}

impl SimulationRequest {
    pub fn kind(&self) -> SimulationKind {
        match self {
            Self::Price(_) => SimulationKind::Price,
            Self::Inventory(_) => SimulationKind::Inventory,
            Self::RealStock { .. } => SimulationKind::RealStock,
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Self::Price(_) => Route {
                method: Method::Post,
                segments: vec!["simulate".to_string()],
            },
            Self::Inventory(_) => Route {
                method: Method::Post,
                segments: vec!["simulate_inventory".to_string()],
            },
            Self::RealStock { symbol } => Route {
                method: Method::Get,
                segments: vec!["simulate_real_stock".to_string(), symbol.clone()],
            },
        }
    }

    /// JSON body for POST routes.
    pub fn body(&self) -> Result<Option<String>> {
        Ok(match self {
            Self::Price(r) => Some(serde_json::to_string(r)?),
            Self::Inventory(r) => Some(serde_json::to_string(r)?),
            Self::RealStock { .. } => None,
        })
    }
}

/// The remote simulator.
pub trait SimulationClient {
    fn fetch(&self, request: &SimulationRequest) -> Result<SimulationResponse>;
}

/// Blocking HTTP client. Requests run to completion; there is no timeout
/// and no retry.
pub struct HttpSimulationClient {
    base_url: reqwest::Url,
    client: reqwest::blocking::Client,
}

impl HttpSimulationClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| DashboardError::config(format!("invalid server url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::config(format!(
                "server url '{}' cannot be a base",
                base_url
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()?;

        Ok(HttpSimulationClient { base_url, client })
    }

    pub fn url_for(&self, route: &Route) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(&route.segments);
        }
        url
    }
}

impl SimulationClient for HttpSimulationClient {
    fn fetch(&self, request: &SimulationRequest) -> Result<SimulationResponse> {
        let route = request.route();
        let url = self.url_for(&route);
        tracing::info!(kind = request.kind().name(), %url, "sending simulation request");

        let builder = match route.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let builder = match request.body()? {
            Some(body) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body),
            None => builder,
        };

        let body = builder.send()?.error_for_status()?.text()?;
        tracing::debug!(bytes = body.len(), "received simulation response");

        SimulationResponse::decode(request.kind(), &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_request(target: Option<&str>) -> SimulationRequest {
        SimulationRequest::Price(PriceRequest {
            initial_price: "100".into(),
            volatility: "25".into(),
            num_days: "30".into(),
            num_simulations: "1000".into(),
            target_price: target.map(str::to_string),
        })
    }

    #[test]
    fn test_numeric_fields_are_sent_as_strings() {
        let body = price_request(Some("120")).body().unwrap().unwrap();
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["initial_price"], "100");
        assert_eq!(v["target_price"], "120");
    }

    #[test]
    fn test_missing_target_is_omitted() {
        let body = price_request(None).body().unwrap().unwrap();
        assert!(!body.contains("target_price"));
    }

    #[test]
    fn test_routes() {
        let client = HttpSimulationClient::new("http://localhost:5000/").unwrap();

        let url = client.url_for(&price_request(None).route());
        assert_eq!(url.as_str(), "http://localhost:5000/simulate");

        let real = SimulationRequest::RealStock {
            symbol: "AAPL".into(),
        };
        assert_eq!(real.route().method, Method::Get);
        assert_eq!(
            client.url_for(&real.route()).as_str(),
            "http://localhost:5000/simulate_real_stock/AAPL"
        );
        assert!(real.body().unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            HttpSimulationClient::new("not a url"),
            Err(DashboardError::Config(_))
        ));
    }
}
