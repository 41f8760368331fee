//! Position report client
//!
//! Posts `lat`/`lon` form bodies to the fleet state server. Coordinates are
//! formatted with the shortest representation that parses back to the same
//! `f64`.

use reqwest::StatusCode;
use thiserror::Error;
use types::ids::Vin;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response status {0}")]
    UnexpectedStatus(StatusCode),
}

/// Client for the fleet state HTTP API.
#[derive(Debug, Clone)]
pub struct FleetStateClient {
    base_url: String,
    http: reqwest::Client,
}

impl FleetStateClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:10080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Report the current position of `vin`.
    ///
    /// Anything but `201 Created` is an error.
    pub async fn update_position(&self, vin: &Vin, lat: f64, lon: f64) -> Result<(), ClientError> {
        let url = format!("{}/vehicle/{}", self.base_url, vin);
        let resp = self
            .http
            .post(&url)
            .form(&[("lat", lat.to_string()), ("lon", lon.to_string())])
            .send()
            .await?;

        match resp.status() {
            StatusCode::CREATED => Ok(()),
            status => Err(ClientError::UnexpectedStatus(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::post, Form, Router};
    use serde::Deserialize;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Debug, Deserialize)]
    struct Update {
        lat: String,
        lon: String,
    }

    type Seen = Arc<Mutex<Vec<(String, String, String)>>>;

    async fn serve(status: AxumStatus) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let recorded = Arc::clone(&seen);
        let app = Router::new().route(
            "/vehicle/{id}",
            post(move |Path(id): Path<String>, Form(update): Form<Update>| {
                let recorded = Arc::clone(&recorded);
                async move {
                    recorded.lock().unwrap().push((id, update.lat, update.lon));
                    status
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client = FleetStateClient::new("http://127.0.0.1:10080/");
        assert_eq!(client.base_url(), "http://127.0.0.1:10080");
    }

    #[tokio::test]
    async fn test_update_position() {
        let (base, seen) = serve(AxumStatus::CREATED).await;
        let client = FleetStateClient::new(format!("{}/", base));
        let vin = Vin::parse("the1vin").unwrap();

        client.update_position(&vin, 52.520008, 13.404954).await.unwrap();
        client.update_position(&vin, -0.5, 1e-7).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[
                ("THE1VIN".to_string(), "52.520008".to_string(), "13.404954".to_string()),
                ("THE1VIN".to_string(), "-0.5".to_string(), "0.0000001".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_position_unexpected_status() {
        let (base, _) = serve(AxumStatus::OK).await;
        let client = FleetStateClient::new(base);
        let vin = Vin::parse("THE1VIN").unwrap();

        let err = client.update_position(&vin, 1.0, 2.0).await.unwrap_err();
        assert!(
            matches!(err, ClientError::UnexpectedStatus(StatusCode::OK)),
            "got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_update_position_connection_refused() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = FleetStateClient::new(format!("http://{}", addr));
        let vin = Vin::parse("THE1VIN").unwrap();

        let err = client.update_position(&vin, 1.0, 2.0).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
