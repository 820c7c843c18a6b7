use crate::config::toml_config::VendorConfig;
use crate::domain::model::{
    query_value, BusTime, BusTimesData, RouteQuery, SeatMap, SeatMapData, VendorEnvelope,
};
use crate::domain::ports::BusTicketApi;
use crate::utils::error::{FinderError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const BUS_TIMES_PATH: &str = "bus-times";
const SEAT_MAP_PATH: &str = "bus-time-exts/detail-bus-time";
const SOURCE: &str = "wb";

/// xeca.vn 售票 API 的 HTTP 客戶端
#[derive(Debug, Clone)]
pub struct XecaClient {
    client: Client,
    base_url: String,
    client_id: String,
    source_channel: String,
}

impl XecaClient {
    pub fn new(config: &VendorConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(vendor_headers(config)?)
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            source_channel: config.source_channel.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("Making API request to: {}", endpoint);
        let response = self.client.get(endpoint).query(params).send().await?;

        tracing::debug!("API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(FinderError::UpstreamStatus {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl BusTicketApi for XecaClient {
    async fn list_bus_times(&self, route: &RouteQuery) -> Result<Vec<BusTime>> {
        let params = [
            ("_source", SOURCE.to_string()),
            ("_client_id", self.client_id.clone()),
            ("departDate", route.depart_date.as_param().to_string()),
            ("fromProvinceId", route.from_province_id.clone()),
            ("toProvinceId", route.to_province_id.clone()),
            ("sourceChannel", self.source_channel.clone()),
        ];

        let envelope: VendorEnvelope<BusTimesData> =
            self.get_json(&self.endpoint(BUS_TIMES_PATH), &params).await?;

        let records = envelope
            .data
            .and_then(|data| data.bus_times)
            .ok_or_else(|| FinderError::UnexpectedResponse {
                message: "missing data.busTimes in bus list response".to_string(),
            })?;

        // 逐筆解析，格式錯誤的班次略過並記錄
        let buses = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match BusTime::from_value(record) {
                Ok(bus) => Some(bus),
                Err(e) => {
                    tracing::warn!(
                        "[{}] Skipping malformed bus record #{}: {}",
                        route.depart_date,
                        index,
                        e
                    );
                    None
                }
            })
            .collect();

        Ok(buses)
    }

    async fn fetch_seat_map(&self, bus: &BusTime, route: &RouteQuery) -> Result<Option<SeatMap>> {
        let mut params = vec![
            ("_source", SOURCE.to_string()),
            ("_client_id", self.client_id.clone()),
            ("depart_date", route.depart_date.as_param().to_string()),
        ];
        // 供應商未提供的識別碼不送出
        for (key, value) in [
            ("bus_time_id", &bus.id),
            ("bus_hop_id", &bus.bus_hop_id),
            ("bus_stage_id", &bus.bus_stage_id),
        ] {
            if let Some(value) = query_value(value) {
                params.push((key, value));
            }
        }
        params.push(("from_province_id", route.from_province_id.clone()));
        params.push(("to_province_id", route.to_province_id.clone()));

        let envelope: VendorEnvelope<SeatMapData> =
            self.get_json(&self.endpoint(SEAT_MAP_PATH), &params).await?;

        Ok(envelope.data.and_then(|data| data.seat_map))
    }
}

fn vendor_headers(config: &VendorConfig) -> Result<HeaderMap> {
    let fixed: [(&'static str, &str); 10] = [
        ("pragma", "no-cache"),
        ("accept", "*/*"),
        ("sec-fetch-site", "same-site"),
        ("accept-language", "en-GB,en-US;q=0.9,en;q=0.8"),
        ("cache-control", "no-cache"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-dest", "empty"),
        ("priority", "u=3, i"),
        ("origin", config.origin.as_str()),
        ("referer", config.referer.as_str()),
    ];

    let mut headers = HeaderMap::new();
    for (name, value) in fixed
        .into_iter()
        .chain([("x-bus-agency-id", config.bus_agency_id.as_str())])
    {
        let value = HeaderValue::from_str(value).map_err(|e| {
            FinderError::InvalidConfigValueError {
                field: format!("vendor header {}", name),
                value: value.to_string(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(HeaderName::from_static(name), value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BeautifulSeats, DepartDate};
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    fn vendor_config(base_url: String) -> VendorConfig {
        VendorConfig {
            base_url,
            ..VendorConfig::default()
        }
    }

    fn route() -> RouteQuery {
        RouteQuery {
            depart_date: DepartDate::new("20250910"),
            from_province_id: "2".to_string(),
            to_province_id: "1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_bus_times_sends_vendor_params_and_headers() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/bus-times")
                .query_param("_source", "wb")
                .query_param("_client_id", crate::config::toml_config::DEFAULT_CLIENT_ID)
                .query_param("departDate", "20250910")
                .query_param("fromProvinceId", "2")
                .query_param("toProvinceId", "1")
                .query_param("sourceChannel", "11")
                .header("x-bus-agency-id", "1")
                .header("origin", "https://vanminh.xeca.vn")
                .header("referer", "https://vanminh.xeca.vn/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "data": {
                        "busTimes": [
                            {"id": 1, "start_time": "07:00", "end_time": "12:00", "empty_seat": "3"},
                            {"id": 2, "start_time": "09:00", "end_time": "14:00", "empty_seat": 0}
                        ]
                    }
                }));
        });

        let client = XecaClient::new(&vendor_config(server.base_url())).unwrap();
        let buses = client.list_bus_times(&route()).await.unwrap();

        api_mock.assert();
        assert_eq!(buses.len(), 2);
        assert_eq!(buses[0].start_time, json!("07:00"));
        assert!(buses[0].has_empty_seats());
        assert!(!buses[1].has_empty_seats());
    }

    #[tokio::test]
    async fn test_list_bus_times_skips_malformed_records() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/bus-times");
            then.status(200).json_body(json!({
                "data": {
                    "busTimes": [
                        {"id": 1, "start_time": "07:00", "end_time": "12:00", "empty_seat": "3"},
                        "not-a-bus",
                        null,
                        {"id": 2, "start_time": 800, "end_time": null, "empty_seat": "1", "price": null}
                    ]
                }
            }));
        });

        let client = XecaClient::new(&vendor_config(server.base_url())).unwrap();
        let buses = client.list_bus_times(&route()).await.unwrap();

        assert_eq!(buses.len(), 2);
        assert_eq!(buses[0].id, json!(1));
        assert_eq!(buses[1].id, json!(2));
        assert_eq!(buses[1].time_range(), "800 - ");
        assert_eq!(buses[1].price, Some(Value::Null));
    }

    #[tokio::test]
    async fn test_list_bus_times_without_bus_times_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/bus-times");
            then.status(200).json_body(json!({"data": {}}));
        });

        let client = XecaClient::new(&vendor_config(server.base_url())).unwrap();
        let err = client.list_bus_times(&route()).await.unwrap_err();
        assert!(matches!(err, FinderError::UnexpectedResponse { .. }));
    }

    #[tokio::test]
    async fn test_list_bus_times_server_error_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/bus-times");
            then.status(500);
        });

        let client = XecaClient::new(&vendor_config(server.base_url())).unwrap();
        let err = client.list_bus_times(&route()).await.unwrap_err();
        assert!(matches!(err, FinderError::UpstreamStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_seat_map_sends_bus_identifiers() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/bus-time-exts/detail-bus-time")
                .query_param("_source", "wb")
                .query_param("depart_date", "20250910")
                .query_param("bus_time_id", "77")
                .query_param("bus_hop_id", "hop-9")
                .query_param("bus_stage_id", "3")
                .query_param("from_province_id", "2")
                .query_param("to_province_id", "1")
                .header("x-bus-agency-id", "1");
            then.status(200).json_body(json!({
                "data": {
                    "seatMap": {
                        "objArea": [{"objRow": [{"objSeat": [
                            {"seatStatus": "empty", "seatDisplayName": "A1"},
                            {"seatStatus": "sold", "seatDisplayName": "A2"},
                            {"seatStatus": "empty", "seatDisplayName": "B1"}
                        ]}]}]
                    }
                }
            }));
        });

        let bus: BusTime = serde_json::from_value(json!({
            "id": 77,
            "bus_hop_id": "hop-9",
            "bus_stage_id": 3
        }))
        .unwrap();

        let client = XecaClient::new(&vendor_config(server.base_url())).unwrap();
        let seat_map = client.fetch_seat_map(&bus, &route()).await.unwrap().unwrap();

        api_mock.assert();
        let preferred = BeautifulSeats::new(["A1", "A2"]);
        assert_eq!(seat_map.available_codes(&preferred), vec!["A1"]);
    }

    #[tokio::test]
    async fn test_fetch_seat_map_missing_seat_map_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/bus-time-exts/detail-bus-time");
            then.status(200).json_body(json!({"data": null}));
        });

        let client = XecaClient::new(&vendor_config(server.base_url())).unwrap();
        let seat_map = client
            .fetch_seat_map(&BusTime::default(), &route())
            .await
            .unwrap();
        assert!(seat_map.is_none());
    }

    #[test]
    fn test_invalid_header_value_is_config_error() {
        let config = VendorConfig {
            origin: "bad\nvalue".to_string(),
            ..VendorConfig::default()
        };
        let err = XecaClient::new(&config).unwrap_err();
        assert!(err.is_config_error());
    }
}
