use std::sync::Arc;

use crate::adapters::XecaClient;
use crate::config::toml_config::TomlConfig;
use crate::core::TicketFinder;
use crate::domain::model::RouteDefaults;
use crate::domain::ports::BusTicketApi;
use crate::utils::error::Result;

/// 所有處理器共用的應用程式狀態
#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<TicketFinder>,
    pub route_defaults: Arc<RouteDefaults>,
}

impl AppState {
    pub fn new(finder: TicketFinder, route_defaults: RouteDefaults) -> Self {
        Self {
            finder: Arc::new(finder),
            route_defaults: Arc::new(route_defaults),
        }
    }

    /// 依設定建立供應商客戶端與查詢器
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let api: Arc<dyn BusTicketApi> = Arc::new(XecaClient::new(&config.vendor)?);
        let finder = TicketFinder::new(api, config.search.beautiful_seats());
        Ok(Self::new(finder, config.search.route_defaults()))
    }
}
