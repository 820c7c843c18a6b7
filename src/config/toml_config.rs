use crate::domain::model::{BeautifulSeats, RouteDefaults};
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_required_string, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://api-pro.xeca.vn/v1";
pub const DEFAULT_CLIENT_ID: &str = "31f5a73d-1677-4884-bd6b-38cedf0ca693";
pub const DEFAULT_ORIGIN: &str = "https://vanminh.xeca.vn";
pub const DEFAULT_REFERER: &str = "https://vanminh.xeca.vn/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.6 Safari/605.1.15";
pub const DEFAULT_BEAUTIFUL_SEATS: [&str; 12] = [
    "A1", "A2", "A3", "A4", "E1", "E2", "E3", "E4", "C1", "C2", "C3", "C4",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub vendor: VendorConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    pub base_url: String,
    pub client_id: String,
    pub bus_agency_id: String,
    pub source_channel: String,
    pub origin: String,
    pub referer: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            bus_agency_id: "1".to_string(),
            source_channel: "11".to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_from_province_id: String,
    pub default_to_province_id: String,
    pub beautiful_seats: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            // 2 = Hà Nội, 1 = Nghệ An
            default_from_province_id: "2".to_string(),
            default_to_province_id: "1".to_string(),
            beautiful_seats: DEFAULT_BEAUTIFUL_SEATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SearchConfig {
    pub fn route_defaults(&self) -> RouteDefaults {
        RouteDefaults {
            from_province_id: self.default_from_province_id.clone(),
            to_province_id: self.default_to_province_id.clone(),
        }
    }

    pub fn beautiful_seats(&self) -> BeautifulSeats {
        BeautifulSeats::new(self.beautiful_seats.iter().cloned())
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FinderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${XECA_CLIENT_ID})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FinderError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_required_string("server.host", &self.server.host)?;
        validate_positive_number(
            "server.request_timeout_seconds",
            self.server.request_timeout_seconds,
            1,
        )?;

        validate_url("vendor.base_url", &self.vendor.base_url)?;
        validate_required_string("vendor.client_id", &self.vendor.client_id)?;
        validate_required_string("vendor.bus_agency_id", &self.vendor.bus_agency_id)?;
        validate_range("vendor.timeout_seconds", self.vendor.timeout_seconds, 1, 300)?;

        validate_required_string(
            "search.default_from_province_id",
            &self.search.default_from_province_id,
        )?;
        validate_required_string(
            "search.default_to_province_id",
            &self.search.default_to_province_id,
        )?;

        if self.search.beautiful_seats.iter().all(|s| s.trim().is_empty()) {
            return Err(FinderError::InvalidConfigValueError {
                field: "search.beautiful_seats".to_string(),
                value: format!("{:?}", self.search.beautiful_seats),
                reason: "At least one seat code is required".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
