use crate::utils::error::{FinderError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

pub const MISSING_DATE_MESSAGE: &str = "Please provide a date in YYYYMMDD format.";

// ---------------------------------------------------------------------------
// 供應商回應格式
// ---------------------------------------------------------------------------

/// 供應商 API 的外層包裝 `{ "data": ... }`
#[derive(Debug, Clone, Deserialize)]
pub struct VendorEnvelope<T> {
    pub data: Option<T>,
}

/// 班次列表先保留原始 JSON，逐筆解析，單筆格式錯誤不影響其他班次
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusTimesData {
    #[serde(default)]
    pub bus_times: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMapData {
    #[serde(default)]
    pub seat_map: Option<SeatMap>,
}

/// 單一班次 (`data.busTimes[]`)。
///
/// 識別碼、價格等欄位型別由供應商決定，保留原始 JSON 值原樣轉出。
/// 轉出欄位用 `Option<Value>` 區分「欄位不存在」(`None`) 與「值為 null」(`Some(Null)`)。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusTime {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub bus_hop_id: Value,
    #[serde(default)]
    pub bus_stage_id: Value,
    #[serde(default)]
    pub start_time: Value,
    #[serde(default)]
    pub end_time: Value,
    #[serde(default)]
    pub bus_no: Value,
    #[serde(default)]
    pub empty_seat: Value,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub total_seat: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub start_station_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub finish_station_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub route_name: Option<Value>,
}

/// 欄位存在時 (即使是 `null`) 一律為 `Some`
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl BusTime {
    /// 解析單筆班次；非物件等格式錯誤回傳 `SerializationError`
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// 空位數；無法解析時回傳 `None`
    pub fn empty_seat_count(&self) -> Option<i64> {
        parse_leading_int(&self.empty_seat)
    }

    pub fn has_empty_seats(&self) -> bool {
        self.empty_seat_count().is_some_and(|count| count > 0)
    }

    /// 車號，空值時以 `"N/A"` 代替
    pub fn bus_no_or_default(&self) -> Value {
        if is_truthy(&self.bus_no) {
            self.bus_no.clone()
        } else {
            Value::String("N/A".to_string())
        }
    }

    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            display_value(&self.start_time),
            display_value(&self.end_time)
        )
    }
}

/// 座位圖 (`data.seatMap`)：區域 → 排 → 座位
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    #[serde(default)]
    pub obj_area: Vec<SeatArea>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatArea {
    #[serde(default)]
    pub obj_row: Vec<SeatRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRow {
    #[serde(default)]
    pub obj_seat: Vec<Seat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[serde(default)]
    pub seat_status: Option<String>,
    #[serde(default)]
    pub seat_display_name: Option<String>,
}

impl Seat {
    pub fn is_empty(&self) -> bool {
        self.seat_status.as_deref() == Some("empty")
    }
}

impl SeatMap {
    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.obj_area
            .iter()
            .flat_map(|area| area.obj_row.iter())
            .flat_map(|row| row.obj_seat.iter())
    }

    /// 依座位圖順序列出尚未售出的指定座位代碼
    pub fn available_codes(&self, preferred: &BeautifulSeats) -> Vec<String> {
        self.seats()
            .filter(|seat| seat.is_empty())
            .filter_map(|seat| seat.seat_display_name.as_deref())
            .filter(|code| preferred.contains(code))
            .map(str::to_string)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// 查詢條件
// ---------------------------------------------------------------------------

/// 好看的座位代碼白名單
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeautifulSeats(HashSet<String>);

impl BeautifulSeats {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(codes.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 出發日期，呼叫端傳入的字串原樣轉給供應商 (預期 `YYYYMMDD`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartDate(String);

impl DepartDate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// 傳給供應商的原始字串
    pub fn as_param(&self) -> &str {
        &self.0
    }

    /// 回應中顯示的格式 `DD/MM/YYYY`，依位置切出年、月、日
    pub fn display_date(&self) -> String {
        let year = char_slice(&self.0, 0, 4);
        let month = char_slice(&self.0, 4, 6);
        let day = char_slice(&self.0, 6, 8);
        format!("{}/{}/{}", day, month, year)
    }
}

impl fmt::Display for DepartDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 出發時間區間，以字串比較，兩端皆包含
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

impl TimeWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// 沒有出發時間的班次不在任何區間內
    pub fn contains(&self, start_time: &Value) -> bool {
        let time = match start_time {
            Value::Null => return false,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        time.as_str() >= self.start.as_str() && time.as_str() <= self.end.as_str()
    }
}

/// 未指定起訖站時使用的預設省份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefaults {
    pub from_province_id: String,
    pub to_province_id: String,
}

/// 供應商查詢所需的路線資訊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuery {
    pub depart_date: DepartDate,
    pub from_province_id: String,
    pub to_province_id: String,
}

/// `GET /tickets` 的原始查詢參數
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketQuery {
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: Option<String>,
    #[serde(rename = "endTime")]
    pub end_time: Option<String>,
}

/// 整理後的查詢條件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSearch {
    pub route: RouteQuery,
    pub window: Option<TimeWindow>,
}

impl TicketSearch {
    /// 只有缺少 `date` 會失敗，其餘參數原樣採用
    pub fn from_query(query: &TicketQuery, defaults: &RouteDefaults) -> Result<Self> {
        let date = non_empty(&query.date).ok_or_else(|| FinderError::InvalidQuery {
            field: "date".to_string(),
            message: MISSING_DATE_MESSAGE.to_string(),
        })?;

        let from_province_id = non_empty(&query.from)
            .unwrap_or(defaults.from_province_id.as_str())
            .to_string();
        let to_province_id = non_empty(&query.to)
            .unwrap_or(defaults.to_province_id.as_str())
            .to_string();

        // 只有起訖時間都提供時才套用時間篩選
        let window = match (non_empty(&query.start_time), non_empty(&query.end_time)) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
            _ => None,
        };

        Ok(Self {
            route: RouteQuery {
                depart_date: DepartDate::new(date),
                from_province_id,
                to_province_id,
            },
            window,
        })
    }
}

// ---------------------------------------------------------------------------
// 回應格式
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticket {
    pub date: String,
    pub time: String,
    pub bus_no: Value,
    pub empty_seat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_seat: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<Value>,
    pub available_beautiful_seats: Vec<String>,
}

impl Ticket {
    pub fn from_bus(bus: &BusTime, date: &DepartDate, available_beautiful_seats: Vec<String>) -> Self {
        Self {
            date: date.display_date(),
            time: bus.time_range(),
            bus_no: bus.bus_no_or_default(),
            empty_seat: bus.empty_seat_count().unwrap_or_default(),
            price: bus.price.clone(),
            total_seat: bus.total_seat.clone(),
            start_address: bus.start_station_name.clone(),
            end_address: bus.finish_station_name.clone(),
            route_name: bus.route_name.clone(),
            available_beautiful_seats,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketsResponse {
    pub tickets: Vec<Ticket>,
}

// ---------------------------------------------------------------------------
// 輔助函式
// ---------------------------------------------------------------------------

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// 依字元位置切片，超出長度時截短
fn char_slice(value: &str, start: usize, end: usize) -> String {
    value.chars().skip(start).take(end - start).collect()
}

/// 寬鬆的整數解析：數字取整數部分，字串取開頭的數字部分
pub fn parse_leading_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => {
            let s = s.trim_start();
            let (negative, rest) = match s.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, s.strip_prefix('+').unwrap_or(s)),
            };
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let magnitude = rest[..end].parse::<i64>().ok()?;
            Some(if negative { -magnitude } else { magnitude })
        }
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 顯示用字串：字串原樣，`null` 為空字串，其他值轉成 JSON 文字
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 將供應商識別碼轉成查詢參數；`null` 不送出
pub fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
