use crate::domain::model::{BusTime, RouteQuery, SeatMap};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 售票供應商 API：班次列表與座位圖
#[async_trait]
pub trait BusTicketApi: Send + Sync {
    /// 列出指定路線與日期的所有班次
    async fn list_bus_times(&self, route: &RouteQuery) -> Result<Vec<BusTime>>;

    /// 取得單一班次的座位圖；供應商未提供座位圖時回傳 `None`
    async fn fetch_seat_map(&self, bus: &BusTime, route: &RouteQuery) -> Result<Option<SeatMap>>;
}
