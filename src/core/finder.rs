use crate::domain::model::{BeautifulSeats, BusTime, RouteQuery, Ticket, TicketSearch};
use crate::domain::ports::BusTicketApi;
use futures::future::join_all;
use std::sync::Arc;

/// 兩階段查詢：先列出班次，再逐班檢查座位圖
pub struct TicketFinder {
    api: Arc<dyn BusTicketApi>,
    beautiful_seats: BeautifulSeats,
}

impl TicketFinder {
    pub fn new(api: Arc<dyn BusTicketApi>, beautiful_seats: BeautifulSeats) -> Self {
        Self {
            api,
            beautiful_seats,
        }
    }

    /// 供應商錯誤只會減少結果，不會讓整個查詢失敗
    pub async fn find_tickets(&self, search: &TicketSearch) -> Vec<Ticket> {
        let route = &search.route;

        // 1. 取得當日班次
        tracing::info!(
            "Fetching tickets for {} from {} to {}...",
            route.depart_date,
            route.from_province_id,
            route.to_province_id
        );
        let mut buses = self.bookable_buses(route).await;

        // 2. 依出發時間篩選
        if let Some(window) = &search.window {
            buses.retain(|bus| window.contains(&bus.start_time));
        }

        // 3. 併發查詢所有班次的座位圖
        tracing::info!("Fetching seat details for {} buses...", buses.len());
        let lookups = buses
            .iter()
            .map(|bus| self.available_beautiful_seats(bus, route));
        let seat_lists = join_all(lookups).await;

        // 4. 只保留還有好位子的班次
        let tickets: Vec<Ticket> = buses
            .iter()
            .zip(seat_lists)
            .filter(|(_, seats)| !seats.is_empty())
            .map(|(bus, seats)| Ticket::from_bus(bus, &route.depart_date, seats))
            .collect();

        tracing::debug!(
            "[{}] {} of {} buses have beautiful seats left",
            route.depart_date,
            tickets.len(),
            buses.len()
        );
        tickets
    }

    async fn bookable_buses(&self, route: &RouteQuery) -> Vec<BusTime> {
        match self.api.list_bus_times(route).await {
            Ok(buses) => buses
                .into_iter()
                .filter(|bus| bus.has_empty_seats())
                .collect(),
            Err(e) => {
                tracing::error!(
                    "[{}] An error occurred while fetching bus tickets: {}",
                    route.depart_date,
                    e
                );
                Vec::new()
            }
        }
    }

    pub async fn available_beautiful_seats(&self, bus: &BusTime, route: &RouteQuery) -> Vec<String> {
        match self.api.fetch_seat_map(bus, route).await {
            Ok(Some(seat_map)) => seat_map.available_codes(&self.beautiful_seats),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(
                    "[{}] Error fetching seat details for bus {}: {}",
                    route.depart_date,
                    bus.id,
                    e
                );
                Vec::new()
            }
        }
    }
}
