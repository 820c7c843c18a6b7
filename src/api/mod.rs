//! HTTP 介面：路由、處理器與 JSON 錯誤對應

pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use error::{ApiError, AppResult};
pub use router::build_app_router;
pub use state::AppState;
