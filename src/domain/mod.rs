// 領域層：請求/回應模型與供應商介面

pub mod model;
pub mod ports;
