// Domain layer: 資料模型與各層之間的介面 (ports)。

pub mod model;
pub mod ports;
