use std::sync::Arc;

use axum::response::Response;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::commission::domain::{AgentLevel, CommissionInput, DealType};
use crate::commission::router::commission_router;
use crate::commission::service::CommissionDesk;
use crate::commission::tiers::TierTable;

pub(super) const DEAL_CSV: &str = "Deal ID,Property Value,Deal Type,Agent Level,Override Rate\n\
D-100,500000,sale,senior,\n\
D-101,1000000,sale,master,\n\
D-102,200000,sale,senior,0.05\n\
D-103,-5000,rent,junior,\n";

pub(super) fn input(value: i64, level: AgentLevel) -> CommissionInput {
    CommissionInput::new(Decimal::from(value), DealType::Sale, level)
}

pub(super) fn build_desk(capacity: usize) -> Arc<CommissionDesk> {
    Arc::new(CommissionDesk::new(
        Arc::new(TierTable::standard()),
        capacity,
    ))
}

pub(super) fn router_with_desk(desk: Arc<CommissionDesk>) -> axum::Router {
    commission_router(desk)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
