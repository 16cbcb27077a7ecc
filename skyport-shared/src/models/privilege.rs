use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ticket::EnrichedTicket;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivilegeStatus {
    Bronze,
    Silver,
    Gold,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    FillInBalance,
    DebitTheAccount,
    FilledByMoney,
}

/// One entry of the bonus account history, in ledger order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEvent {
    pub date: String,
    pub balance_diff: String,
    pub ticket_uid: Uuid,
    pub operation_type: OperationType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeShort {
    pub balance: String,
    pub status: PrivilegeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeAccount {
    pub balance: String,
    pub status: PrivilegeStatus,
    pub history: Vec<BalanceEvent>,
}

/// Response of `GET /api/v1/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub tickets: Vec<EnrichedTicket>,
    pub privilege: PrivilegeShort,
}
