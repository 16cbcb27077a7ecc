use async_trait::async_trait;
use serde::Deserialize;
use skyport_core::{Backend, GatewayError, GatewayResult, TicketLedger, UserTickets};
use skyport_shared::models::{
    BalanceEvent, ErrorBody, OperationType, PrivilegeAccount, PrivilegeShort, PrivilegeStatus,
    PurchaseResult, Ticket, TicketStatus, ValidatedPurchase, ValidationErrorBody,
};
use skyport_shared::CallerIdentity;
use uuid::Uuid;

use crate::backend::{BackendClient, BackendError, BackendRequest};

// ============================================================================
// Ledger wire shapes
// ============================================================================

/// Amounts arrive as strings from some ledger builds and as numbers from others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Amount {
    fn into_string(self) -> String {
        match self {
            Amount::Text(s) => s,
            Amount::Int(i) => i.to_string(),
            Amount::Float(f) => f.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerTicketDto {
    ticket_uid: Uuid,
    flight_number: String,
    price: i32,
    status: TicketStatus,
    /// Only present on ledger builds that expose ownership.
    #[serde(default)]
    username: Option<String>,
}

impl From<LedgerTicketDto> for Ticket {
    fn from(dto: LedgerTicketDto) -> Self {
        Ticket {
            ticket_uid: dto.ticket_uid,
            flight_number: dto.flight_number,
            price: dto.price,
            status: dto.status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LedgerPrivilegeShortDto {
    balance: Amount,
    status: PrivilegeStatus,
}

impl From<LedgerPrivilegeShortDto> for PrivilegeShort {
    fn from(dto: LedgerPrivilegeShortDto) -> Self {
        PrivilegeShort {
            balance: dto.balance.into_string(),
            status: dto.status,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerBalanceEventDto {
    date: String,
    balance_diff: Amount,
    ticket_uid: Uuid,
    operation_type: OperationType,
}

#[derive(Debug, Deserialize)]
struct LedgerPrivilegeDto {
    balance: Amount,
    status: PrivilegeStatus,
    #[serde(default)]
    history: Vec<LedgerBalanceEventDto>,
}

#[derive(Debug, Deserialize)]
struct LedgerUserInfoDto {
    #[serde(default)]
    tickets: Vec<LedgerTicketDto>,
    privilege: LedgerPrivilegeShortDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerPurchaseDto {
    ticket_uid: Uuid,
    flight_number: String,
    price: i32,
    status: TicketStatus,
    #[serde(default)]
    paid_by_money: Option<i32>,
    #[serde(default)]
    paid_by_bonuses: i32,
    privilege: LedgerPrivilegeShortDto,
}

impl LedgerPurchaseDto {
    fn into_result(self, backend: Backend) -> GatewayResult<PurchaseResult> {
        // Older ledgers only report the bonus part; the rest was paid in money.
        let paid_by_money = match self.paid_by_money {
            Some(money) => money,
            None => self.price.checked_sub(self.paid_by_bonuses).ok_or_else(|| {
                GatewayError::DecodeFailure {
                    backend,
                    reason: format!(
                        "price {} minus bonuses {} is out of range",
                        self.price, self.paid_by_bonuses
                    ),
                }
            })?,
        };

        Ok(PurchaseResult {
            ticket: Ticket {
                ticket_uid: self.ticket_uid,
                flight_number: self.flight_number,
                price: self.price,
                status: self.status,
            },
            paid_by_money,
            paid_by_bonuses: self.paid_by_bonuses,
            privilege: self.privilege.into(),
        })
    }
}

// ============================================================================
// Adapter
// ============================================================================

pub struct HttpTicketLedger {
    client: BackendClient,
}

impl HttpTicketLedger {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn backend(&self) -> Backend {
        self.client.backend()
    }
}

fn ticket_not_found(ticket_uid: Uuid) -> GatewayError {
    GatewayError::not_found(format!("Ticket {} not found", ticket_uid))
}

/// Pull `message` out of a `{message}` body, if there is one.
fn message_of(err: &BackendError) -> Option<String> {
    err.body()
        .and_then(|b| serde_json::from_str::<ErrorBody>(b).ok())
        .map(|b| b.message)
}

#[async_trait]
impl TicketLedger for HttpTicketLedger {
    async fn list_tickets(&self, identity: &CallerIdentity) -> GatewayResult<Vec<Ticket>> {
        let request = BackendRequest::get("/tickets")
            .query("user", identity.as_str())
            .identity(identity);

        let tickets: Vec<LedgerTicketDto> = self
            .client
            .fetch(request)
            .await
            .map_err(|e| e.into_gateway(self.backend()))?;

        Ok(tickets.into_iter().map(Ticket::from).collect())
    }

    async fn get_ticket(&self, identity: &CallerIdentity, ticket_uid: Uuid) -> GatewayResult<Ticket> {
        let request = BackendRequest::get(format!("/tickets/{}", ticket_uid)).identity(identity);

        let dto: LedgerTicketDto = match self.client.fetch(request).await {
            Ok(dto) => dto,
            Err(e) if matches!(e.status(), Some(404) | Some(403)) => {
                return Err(ticket_not_found(ticket_uid));
            }
            Err(e) => return Err(e.into_gateway(self.backend())),
        };

        if let Some(owner) = &dto.username {
            if owner != identity.as_str() {
                tracing::info!(%ticket_uid, caller = %identity, "Ticket belongs to another user");
                return Err(ticket_not_found(ticket_uid));
            }
        }

        Ok(dto.into())
    }

    async fn purchase(
        &self,
        identity: &CallerIdentity,
        request: &ValidatedPurchase,
    ) -> GatewayResult<PurchaseResult> {
        let call = BackendRequest::post("/v1/tickets")
            .json(request)
            .map_err(|e| e.into_gateway(self.backend()))?
            .identity(identity);

        match self.client.fetch::<LedgerPurchaseDto>(call).await {
            Ok(dto) => dto.into_result(self.backend()),
            Err(e) if e.status() == Some(400) => {
                let body = e
                    .body()
                    .and_then(|b| serde_json::from_str::<ValidationErrorBody>(b).ok());
                Err(match body {
                    Some(body) => GatewayError::validation(body.message, body.errors),
                    None => GatewayError::validation("Purchase rejected by ticket ledger", Vec::new()),
                })
            }
            Err(e) if e.status() == Some(404) => Err(GatewayError::not_found(
                message_of(&e).unwrap_or_else(|| "Flight not found".to_string()),
            )),
            Err(e) => Err(e.into_gateway(self.backend())),
        }
    }

    async fn refund(&self, identity: &CallerIdentity, ticket_uid: Uuid) -> GatewayResult<()> {
        let request = BackendRequest::delete(format!("/v1/tickets/{}", ticket_uid)).identity(identity);

        match self.client.execute(request).await {
            Ok(()) => Ok(()),
            Err(e) if e.status() == Some(404) => Err(ticket_not_found(ticket_uid)),
            Err(e) => Err(e.into_gateway(self.backend())),
        }
    }

    async fn user_info(&self, identity: &CallerIdentity) -> GatewayResult<UserTickets> {
        let request = BackendRequest::get("/v1/me").identity(identity);

        let dto: LedgerUserInfoDto = self
            .client
            .fetch(request)
            .await
            .map_err(|e| e.into_gateway(self.backend()))?;

        Ok(UserTickets {
            tickets: dto.tickets.into_iter().map(Ticket::from).collect(),
            privilege: dto.privilege.into(),
        })
    }

    async fn privilege(&self, identity: &CallerIdentity) -> GatewayResult<PrivilegeAccount> {
        let request = BackendRequest::get("/v1/privilege").identity(identity);

        let dto: LedgerPrivilegeDto = match self.client.fetch(request).await {
            Ok(dto) => dto,
            Err(e) if e.status() == Some(404) => {
                return Err(GatewayError::not_found(
                    message_of(&e).unwrap_or_else(|| "Privilege account not found".to_string()),
                ));
            }
            Err(e) => return Err(e.into_gateway(self.backend())),
        };

        Ok(PrivilegeAccount {
            balance: dto.balance.into_string(),
            status: dto.status,
            history: dto
                .history
                .into_iter()
                .map(|h| BalanceEvent {
                    date: h.date,
                    balance_diff: h.balance_diff.into_string(),
                    ticket_uid: h.ticket_uid,
                    operation_type: h.operation_type,
                })
                .collect(),
        })
    }
}
