pub mod errors;
pub mod flight;
pub mod privilege;
pub mod ticket;

pub use errors::{ErrorBody, FieldError, ValidationErrorBody};
pub use flight::{FlightPage, FlightSummary};
pub use privilege::{BalanceEvent, OperationType, PrivilegeAccount, PrivilegeShort, PrivilegeStatus, UserInfo};
pub use ticket::{
    EnrichedTicket, PurchaseRequest, PurchaseResponse, PurchaseResult, Ticket, TicketStatus,
    ValidatedPurchase,
};
