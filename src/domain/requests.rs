use crate::domain::{FrameTicket, Payload, PaymentIntent};

/// Data a step needs from the marketplace backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    ChatList,
    Chatroom(String),
    Wallet,
}

/// Server-side action started from a confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    WithdrawApplication(String),
    EndRental(String),
    PayBooking(PaymentIntent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Fetch { ticket: FrameTicket, kind: FetchKind },
    Perform(Operation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderEvent {
    Fetched { ticket: FrameTicket, payload: Payload },
    FetchFailed { ticket: FrameTicket, reason: String },
    Completed { operation: Operation, result: Result<String, String> },
}
