use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKey {
    Chats,
    Chatroom,
    SupportPage,
    Auth,
    Wallet,
    TenantApplication,
    ApplicationReview,
    RentalManagement,
    ProfileEdit,
    BookingPayment,
}

impl StepKey {
    pub const ALL: [StepKey; 10] = [
        StepKey::Chats,
        StepKey::Chatroom,
        StepKey::SupportPage,
        StepKey::Auth,
        StepKey::Wallet,
        StepKey::TenantApplication,
        StepKey::ApplicationReview,
        StepKey::RentalManagement,
        StepKey::ProfileEdit,
        StepKey::BookingPayment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StepKey::Chats => "chats",
            StepKey::Chatroom => "chatroom",
            StepKey::SupportPage => "support page",
            StepKey::Auth => "auth",
            StepKey::Wallet => "wallet",
            StepKey::TenantApplication => "tenant application",
            StepKey::ApplicationReview => "application review",
            StepKey::RentalManagement => "rental management",
            StepKey::ProfileEdit => "profile edit",
            StepKey::BookingPayment => "booking payment",
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub chat_id: String,
    pub counterpart: String,
    pub last_message: String,
    pub unread: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatList {
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from_me: bool,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatroomRef {
    pub chat_id: String,
    /// Filled in by the loader; empty until the thread has been fetched.
    pub messages: Vec<ChatMessage>,
}

impl ChatroomRef {
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            messages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSummary {
    pub balance_cents: i64,
    pub pending_payouts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub listing_id: String,
    pub move_in: Option<String>,
    pub occupants: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRef {
    pub application_id: String,
    pub applicant: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalRef {
    pub rental_id: String,
    pub property: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileField {
    pub field: String,
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub booking_id: String,
    pub amount_cents: i64,
}

/// Data handed from one step to the next.
///
/// Each variant belongs to exactly one [`StepKey`]; steps that carry no data
/// (support, auth) have no variant. The navigator never looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Chats(ChatList),
    Chatroom(ChatroomRef),
    Wallet(WalletSummary),
    TenantApplication(ApplicationDraft),
    ApplicationReview(ApplicationRef),
    RentalManagement(RentalRef),
    ProfileEdit(ProfileField),
    BookingPayment(PaymentIntent),
}

impl Payload {
    pub fn step(&self) -> StepKey {
        match self {
            Payload::Chats(_) => StepKey::Chats,
            Payload::Chatroom(_) => StepKey::Chatroom,
            Payload::Wallet(_) => StepKey::Wallet,
            Payload::TenantApplication(_) => StepKey::TenantApplication,
            Payload::ApplicationReview(_) => StepKey::ApplicationReview,
            Payload::RentalManagement(_) => StepKey::RentalManagement,
            Payload::ProfileEdit(_) => StepKey::ProfileEdit,
            Payload::BookingPayment(_) => StepKey::BookingPayment,
        }
    }
}

/// Generation number of a pushed frame. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl FrameId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: FrameId,
    pub step: StepKey,
    pub payload: Option<Payload>,
}

/// Handle returned by a push, given to async work so its result can be
/// matched back to the frame that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket {
    pub id: FrameId,
    pub step: StepKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_step_matches_variant() {
        let payload = Payload::Chatroom(ChatroomRef::new("c1"));
        assert_eq!(payload.step(), StepKey::Chatroom);

        let payload = Payload::BookingPayment(PaymentIntent {
            booking_id: "b7".to_string(),
            amount_cents: 12_500,
        });
        assert_eq!(payload.step(), StepKey::BookingPayment);
    }

    #[test]
    fn test_step_labels() {
        assert_eq!(StepKey::SupportPage.to_string(), "support page");
        assert_eq!(StepKey::Chatroom.label(), "chatroom");
        assert_eq!(StepKey::ALL.len(), 10);
    }

    #[test]
    fn test_direction_default_is_none() {
        assert_eq!(Direction::default(), Direction::None);
    }
}
