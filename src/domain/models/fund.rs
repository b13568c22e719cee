//! Fund item domain model.
//!
//! Many per user; independently created, updated, and deleted. Listings
//! preserve insertion order for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Kind of proof-of-funds item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundItemType {
    Cash,
    BankCard,
    CreditCard,
    Document,
    BankBalance,
    Investment,
    #[default]
    Other,
}

impl FundItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankCard => "bank_card",
            Self::CreditCard => "credit_card",
            Self::Document => "document",
            Self::BankBalance => "bank_balance",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "bank_card" => Some(Self::BankCard),
            "credit_card" => Some(Self::CreditCard),
            "document" => Some(Self::Document),
            "bank_balance" => Some(Self::BankBalance),
            "investment" => Some(Self::Investment),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// One proof-of-funds entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundItem {
    pub id: Uuid,
    pub user_id: UserId,
    pub item_type: FundItemType,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub photo_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FundItem {
    pub fn new(user_id: UserId, item_type: FundItemType) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            item_type,
            description: None,
            amount: None,
            currency: None,
            photo_ref: None,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: FundItemUpdate) {
        if let Some(v) = update.item_type {
            self.item_type = v;
        }
        if let Some(v) = update.description {
            self.description = Some(v);
        }
        if let Some(v) = update.amount {
            self.amount = Some(v);
        }
        if let Some(v) = update.currency {
            self.currency = Some(v);
        }
        if let Some(v) = update.photo_ref {
            self.photo_ref = Some(v);
        }
    }
}

/// Partial fund-item update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundItemUpdate {
    pub item_type: Option<FundItemType>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub photo_ref: Option<String>,
}
