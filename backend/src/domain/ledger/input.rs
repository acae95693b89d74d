//! Caller-supplied ledger inputs and their validated forms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{LedgerValidationError, Money, Quantity};

const PAYMENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw item fields as received from an inbound adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditItemInput {
    pub product: String,
    pub cost: String,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
}

/// Raw entry fields, including the mandatory first item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditEntryInput {
    pub customer_name: String,
    pub phone_number: Option<String>,
    pub estimated_payment_date: String,
    pub first_item: CreditItemInput,
}

/// Validated item ready to be charged to an entry.
///
/// ## Invariants
/// - `product` is trimmed and non-empty.
/// - `cost` and `unit_price` are non-negative with centavo precision.
/// - `quantity` is at least one; it defaults to one and `unit_price` to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCreditItem {
    product: String,
    cost: Money,
    quantity: Quantity,
    unit_price: Money,
}

impl NewCreditItem {
    /// Build an item from already-typed values.
    pub fn new(
        product: &str,
        cost: Money,
        quantity: Quantity,
        unit_price: Money,
    ) -> Result<Self, LedgerValidationError> {
        let product = product.trim();
        if product.is_empty() {
            return Err(LedgerValidationError::EmptyProduct);
        }
        Ok(Self {
            product: product.to_owned(),
            cost,
            quantity,
            unit_price,
        })
    }

    pub fn product(&self) -> &str {
        self.product.as_str()
    }

    pub fn cost(&self) -> Money {
        self.cost
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
}

impl TryFrom<CreditItemInput> for NewCreditItem {
    type Error = LedgerValidationError;

    fn try_from(value: CreditItemInput) -> Result<Self, Self::Error> {
        if value.product.trim().is_empty() {
            return Err(LedgerValidationError::EmptyProduct);
        }
        if value.cost.trim().is_empty() {
            return Err(LedgerValidationError::EmptyCost);
        }
        let cost = Money::parse(&value.cost).map_err(LedgerValidationError::InvalidCost)?;
        let quantity = match non_blank(value.quantity) {
            Some(raw) => Quantity::parse(&raw)
                .ok_or(LedgerValidationError::InvalidQuantity { value: raw })?,
            None => Quantity::ONE,
        };
        let unit_price = match non_blank(value.unit_price) {
            Some(raw) => Money::parse(&raw).map_err(LedgerValidationError::InvalidUnitPrice)?,
            None => Money::ZERO,
        };
        Self::new(&value.product, cost, quantity, unit_price)
    }
}

/// Validated entry together with its first item.
///
/// # Examples
/// ```
/// use utang::domain::{CreditEntryInput, CreditItemInput, NewCreditEntry};
///
/// let entry = NewCreditEntry::try_from(CreditEntryInput {
///     customer_name: " Ana ".into(),
///     phone_number: None,
///     estimated_payment_date: "2025-02-15".into(),
///     first_item: CreditItemInput {
///         product: "Rice 5kg".into(),
///         cost: "250.00".into(),
///         quantity: None,
///         unit_price: None,
///     },
/// })
/// .unwrap();
/// assert_eq!(entry.customer_name(), "Ana");
/// assert_eq!(entry.first_item().quantity().get(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCreditEntry {
    customer_name: String,
    phone_number: Option<String>,
    estimated_payment_date: NaiveDate,
    first_item: NewCreditItem,
}

impl NewCreditEntry {
    pub fn customer_name(&self) -> &str {
        self.customer_name.as_str()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn estimated_payment_date(&self) -> NaiveDate {
        self.estimated_payment_date
    }

    pub fn first_item(&self) -> &NewCreditItem {
        &self.first_item
    }
}

impl TryFrom<CreditEntryInput> for NewCreditEntry {
    type Error = LedgerValidationError;

    fn try_from(value: CreditEntryInput) -> Result<Self, Self::Error> {
        let customer_name = value.customer_name.trim();
        if customer_name.is_empty() {
            return Err(LedgerValidationError::EmptyCustomerName);
        }
        let raw_date = value.estimated_payment_date.trim();
        if raw_date.is_empty() {
            return Err(LedgerValidationError::EmptyPaymentDate);
        }
        let estimated_payment_date = NaiveDate::parse_from_str(raw_date, PAYMENT_DATE_FORMAT)
            .map_err(|_| LedgerValidationError::InvalidPaymentDate {
                value: raw_date.to_owned(),
            })?;
        let first_item = NewCreditItem::try_from(value.first_item)?;

        Ok(Self {
            customer_name: customer_name.to_owned(),
            phone_number: non_blank(value.phone_number),
            estimated_payment_date,
            first_item,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}
