use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A debit card as exchanged between the wallet and the card service.
///
/// Plain value object: no field is validated, `id` uniqueness and the
/// `customer_id` reference are owned by whoever stores the card.
/// Two cards are equal when all three fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitCard {
    #[serde(default, deserialize_with = "nullable_string")]
    id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    card_number: String,
    #[serde(default, deserialize_with = "nullable_string")]
    customer_id: String,
}

/// `null` and absent keys both read as the empty string.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl DebitCard {
    pub fn new(
        id: impl Into<String>,
        card_number: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            card_number: card_number.into(),
            customer_id: customer_id.into(),
        }
    }

    pub fn builder() -> DebitCardBuilder {
        DebitCardBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn set_card_number(&mut self, card_number: impl Into<String>) {
        self.card_number = card_number.into();
    }

    pub fn set_customer_id(&mut self, customer_id: impl Into<String>) {
        self.customer_id = customer_id.into();
    }
}

impl fmt::Display for DebitCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DebitCard(id={}, cardNumber={}, customerId={})",
            self.id, self.card_number, self.customer_id
        )
    }
}

/// Step-by-step assembly of a [`DebitCard`].
///
/// Setters may be called in any order; fields never set end up empty.
#[derive(Debug, Clone, Default)]
pub struct DebitCardBuilder {
    id: String,
    card_number: String,
    customer_id: String,
}

impl DebitCardBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn card_number(mut self, card_number: impl Into<String>) -> Self {
        self.card_number = card_number.into();
        self
    }

    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = customer_id.into();
        self
    }

    pub fn build(self) -> DebitCard {
        DebitCard {
            id: self.id,
            card_number: self.card_number,
            customer_id: self.customer_id,
        }
    }
}
