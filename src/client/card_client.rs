use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::logger;
use crate::models::debit_card::DebitCard;
use crate::models::settings::Settings;
use crate::utils::codec;
use crate::utils::errors::{CardRequestError, PayloadFormat};

/// Read-only client for the card service.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CardClient {
    http: reqwest::Client,
    card_server: Url,
}

impl CardClient {
    /// Builds a client against `settings.card_server`, bounding every request
    /// by `settings.request_timeout_secs`.
    ///
    /// # Returns
    /// * `Ok(CardClient)` - Ready to issue lookups.
    /// * `Err(CardRequestError::InvalidCardServerUrl)` - If the configured url cannot be used as a base.
    /// * `Err(CardRequestError::CardServiceUnavailable)` - If the HTTP client cannot be initialized.
    pub fn new(settings: &Settings) -> Result<Self, CardRequestError> {
        let card_server = Url::parse(settings.card_server.trim())
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| CardRequestError::InvalidCardServerUrl(settings.card_server.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| CardRequestError::CardServiceUnavailable(e.to_string()))?;

        Ok(Self { http, card_server })
    }

    /// Request the card service for one debit card by ID.
    ///
    /// # Arguments
    /// * `card_id` - Identifier of the card, sent as a single path segment.
    ///
    /// # Returns
    /// * `Ok(DebitCard)` - The card as stored by the card service.
    /// * `Err(CardRequestError::CardNotFound)` - On `404 Not Found`.
    /// * `Err(CardRequestError::InvalidResponseBody)` - If the body is not a debit card payload.
    /// * `Err(CardRequestError::CardServiceUnavailable)` - On connection failure or timeout.
    /// * `Err(CardRequestError::UnexpectedCardRequestError)` - On any other status.
    pub async fn get_debit_card(&self, card_id: &str) -> Result<DebitCard, CardRequestError> {
        logger!(DEBUG, "[CARDS] Getting debit card `{card_id}`");
        let api_url = self.debit_cards_url(&[card_id]);

        let card = self
            .request::<DebitCard>(api_url, card_id, "debit card")
            .await?;

        logger!(DEBUG, "[CARDS] Retrieved debit card `{card_id}`: {card}");
        Ok(card)
    }

    /// Request the card service for every debit card owned by a customer.
    ///
    /// # Arguments
    /// * `customer_id` - Identifier of the customer, sent as a single path segment.
    ///
    /// # Returns
    /// * `Ok(Vec<DebitCard>)` - The customer's cards, possibly empty.
    /// * `Err(CardRequestError)` - Same status mapping as [`CardClient::get_debit_card`],
    ///   with `CardNotFound` carrying the customer id.
    pub async fn get_debit_cards_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<DebitCard>, CardRequestError> {
        logger!(INFO, "[CARDS] Fetching debit cards for customer `{customer_id}`");
        let api_url = self.debit_cards_url(&["customer", customer_id]);

        let cards = self
            .request::<Vec<DebitCard>>(api_url, customer_id, "debit cards for customer")
            .await?;

        logger!(
            DEBUG,
            "[CARDS] Retrieved {} debit cards for customer `{customer_id}`",
            cards.len()
        );
        Ok(cards)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        api_url: Url,
        subject_id: &str,
        subject: &str,
    ) -> Result<T, CardRequestError> {
        let response = match self.http.get(api_url).send().await {
            Ok(response) => response,
            Err(error) => {
                logger!(ERROR, "[CARDS] Error retrieving {subject} `{subject_id}` ({error})");
                return Err(CardRequestError::CardServiceUnavailable(error.to_string()));
            }
        };

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| CardRequestError::CardServiceUnavailable(e.to_string()))?;

                codec::decode::<T>(&body, PayloadFormat::Json).map_err(|e| {
                    logger!(ERROR, "[CARDS] Error retrieving {subject} `{subject_id}` ({e})");
                    CardRequestError::from(e)
                })
            }
            StatusCode::NOT_FOUND => {
                logger!(WARN, "[CARDS] No {subject} `{subject_id}` found");
                Err(CardRequestError::CardNotFound(subject_id.to_string()))
            }
            status => {
                let response_body = response.text().await.unwrap_or("NO MESSAGE".to_string());
                logger!(
                    ERROR,
                    "[CARDS] Error retrieving {subject} `{subject_id}` ({status}: {response_body})"
                );
                Err(CardRequestError::UnexpectedCardRequestError(format!(
                    "{status}: {response_body}"
                )))
            }
        }
    }

    /// `{card_server}/debit-cards/<segments...>`, each segment percent-encoded.
    fn debit_cards_url(&self, segments: &[&str]) -> Url {
        let mut url = self.card_server.clone();
        // `new` rejects cannot-be-a-base urls, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("debit-cards").extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(card_server: &str) -> Result<CardClient, CardRequestError> {
        let settings = Settings {
            card_server: card_server.to_string(),
            request_timeout_secs: 1,
            log_level: "ERROR".to_string(),
        };
        CardClient::new(&settings)
    }

    #[test]
    fn test_url_appends_card_path() {
        let client = client_for("http://card-service").unwrap();
        assert_eq!(
            client.debit_cards_url(&["c1"]).as_str(),
            "http://card-service/debit-cards/c1"
        );
    }

    #[test]
    fn test_url_tolerates_trailing_slash_and_prefix() {
        let client = client_for("http://localhost:8085/api/").unwrap();
        assert_eq!(
            client.debit_cards_url(&["c1"]).as_str(),
            "http://localhost:8085/api/debit-cards/c1"
        );
    }

    #[test]
    fn test_card_id_is_a_single_segment() {
        let client = client_for("http://card-service").unwrap();
        assert_eq!(
            client.debit_cards_url(&["a/b"]).as_str(),
            "http://card-service/debit-cards/a%2Fb"
        );
    }

    #[test]
    fn test_customer_url_encodes_customer_segment() {
        let client = client_for("http://card-service").unwrap();
        assert_eq!(
            client.debit_cards_url(&["customer", "u 9/x"]).as_str(),
            "http://card-service/debit-cards/customer/u%209%2Fx"
        );
    }

    #[test]
    fn test_invalid_card_server_is_rejected() {
        assert!(matches!(
            client_for("not a url"),
            Err(CardRequestError::InvalidCardServerUrl(_))
        ));
        assert!(matches!(
            client_for("mailto:cards@example.com"),
            Err(CardRequestError::InvalidCardServerUrl(_))
        ));
    }
}
