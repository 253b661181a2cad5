pub mod card_client;
