use clap::{Parser, Subcommand, ValueEnum};

use wallet_card::client::card_client::CardClient;
use wallet_card::logger;
use wallet_card::models::debit_card::DebitCard;
use wallet_card::models::exit_code::{ExitCode, ExitStatus};
use wallet_card::models::settings::Settings;
use wallet_card::utils::codec;
use wallet_card::utils::errors::{DeserializationError, PayloadFormat, SerializationError};
use wallet_card::utils::logger::Logger;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Cbor,
}

impl From<Format> for PayloadFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => PayloadFormat::Json,
            Format::Cbor => PayloadFormat::Cbor,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode a debit card. CBOR is printed as hex.
    Encode {
        #[arg(long)]
        id: String,
        #[arg(long)]
        card_number: String,
        #[arg(long)]
        customer_id: String,
    },

    /// Decode a debit card payload (CBOR given as hex) and print it.
    Decode { payload: String },

    /// Fetch a debit card from the card service.
    Fetch { card_id: String },

    /// Fetch every debit card owned by a customer, one payload per line.
    Customer { customer_id: String },
}

#[derive(Debug, Parser)]
#[command(name = "wallet-card", about = "Debit card records for the digital wallet")]
struct Opt {
    /// Wire format for printed and parsed payloads.
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    format: Format,

    #[command(subcommand)]
    cmd: Command,
}

/// Encodes a card for stdout: JSON as text, CBOR as lowercase hex.
fn render_card(card: &DebitCard, format: PayloadFormat) -> Result<String, SerializationError> {
    let payload = codec::encode(card, format)?;
    Ok(match format {
        PayloadFormat::Json => String::from_utf8_lossy(&payload).into_owned(),
        PayloadFormat::Cbor => hex::encode(payload),
    })
}

fn print_card(card: &DebitCard, format: PayloadFormat) -> Result<(), ExitStatus> {
    println!("{}", render_card(card, format)?);
    Ok(())
}

fn load_client() -> Result<CardClient, ExitStatus> {
    let settings = Settings::load()?;
    Logger::set_level(settings.log_level()?);
    logger!(DEBUG, "Using card service at `{}`", settings.card_server);

    Ok(CardClient::new(&settings)?)
}

fn decode_card(payload: &str, format: PayloadFormat) -> Result<DebitCard, DeserializationError> {
    match format {
        PayloadFormat::Json => codec::decode(payload.as_bytes(), format),
        PayloadFormat::Cbor => {
            let bytes = hex::decode(payload.trim()).map_err(|e| {
                DeserializationError::MalformedPayload {
                    format,
                    reason: e.to_string(),
                }
            })?;
            codec::decode(&bytes, format)
        }
    }
}

async fn run(opt: Opt) -> Result<(), ExitStatus> {
    let format = PayloadFormat::from(opt.format);
    match opt.cmd {
        Command::Encode {
            id,
            card_number,
            customer_id,
        } => {
            let card = DebitCard::builder()
                .id(id)
                .card_number(card_number)
                .customer_id(customer_id)
                .build();
            print_card(&card, format)
        }
        Command::Decode { payload } => {
            let card = decode_card(&payload, format)?;
            println!("{card}");
            Ok(())
        }
        Command::Fetch { card_id } => {
            let card = load_client()?.get_debit_card(&card_id).await?;
            print_card(&card, format)
        }
        Command::Customer { customer_id } => {
            let cards = load_client()?
                .get_debit_cards_by_customer(&customer_id)
                .await?;
            for card in &cards {
                print_card(card, format)?;
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let opt = Opt::parse();
    if let Err(status) = run(opt).await {
        logger!(ERROR, "{}", status.reason);
        std::process::exit(status.code);
    }
    std::process::exit(ExitCode::Success as i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DebitCard {
        DebitCard::new("c1", "4111111111111111", "u9")
    }

    #[test]
    fn test_cbor_hex_output_decodes_back() {
        let rendered = render_card(&sample(), PayloadFormat::Cbor).unwrap();
        assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
        // CBOR map with three entries.
        assert!(rendered.starts_with("a3"));

        let decoded = decode_card(&rendered, PayloadFormat::Cbor).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_json_output_decodes_back() {
        let rendered = render_card(&sample(), PayloadFormat::Json).unwrap();
        assert_eq!(
            rendered,
            r#"{"id":"c1","cardNumber":"4111111111111111","customerId":"u9"}"#
        );
        assert_eq!(decode_card(&rendered, PayloadFormat::Json).unwrap(), sample());
    }

    #[test]
    fn test_invalid_hex_is_malformed_cbor() {
        let result = decode_card("zz-not-hex", PayloadFormat::Cbor);
        assert!(matches!(
            result,
            Err(DeserializationError::MalformedPayload { format: PayloadFormat::Cbor, .. })
        ));
    }

    #[test]
    fn test_invalid_hex_exits_with_malformed_payload_code() {
        let error = decode_card("0g", PayloadFormat::Cbor).unwrap_err();
        let status = ExitStatus::from(error);
        assert_eq!(status.code, ExitCode::MalformedPayload as i32);
    }

    #[test]
    fn test_format_accepted_after_each_subcommand() {
        let invocations: [&[&str]; 4] = [
            &[
                "wallet-card", "encode", "--id", "c1", "--card-number", "4111", "--customer-id", "u9",
                "--format", "cbor",
            ],
            &["wallet-card", "decode", "a0", "--format", "cbor"],
            &["wallet-card", "fetch", "c1", "--format", "cbor"],
            &["wallet-card", "customer", "u9", "-f", "cbor"],
        ];

        for args in invocations {
            let opt = Opt::try_parse_from(args.iter().copied()).unwrap();
            assert!(matches!(opt.format, Format::Cbor), "{args:?}");
        }
    }

    #[test]
    fn test_format_still_accepted_before_subcommand() {
        let opt = Opt::try_parse_from(["wallet-card", "--format", "cbor", "fetch", "c1"]).unwrap();
        assert!(matches!(opt.format, Format::Cbor));
        assert!(matches!(opt.cmd, Command::Fetch { card_id } if card_id == "c1"));
    }

    #[test]
    fn test_format_defaults_to_json() {
        let opt = Opt::try_parse_from(["wallet-card", "decode", "{}"]).unwrap();
        assert!(matches!(opt.format, Format::Json));
    }
}
