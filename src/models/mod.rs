pub mod debit_card;
pub mod exit_code;
pub mod settings;
