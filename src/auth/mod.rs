pub mod credentials;
pub mod oauth;
pub mod token_manager;
pub mod token_store;
pub mod tokens_file;

/// Google APIs the report talks to, each with its own scope and token cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Gmail,
    Sheets,
}

impl ServiceType {
    pub fn scope(self) -> &'static str {
        match self {
            ServiceType::Gmail => "https://www.googleapis.com/auth/gmail.readonly",
            ServiceType::Sheets => "https://www.googleapis.com/auth/spreadsheets",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ServiceType::Gmail => "gmail",
            ServiceType::Sheets => "sheets",
        }
    }
}
