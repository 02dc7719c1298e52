/// Why a message could not be handed to the mail system.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// Sender or recipient is not a valid mailbox.
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not build message: {0}")]
    Build(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_names_the_problem() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Could not build message: missing body");
    }

    #[test]
    fn bad_address_converts() {
        let err: MailError = "not-an-email"
            .parse::<lettre::Address>()
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Invalid mail address"));
    }
}
