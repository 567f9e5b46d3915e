/// The only card number the sandbox payment step accepts.
pub const ACCEPTED_TEST_CARD: &str = "1111222233334444";

/// Validate the payment details submitted with a booking. Runs before any
/// booking record is written; a rejection here leaves the store untouched.
pub fn validate_payment(card_number: &str, card_name: &str) -> Result<(), String> {
    if card_number.trim() != ACCEPTED_TEST_CARD {
        return Err(format!(
            "Invalid card details. Use {} to proceed",
            ACCEPTED_TEST_CARD
        ));
    }
    if card_name.trim().is_empty() {
        return Err("Cardholder name is required".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_test_card_passes() {
        assert!(validate_payment("1111222233334444", "Jo Bloggs").is_ok());
        assert!(validate_payment(" 1111222233334444 ", "Jo Bloggs").is_ok());
    }

    #[test]
    fn any_other_card_is_rejected() {
        assert!(validate_payment("4242424242424242", "Jo Bloggs").is_err());
        assert!(validate_payment("", "Jo Bloggs").is_err());
    }

    #[test]
    fn blank_cardholder_name_is_rejected() {
        assert!(validate_payment("1111222233334444", "  ").is_err());
    }
}
