//! Форма оплаты. Поля проверяются локально и никуда не отправляются.

use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Default, Validate)]
pub struct PaymentForm {
    #[validate(length(min = 1, message = "Cardholder name is required"))]
    pub cardholder: String,
    #[validate(custom(function = "card_number"))]
    pub card_number: String,
    #[validate(custom(function = "expiry"))]
    pub expiry: String,
    #[validate(custom(function = "cvc"))]
    pub cvc: String,
}

fn digits(value: &str) -> Option<String> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    compact.chars().all(|c| c.is_ascii_digit()).then_some(compact)
}

fn card_number(value: &str) -> Result<(), ValidationError> {
    match digits(value) {
        Some(d) if (12..=19).contains(&d.len()) => Ok(()),
        _ => Err(ValidationError::new("card_number")),
    }
}

// MM/YY
fn expiry(value: &str) -> Result<(), ValidationError> {
    let (mm, yy) = value.trim().split_once('/').ok_or_else(|| ValidationError::new("expiry"))?;
    let month: u32 = mm.parse().map_err(|_| ValidationError::new("expiry"))?;
    if !(1..=12).contains(&month) || yy.len() != 2 || yy.parse::<u32>().is_err() {
        return Err(ValidationError::new("expiry"));
    }
    Ok(())
}

fn cvc(value: &str) -> Result<(), ValidationError> {
    match digits(value) {
        Some(d) if d.len() == 3 || d.len() == 4 => Ok(()),
        _ => Err(ValidationError::new("cvc")),
    }
}
