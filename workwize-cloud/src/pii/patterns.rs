//! Free-text redaction patterns

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

pub const EMAIL_TOKEN: &str = "[EMAIL_REDACTED]";
pub const PHONE_TOKEN: &str = "[PHONE_REDACTED]";
pub const SSN_TOKEN: &str = "[SSN_REDACTED]";
pub const CARD_TOKEN: &str = "[CARD_REDACTED]";
pub const ADDRESS_TOKEN: &str = "[ADDRESS_REDACTED]";
pub const NAME_TOKEN: &str = "[NAME_REDACTED]";

/// Fewest digits a separator-joined run needs to count as a phone number
const MIN_PHONE_DIGITS: usize = 9;

/// Compiled pattern set, applied in declaration order.
pub struct Patterns {
    email: Regex,
    card: Regex,
    ssn: Regex,
    phone: Regex,
    street: Regex,
    honorific: Regex,
}

static PATTERNS: LazyLock<Result<Patterns, regex::Error>> = LazyLock::new(Patterns::compile);

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")?,
            card: Regex::new(r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b")?,
            ssn: Regex::new(r"\b\d{3}-\d{2}-\d{4}\b")?,
            phone: Regex::new(r"[+(]?\d[\d .()-]{8,}\d")?,
            street: RegexBuilder::new(
                r"\b\d+\s+[\w ]{1,50}?\b(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd|Way|Court|Ct|Circle|Cir)\b\.?",
            )
            .case_insensitive(true)
            .build()?,
            honorific: Regex::new(r"\b(?:Mr|Mrs|Ms|Miss|Dr|Prof)\.?\s+[A-Z][A-Za-z'-]+")?,
        })
    }

    /// The process-wide pattern set.
    pub fn get() -> Result<&'static Patterns, &'static regex::Error> {
        PATTERNS.as_ref()
    }

    /// Replace every embedded identifier in `text` with its token.
    pub fn redact(&self, text: &str) -> String {
        let text = self.email.replace_all(text, EMAIL_TOKEN);
        let text = self.card.replace_all(&text, CARD_TOKEN);
        let text = self.ssn.replace_all(&text, SSN_TOKEN);
        let text = self.phone.replace_all(&text, |caps: &regex::Captures| {
            let run = &caps[0];
            if run.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS {
                PHONE_TOKEN.to_string()
            } else {
                run.to_string()
            }
        });
        let text = self.street.replace_all(&text, ADDRESS_TOKEN);
        let text = self.honorific.replace_all(&text, NAME_TOKEN);
        text.into_owned()
    }
}

/// Replace whole-word, case-insensitive occurrences of `names` with the name token.
pub fn redact_names(text: &str, names: &[String]) -> String {
    if names.is_empty() {
        return text.to_string();
    }
    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    match RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(text, NAME_TOKEN).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "Name pattern rejected, falling back to literal replace");
            names
                .iter()
                .fold(text.to_string(), |acc, name| acc.replace(name.as_str(), NAME_TOKEN))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redact(text: &str) -> String {
        Patterns::get().unwrap().redact(text)
    }

    #[test]
    fn test_email() {
        assert_eq!(
            redact("Contact jane.doe@example.com today"),
            "Contact [EMAIL_REDACTED] today"
        );
    }

    #[test]
    fn test_phone_formats() {
        assert_eq!(redact("call 555-123-4567"), "call [PHONE_REDACTED]");
        assert_eq!(redact("call 555.123.4567"), "call [PHONE_REDACTED]");
        assert_eq!(redact("call +31 6 1234 5678"), "call [PHONE_REDACTED]");
        assert_eq!(redact("call +44 (20) 7946-0958"), "call [PHONE_REDACTED]");
    }

    #[test]
    fn test_local_phone_formats() {
        for number in [
            "(555) 123-4567",
            "555 123 4567",
            "020 7946 0958",
            "06 12345678",
            "0612345678",
            "+1 (555) 123 4567",
            "030.1234.5678",
        ] {
            let out = redact(&format!("reach me on {number} after 5"));
            assert_eq!(out, "reach me on [PHONE_REDACTED] after 5", "{number}");
        }
    }

    #[test]
    fn test_short_numbers_kept() {
        for text in [
            "Returned 2024-01-15",
            "Box 12 of 30",
            "ticket 4417 (2 laptops)",
            "order 123456",
        ] {
            assert_eq!(redact(text), text);
        }
    }

    #[test]
    fn test_ssn_and_card() {
        assert_eq!(redact("ssn 123-45-6789"), "ssn [SSN_REDACTED]");
        assert_eq!(redact("card 4111 1111 1111 1111"), "card [CARD_REDACTED]");
        assert_eq!(redact("card 4111111111111111"), "card [CARD_REDACTED]");
    }

    #[test]
    fn test_street_address() {
        assert_eq!(
            redact("Deliver to 221 Baker Street please"),
            "Deliver to [ADDRESS_REDACTED] please"
        );
        assert_eq!(redact("at 12 main st."), "at [ADDRESS_REDACTED]");
    }

    #[test]
    fn test_honorific() {
        assert_eq!(
            redact("Approved by Mr. Jenkins"),
            "Approved by [NAME_REDACTED]"
        );
        assert_eq!(redact("ask Dr Who"), "ask [NAME_REDACTED]");
    }

    #[test]
    fn test_tokens_are_fixed_points() {
        let once = redact("mail a@b.io or 555-123-4567, 1 High Street, Mrs. Smith");
        assert_eq!(redact(&once), once);
        assert!(!once.contains("a@b.io"));
        assert!(!once.contains("555-123-4567"));
        assert!(!once.contains("High Street"));
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(redact("Screen cracked, replaced"), "Screen cracked, replaced");
    }

    #[test]
    fn test_redact_names() {
        let names = vec!["Alice".to_string(), "Wong".to_string()];
        assert_eq!(
            redact_names("alice returned the laptop; Wong confirmed", &names),
            "[NAME_REDACTED] returned the laptop; [NAME_REDACTED] confirmed"
        );
        assert_eq!(redact_names("Alicent kept it", &names), "Alicent kept it");
        assert_eq!(redact_names("no names", &[]), "no names");
    }
}
