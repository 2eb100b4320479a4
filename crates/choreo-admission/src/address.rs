//! Notify address syntax verification
//!
//! Checks the shape of a callback address without any network access.
//! Dotted quads must be valid IPv4; anything else is held to hostname
//! label rules.

use crate::traits::{AddressError, AddressVerifier};

const MAX_HOSTNAME_LEN: usize = 253;

/// Default, dependency-free address verifier.
#[derive(Debug, Clone, Default)]
pub struct SyntaxAddressVerifier;

impl SyntaxAddressVerifier {
    pub fn new() -> Self {
        Self
    }

    fn verify_ipv4(address: &str) -> Result<(), AddressError> {
        let octets: Vec<&str> = address.split('.').collect();
        if octets.len() != 4 {
            return Err(AddressError::Malformed);
        }
        for octet in octets {
            if octet.is_empty() || octet.len() > 3 {
                return Err(AddressError::Malformed);
            }
            let value: u32 = octet.parse().map_err(|_| AddressError::Malformed)?;
            if value > 255 {
                return Err(AddressError::Malformed);
            }
        }
        Ok(())
    }

    fn verify_hostname(address: &str) -> Result<(), AddressError> {
        if address.len() > MAX_HOSTNAME_LEN {
            return Err(AddressError::Malformed);
        }
        for label in address.split('.') {
            if label.is_empty() || label.starts_with('-') || label.ends_with('-') {
                return Err(AddressError::Malformed);
            }
        }
        Ok(())
    }
}

impl AddressVerifier for SyntaxAddressVerifier {
    fn verify(&self, address: &str) -> Result<(), AddressError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AddressError::Blank);
        }
        if !address
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(AddressError::IllegalCharacters);
        }
        if address.chars().all(|c| c.is_ascii_digit() || c == '.') {
            Self::verify_ipv4(address)
        } else {
            Self::verify_hostname(address)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        let verifier = SyntaxAddressVerifier::new();
        assert!(verifier.verify("10.0.0.1").is_ok());
        assert!(verifier.verify("255.255.255.255").is_ok());
        assert!(verifier.verify("example.com").is_ok());
        assert!(verifier.verify("node-7.internal").is_ok());
    }

    #[test]
    fn test_five_octet_quad_is_malformed() {
        assert_eq!(
            SyntaxAddressVerifier::new().verify("1.2.3.4.5"),
            Err(AddressError::Malformed)
        );
    }

    #[test]
    fn test_octet_out_of_range() {
        assert_eq!(
            SyntaxAddressVerifier::new().verify("999.0.0.1"),
            Err(AddressError::Malformed)
        );
    }

    #[test]
    fn test_blank_address() {
        assert_eq!(
            SyntaxAddressVerifier::new().verify("  "),
            Err(AddressError::Blank)
        );
    }

    #[test]
    fn test_illegal_characters() {
        assert_eq!(
            SyntaxAddressVerifier::new().verify("host_name"),
            Err(AddressError::IllegalCharacters)
        );
    }

    #[test]
    fn test_hostname_label_rules() {
        let verifier = SyntaxAddressVerifier::new();
        assert_eq!(verifier.verify("-bad.com"), Err(AddressError::Malformed));
        assert_eq!(verifier.verify("bad-.com"), Err(AddressError::Malformed));
        assert_eq!(verifier.verify("double..dot"), Err(AddressError::Malformed));
    }
}
