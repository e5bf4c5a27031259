use bip39::{Language, Mnemonic};
use secrecy::{ExposeSecret, SecretString};
use wallet_utils::Seed;

use crate::error::WalletError;

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

/// Validate a single word against the BIP-39 word list
pub fn is_valid_word(word: &str) -> bool {
    Language::English.find_word(word).is_some()
}

/// BIP-39 seed for `phrase` and `passphrase`.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Seed, WalletError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(Seed::from(mnemonic.to_seed(passphrase)))
}

/// Caller-supplied secrets for one signing or derivation request.
///
/// The seed is recomputed for every request and dropped with it.
pub struct SigningContext {
    mnemonic: SecretString,
    passphrase: SecretString,
}

impl SigningContext {
    pub fn new(mnemonic: SecretString, passphrase: SecretString) -> Result<Self, WalletError> {
        if !validate_mnemonic(mnemonic.expose_secret()) {
            return Err(WalletError::InvalidMnemonic("invalid mnemonic phrase".into()));
        }
        Ok(Self {
            mnemonic,
            passphrase,
        })
    }

    pub fn seed(&self) -> Result<Seed, WalletError> {
        mnemonic_to_seed(self.mnemonic.expose_secret(), self.passphrase.expose_secret())
    }
}

impl std::fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningContext([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_validate_mnemonic() {
        assert!(validate_mnemonic(TEST_MNEMONIC));
        assert!(!validate_mnemonic("invalid mnemonic phrase here"));
        // bad checksum
        assert!(!validate_mnemonic(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon"
        ));
    }

    #[test]
    fn test_bip39_test_vector() {
        let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        assert_eq!(
            hex::encode(&*seed),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let plain = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        let with_pass = mnemonic_to_seed(TEST_MNEMONIC, "TREZOR").unwrap();
        assert_ne!(&*plain, &*with_pass);
        assert_eq!(with_pass.len(), 64);
    }

    #[test]
    fn test_invalid_mnemonic_to_seed() {
        assert!(matches!(
            mnemonic_to_seed("not a mnemonic", ""),
            Err(WalletError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_is_valid_word() {
        assert!(is_valid_word("abandon"));
        assert!(is_valid_word("zoo"));
        assert!(!is_valid_word("notaword"));
        assert!(!is_valid_word(""));
    }

    #[test]
    fn test_signing_context() {
        let ctx = SigningContext::new(
            SecretString::from(TEST_MNEMONIC.to_string()),
            SecretString::from(String::new()),
        )
        .unwrap();
        let seed = ctx.seed().unwrap();
        assert_eq!(&*seed, &*mnemonic_to_seed(TEST_MNEMONIC, "").unwrap());
        assert_eq!(format!("{ctx:?}"), "SigningContext([REDACTED])");
    }

    #[test]
    fn test_signing_context_rejects_bad_mnemonic() {
        let result = SigningContext::new(
            SecretString::from("abandon abandon".to_string()),
            SecretString::from(String::new()),
        );
        assert!(matches!(result, Err(WalletError::InvalidMnemonic(_))));
    }
}
