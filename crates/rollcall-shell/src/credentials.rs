//! Credential validation for `login`.
//!
//! The shell only needs [`CredentialValidator`]. [`AccountTable`] is the
//! config-backed implementation: it keeps SHA-256 digests of the account
//! secrets and compares them in constant time.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use rollcall_types::{AccountConfig, PrivilegeLevel, RollcallError};

use crate::command::Secret;
use crate::privilege::Identity;

/// Decides whether a username/secret pair identifies an account.
pub trait CredentialValidator {
    fn validate(&self, username: &str, secret: &Secret) -> Option<Identity>;
}

impl<F> CredentialValidator for F
where
    F: Fn(&str, &Secret) -> Option<Identity>,
{
    fn validate(&self, username: &str, secret: &Secret) -> Option<Identity> {
        self(username, secret)
    }
}

/// Lowercase hex SHA-256 of `secret`, the form stored in config.
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

#[derive(Debug, Clone)]
struct Account {
    username: String,
    level: PrivilegeLevel,
    digest: [u8; 32],
}

/// Accounts loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct AccountTable {
    accounts: Vec<Account>,
}

impl AccountTable {
    pub fn from_config(accounts: &[AccountConfig]) -> Result<Self, RollcallError> {
        let accounts = accounts
            .iter()
            .map(|account| {
                let mut digest = [0u8; 32];
                hex::decode_to_slice(&account.secret_sha256, &mut digest).map_err(|e| {
                    RollcallError::CredentialError(format!(
                        "account '{}': invalid secret digest: {e}",
                        account.username
                    ))
                })?;
                Ok(Account {
                    username: account.username.clone(),
                    level: account.level,
                    digest,
                })
            })
            .collect::<Result<Vec<_>, RollcallError>>()?;
        Ok(Self { accounts })
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl CredentialValidator for AccountTable {
    fn validate(&self, username: &str, secret: &Secret) -> Option<Identity> {
        let provided = Sha256::digest(secret.expose().as_bytes());
        let account = self.accounts.iter().find(|a| a.username == username);

        // Unknown users still pay for one comparison.
        let expected = account.map_or([0u8; 32], |a| a.digest);
        let matched: bool = expected[..].ct_eq(provided.as_slice()).into();

        match account {
            Some(a) if matched => Some(Identity::new(a.username.clone(), a.level)),
            _ => None,
        }
    }
}
