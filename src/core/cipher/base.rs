/*!
Recipient bookkeeping shared by the ciphers.

Every message gets a fresh content key, wrapped once per recipient. Key
recipients wrap it under a Kyber768 shared secret; password recipients wrap
it under an HKDF key drawn from the password and a random salt.
*/

use tracing::warn;
use zeroize::Zeroizing;

use crate::core::constants::sizes::{self, chacha, kyber};
use crate::core::engine::{self, aead, kem, random};
use crate::core::error::{EngineCode, Result};
use super::content_info::{ContentInfo, Recipient};

const KEY_RECIPIENT_INFO: &[u8] = b"pqc-toolkit key recipient";
const PASSWORD_RECIPIENT_INFO: &[u8] = b"pqc-toolkit password recipient";

enum PendingRecipient {
    Key { id: Vec<u8>, public_key: Vec<u8> },
    Password { password: Zeroizing<Vec<u8>> },
}

/// Recipients registered with a cipher.
#[derive(Default)]
pub struct CipherBase {
    recipients: Vec<PendingRecipient>,
}

impl CipherBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Kyber768 public key recipient identified by `id`
    pub fn add_key_recipient(&mut self, id: &[u8], public_key: &[u8]) -> Result<()> {
        if public_key.len() != kyber::PUBLIC_KEY_BYTES {
            return Err(EngineCode(engine::ERR_INVALID_PUBLIC_KEY).into());
        }
        self.remove_key_recipient(id);
        self.recipients.push(PendingRecipient::Key {
            id: id.to_vec(),
            public_key: public_key.to_vec(),
        });
        Ok(())
    }

    pub fn remove_key_recipient(&mut self, id: &[u8]) {
        self.recipients
            .retain(|r| !matches!(r, PendingRecipient::Key { id: rid, .. } if rid.as_slice() == id));
    }

    pub fn key_recipient_exists(&self, id: &[u8]) -> bool {
        self.recipients
            .iter()
            .any(|r| matches!(r, PendingRecipient::Key { id: rid, .. } if rid.as_slice() == id))
    }

    pub fn add_password_recipient(&mut self, password: &[u8]) -> Result<()> {
        if password.is_empty() {
            return crate::argument_range_err!("password must not be empty");
        }
        self.remove_password_recipient(password);
        self.recipients.push(PendingRecipient::Password {
            password: Zeroizing::new(password.to_vec()),
        });
        Ok(())
    }

    pub fn remove_password_recipient(&mut self, password: &[u8]) {
        self.recipients
            .retain(|r| !matches!(r, PendingRecipient::Password { password: p } if p.as_slice() == password));
    }

    pub fn remove_all_recipients(&mut self) {
        self.recipients.clear();
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Generate a content key and a header every recipient can open.
    ///
    /// Fails with `InvalidState` while no recipient is registered.
    pub fn seal_content_key(&self, chunk_size: Option<u64>) -> Result<(Zeroizing<Vec<u8>>, ContentInfo)> {
        if self.recipients.is_empty() {
            return crate::invalid_state_err!("at least one recipient", "none");
        }
        let content_key = Zeroizing::new(random::random_bytes(chacha::KEY_BYTES));
        let recipients = self
            .recipients
            .iter()
            .map(|pending| wrap_for(pending, &content_key))
            .collect::<Result<Vec<_>>>()?;
        let info = ContentInfo {
            nonce: random::random_bytes(chacha::NONCE_BYTES),
            recipients,
            chunk_size,
        };
        Ok((content_key, info))
    }

    /// Recover the content key as the holder of the private key registered under `id`
    pub fn open_with_key(info: &ContentInfo, id: &[u8], private_key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let Some(Recipient::Key { kem_ciphertext, wrap_nonce, wrapped_key, .. }) = info.key_recipient(id) else {
            warn!("no key recipient matches the given id");
            return Err(EngineCode(engine::ERR_RECIPIENT_NOT_FOUND).into());
        };
        let shared = kem::decapsulate(kem_ciphertext, private_key)?;
        let kek = aead::derive_key(&shared, id, KEY_RECIPIENT_INFO)?;
        aead::open(&kek, wrap_nonce, id, wrapped_key)
            .map_err(|_| EngineCode(engine::ERR_DECRYPTION_FAILED).into())
    }

    /// Recover the content key from the first password recipient `password` unlocks
    pub fn open_with_password(info: &ContentInfo, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        for recipient in info.password_recipients() {
            if let Recipient::Password { salt, wrap_nonce, wrapped_key } = recipient {
                let kek = aead::derive_key(password, salt, PASSWORD_RECIPIENT_INFO)?;
                if let Ok(key) = aead::open(&kek, wrap_nonce, &[], wrapped_key) {
                    return Ok(key);
                }
            }
        }
        warn!("no password recipient could be unlocked");
        Err(EngineCode(engine::ERR_PASSWORD_RECIPIENT_NOT_FOUND).into())
    }
}

fn wrap_for(pending: &PendingRecipient, content_key: &[u8]) -> Result<Recipient> {
    let wrap_nonce = random::random_bytes(chacha::NONCE_BYTES);
    match pending {
        PendingRecipient::Key { id, public_key } => {
            let (shared, kem_ciphertext) = kem::encapsulate(public_key)?;
            let kek = aead::derive_key(&shared, id, KEY_RECIPIENT_INFO)?;
            let wrapped_key = aead::seal(&kek, &wrap_nonce, id, content_key)?;
            Ok(Recipient::Key {
                id: id.clone(),
                kem_ciphertext,
                wrap_nonce,
                wrapped_key,
            })
        }
        PendingRecipient::Password { password } => {
            let salt = random::random_bytes(sizes::SALT_BYTES);
            let kek = aead::derive_key(password, &salt, PASSWORD_RECIPIENT_INFO)?;
            let wrapped_key = aead::seal(&kek, &wrap_nonce, &[], content_key)?;
            Ok(Recipient::Password { salt, wrap_nonce, wrapped_key })
        }
    }
}

/// Forward the recipient management methods to a `base: CipherBase` field.
macro_rules! delegate_recipients {
    () => {
        /// Add a Kyber768 public key recipient identified by `id`
        pub fn add_key_recipient(&mut self, id: &[u8], public_key: &[u8]) -> Result<()> {
            self.base.add_key_recipient(id, public_key)
        }

        pub fn remove_key_recipient(&mut self, id: &[u8]) {
            self.base.remove_key_recipient(id)
        }

        pub fn key_recipient_exists(&self, id: &[u8]) -> bool {
            self.base.key_recipient_exists(id)
        }

        /// Add a password recipient; an empty password is an `ArgumentRange` error
        pub fn add_password_recipient(&mut self, password: &[u8]) -> Result<()> {
            self.base.add_password_recipient(password)
        }

        pub fn remove_password_recipient(&mut self, password: &[u8]) {
            self.base.remove_password_recipient(password)
        }

        pub fn remove_all_recipients(&mut self) {
            self.base.remove_all_recipients()
        }
    };
}

pub(super) use delegate_recipients;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::key_pair::KeyPair;

    #[test]
    fn test_recipient_set() -> Result<()> {
        let keys = KeyPair::generate_recipient();
        let mut base = CipherBase::new();
        base.add_key_recipient(b"alice", keys.public_key())?;
        base.add_key_recipient(b"alice", keys.public_key())?;
        base.add_password_recipient(b"pwd")?;
        assert_eq!(base.recipient_count(), 2);

        base.remove_key_recipient(b"alice");
        assert!(!base.key_recipient_exists(b"alice"));
        base.remove_password_recipient(b"pwd");
        assert_eq!(base.recipient_count(), 0);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_recipients() {
        let mut base = CipherBase::new();
        let err = base.add_key_recipient(b"alice", &[0u8; 10]).unwrap_err();
        assert_eq!(err.engine_code(), Some(engine::ERR_INVALID_PUBLIC_KEY));
        assert!(matches!(base.add_password_recipient(b""), Err(Error::ArgumentRange(_))));
        assert!(matches!(base.seal_content_key(None), Err(Error::InvalidState { .. })));
    }

    #[test]
    fn test_every_recipient_opens_the_same_key() -> Result<()> {
        let keys = KeyPair::generate_recipient();
        let mut base = CipherBase::new();
        base.add_key_recipient(b"alice", keys.public_key())?;
        base.add_password_recipient(b"first")?;
        base.add_password_recipient(b"second")?;
        let (content_key, info) = base.seal_content_key(Some(64))?;
        assert_eq!(info.chunk_size, Some(64));
        assert_eq!(info.nonce.len(), chacha::NONCE_BYTES);

        assert_eq!(CipherBase::open_with_key(&info, b"alice", keys.private_key())?, content_key);
        assert_eq!(CipherBase::open_with_password(&info, b"second")?, content_key);
        let err = CipherBase::open_with_password(&info, b"third").unwrap_err();
        assert_eq!(err.engine_code(), Some(engine::ERR_PASSWORD_RECIPIENT_NOT_FOUND));
        Ok(())
    }
}
