/*!
Key pairs and password-protected private keys.

Keys are opaque byte strings to everything except the engine. A private
key may be stored encrypted under a password:

```text
EncryptedPrivateKey ::= SEQUENCE {
    version     INTEGER,
    salt        OCTET STRING,
    nonce       OCTET STRING,
    ciphertext  OCTET STRING }
```

The key-encryption key is HKDF-SHA256 of the password and salt; the key
itself is sealed with ChaCha20-Poly1305.
*/

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::core::asn1::{Asn1Compatible, Asn1Reader, Asn1Writer};
use crate::core::constants::{sizes, VERSION};
use crate::core::engine::{self, aead, kem, random, sign, SignatureAlgorithm};
use crate::core::error::{EngineCode, Result};

const PRIVATE_KEY_INFO: &[u8] = b"pqc-toolkit private key encryption";

/// Public and private key bytes generated together.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    public_key: Vec<u8>,
    private_key: Vec<u8>,
}

impl KeyPair {
    pub fn new(public_key: Vec<u8>, private_key: Vec<u8>) -> Self {
        Self { public_key, private_key }
    }

    /// Fresh signing key pair
    pub fn generate(algorithm: SignatureAlgorithm) -> Self {
        let (public_key, private_key) = sign::generate_keypair(algorithm);
        Self { public_key, private_key }
    }

    /// Fresh signing key pair whose private key is sealed under `password`
    pub fn generate_with_password(algorithm: SignatureAlgorithm, password: &[u8]) -> Result<Self> {
        let (public_key, private_key) = sign::generate_keypair(algorithm);
        let private_key = Zeroizing::new(private_key);
        Ok(Self {
            public_key,
            private_key: encrypt_private_key(&private_key, password)?,
        })
    }

    /// Fresh key pair for receiving stream cipher content keys
    pub fn generate_recipient() -> Self {
        let (public_key, private_key) = kem::generate_keypair();
        Self { public_key, private_key }
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &format_args!("{} bytes", self.public_key.len()))
            .finish_non_exhaustive()
    }
}

struct EncryptedPrivateKey {
    salt: Vec<u8>,
    nonce: Vec<u8>,
    ciphertext: Vec<u8>,
}

impl Asn1Compatible for EncryptedPrivateKey {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        let mut len = writer.write_octet_string(&self.ciphertext);
        len += writer.write_octet_string(&self.nonce);
        len += writer.write_octet_string(&self.salt);
        len += writer.write_integer(u64::from(VERSION));
        Ok(len + writer.write_sequence(len))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let version = seq.read_integer()?;
        if version != u64::from(VERSION) {
            return crate::encoding_err!("unsupported private key version {}", version);
        }
        let sealed = Self {
            salt: seq.read_octet_string()?,
            nonce: seq.read_octet_string()?,
            ciphertext: seq.read_octet_string()?,
        };
        seq.finish()?;
        Ok(sealed)
    }
}

/// Seal `private_key` under `password`
pub fn encrypt_private_key(private_key: &[u8], password: &[u8]) -> Result<Vec<u8>> {
    let salt = random::random_bytes(sizes::SALT_BYTES);
    let nonce = random::random_bytes(sizes::chacha::NONCE_BYTES);
    let kek = aead::derive_key(password, &salt, PRIVATE_KEY_INFO)?;
    let ciphertext = aead::seal(&kek, &nonce, &[], private_key)?;
    EncryptedPrivateKey { salt, nonce, ciphertext }.to_asn1()
}

/// Recover a private key sealed by [`encrypt_private_key`].
///
/// A wrong password is reported as a password mismatch by the engine.
pub fn decrypt_private_key(encrypted: &[u8], password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let sealed = EncryptedPrivateKey::from_asn1(encrypted)?;
    let kek = aead::derive_key(password, &sealed.salt, PRIVATE_KEY_INFO)?;
    let key = aead::open(&kek, &sealed.nonce, &[], &sealed.ciphertext)
        .map_err(|_| EngineCode(engine::ERR_PASSWORD_MISMATCH))?;
    Ok(key)
}

/// Plain private key bytes, decrypting first when a password is given
pub(crate) fn resolve_private_key(private_key: &[u8], password: Option<&[u8]>) -> Result<Zeroizing<Vec<u8>>> {
    match password {
        Some(password) => decrypt_private_key(private_key, password),
        None => Ok(Zeroizing::new(private_key.to_vec())),
    }
}
