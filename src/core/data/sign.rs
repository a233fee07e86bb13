/*!
Detached signatures over identity artifacts.

```text
Sign ::= SEQUENCE {
    id                   [0] SignId OPTIONAL,  -- omitted when empty
    hashName             UTF8String,
    signedDigest         OCTET STRING,
    signerCertificateId  UTF8String }
```
*/

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::asn1::{Asn1Compatible, Asn1Reader, Asn1Writer};
use crate::core::engine::{sign, HashAlgorithm};
use crate::core::error::{Error, Result};
use crate::core::key_pair::resolve_private_key;
use crate::core::utils::base64_bytes;
use super::ids::SignId;

const SIGN_ID_TAG: u8 = 0;

/// Signature record naming the digest algorithm and signer certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sign {
    /// Empty when the record has not been registered yet
    #[serde(default, skip_serializing_if = "SignId::is_empty")]
    pub id: SignId,
    pub hash_name: String,
    #[serde(with = "base64_bytes")]
    pub signed_digest: Vec<u8>,
    pub signer_certificate_id: String,
}

impl Sign {
    pub fn new(hash_name: impl Into<String>, signed_digest: Vec<u8>, signer_certificate_id: impl Into<String>) -> Self {
        Self {
            id: SignId::default(),
            hash_name: hash_name.into(),
            signed_digest,
            signer_certificate_id: signer_certificate_id.into(),
        }
    }
}

impl Asn1Compatible for Sign {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        let mut len = writer.write_utf8_string(&self.signer_certificate_id);
        len += writer.write_octet_string(&self.signed_digest);
        len += writer.write_utf8_string(&self.hash_name);
        if !self.id.is_empty() {
            let id_len = self.id.asn1_write(writer)?;
            len += id_len + writer.write_context_tag(SIGN_ID_TAG, id_len);
        }
        Ok(len + writer.write_sequence(len))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let id = match seq.read_context_tag(SIGN_ID_TAG)? {
            Some(mut tagged) => {
                let id = SignId::asn1_read(&mut tagged)?;
                tagged.finish()?;
                if id.is_empty() {
                    return crate::encoding_err!("explicit sign id must not be empty");
                }
                id
            }
            None => SignId::default(),
        };
        let sign = Self {
            id,
            hash_name: seq.read_utf8_string()?,
            signed_digest: seq.read_octet_string()?,
            signer_certificate_id: seq.read_utf8_string()?,
        };
        seq.finish()?;
        Ok(sign)
    }
}

/// Signs the canonical DER encoding of tickets, certificates and accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactSigner {
    hash_algorithm: HashAlgorithm,
}

impl ArtifactSigner {
    pub fn new(hash_algorithm: HashAlgorithm) -> Self {
        Self { hash_algorithm }
    }

    pub fn sign<T: Asn1Compatible>(
        &self,
        artifact: &T,
        signer_certificate_id: &str,
        private_key: &[u8],
        password: Option<&[u8]>,
    ) -> Result<Sign> {
        let digest = self.hash_algorithm.hash(&artifact.to_asn1()?);
        let private_key = resolve_private_key(private_key, password)?;
        let signed_digest = sign::sign_digest(&digest, &private_key)?;
        debug!(hash = self.hash_algorithm.name(), signer = signer_certificate_id, "artifact signed");
        Ok(Sign::new(self.hash_algorithm.name(), signed_digest, signer_certificate_id))
    }

    /// Check `sign` against `artifact`; the hash named in `sign` is used
    pub fn verify<T: Asn1Compatible>(&self, artifact: &T, sign: &Sign, public_key: &[u8]) -> Result<bool> {
        let hash_algorithm = HashAlgorithm::from_name(&sign.hash_name)
            .map_err(|_| Error::Encoding(format!("unknown hash name '{}'", sign.hash_name)))?;
        let digest = hash_algorithm.hash(&artifact.to_asn1()?);
        Ok(sign::verify_digest(&digest, &sign.signed_digest, public_key)?)
    }
}
