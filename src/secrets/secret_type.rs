use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use data_encoding::BASE64;

pub const TYPE_KEYSTORE: &str = "keystore";
pub const TYPE_PEM: &str = "pem";
pub const TYPE_PASSWORD: &str = "password";

/// Caller-declared kind of a secret. Decides how its bytes are written into
/// the string `value` field of the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SecretType {
    Keystore,
    Pem,
    Password,
    /// Any other tag, stored verbatim and encoded like a keystore.
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Standard padded base64.
    Base64,
    /// Bytes stored as-is; must be UTF-8.
    Text,
}

impl SecretType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Keystore => TYPE_KEYSTORE,
            Self::Pem => TYPE_PEM,
            Self::Password => TYPE_PASSWORD,
            Self::Other(tag) => tag,
        }
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        match self {
            Self::Pem | Self::Password => Encoding::Text,
            Self::Keystore | Self::Other(_) => Encoding::Base64,
        }
    }
}

impl From<&str> for SecretType {
    fn from(tag: &str) -> Self {
        match tag {
            TYPE_KEYSTORE => Self::Keystore,
            TYPE_PEM => Self::Pem,
            TYPE_PASSWORD => Self::Password,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl FromStr for SecretType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for SecretType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Encoding {
    /// Returns `None` when a text payload is not valid UTF-8.
    #[must_use]
    pub fn encode(self, data: &[u8]) -> Option<String> {
        match self {
            Self::Base64 => Some(BASE64.encode(data)),
            Self::Text => std::str::from_utf8(data).ok().map(str::to_owned),
        }
    }

    pub fn decode(self, data: &str) -> Result<Vec<u8>, data_encoding::DecodeError> {
        match self {
            Self::Base64 => BASE64.decode(data.as_bytes()),
            Self::Text => Ok(data.as_bytes().to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 4] = ["keystore", "pem", "password", "jceks"];

    #[test]
    fn parses_known_tags() {
        assert_eq!(SecretType::from("keystore"), SecretType::Keystore);
        assert_eq!(SecretType::from("pem"), SecretType::Pem);
        assert_eq!(SecretType::from("password"), SecretType::Password);
        assert_eq!(
            "jceks".parse::<SecretType>().unwrap(),
            SecretType::Other("jceks".to_owned())
        );
        assert_eq!(SecretType::from(""), SecretType::Other(String::new()));
    }

    #[test]
    fn tags_survive_display() {
        for tag in ALL {
            assert_eq!(SecretType::from(tag).to_string(), tag);
        }
    }

    #[test]
    fn selects_encoding_per_type() {
        assert_eq!(SecretType::Keystore.encoding(), Encoding::Base64);
        assert_eq!(SecretType::Pem.encoding(), Encoding::Text);
        assert_eq!(SecretType::Password.encoding(), Encoding::Text);
        assert_eq!(SecretType::from("").encoding(), Encoding::Base64);
        assert_eq!(SecretType::from("unknown").encoding(), Encoding::Base64);
    }

    #[test]
    fn keystore_is_base64() {
        let encoded = SecretType::Keystore.encoding().encode(&[0x01, 0x02, 0x03]);
        assert_eq!(encoded.as_deref(), Some("AQID"));
    }

    #[test]
    fn pem_and_password_are_raw_text() {
        let pem = b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";
        assert_eq!(
            SecretType::Pem.encoding().encode(pem).as_deref(),
            Some("-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n")
        );
        assert_eq!(
            SecretType::Password.encoding().encode(b"hunter2").as_deref(),
            Some("hunter2")
        );
    }

    #[test]
    fn text_rejects_invalid_utf8() {
        assert_eq!(Encoding::Text.encode(&[0xff, 0xfe]), None);
    }

    #[test]
    fn decode_inverts_encode() {
        let payloads: [&[u8]; 4] = [
            b"",
            b"changeit",
            b"\x00\x01\xfe\xff binary",
            "pässwörd".as_bytes(),
        ];
        for tag in ALL {
            let encoding = SecretType::from(tag).encoding();
            for payload in payloads {
                let Some(encoded) = encoding.encode(payload) else {
                    assert_eq!(encoding, Encoding::Text);
                    continue;
                };
                assert_eq!(encoding.decode(&encoded).unwrap(), payload, "type {tag}");
            }
        }
    }

    #[test]
    fn unknown_type_matches_keystore() {
        let payload = [0xde, 0xad, 0xbe, 0xef];
        let keystore = SecretType::Keystore.encoding();
        let other = SecretType::from("something-else").encoding();

        assert_eq!(keystore.encode(&payload), other.encode(&payload));
        assert_eq!(
            keystore.decode("3q2+7w==").unwrap(),
            other.decode("3q2+7w==").unwrap()
        );
    }

    #[test]
    fn malformed_base64_fails_to_decode() {
        assert!(Encoding::Base64.decode("not base64!").is_err());
        assert!(Encoding::Text.decode("not base64!").is_ok());
    }
}
