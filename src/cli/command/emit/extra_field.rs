use arbitrary::Arbitrary;
use arbitrary::Unstructured;
use std::fmt::Display;
use std::str::FromStr;

/// One `KEY=VALUE` pair destined for the extra fields of a log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraField {
    pub key: String,
    pub value: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseExtraFieldError {
    #[error("expected KEY=VALUE, got {input:?}")]
    MissingSeparator { input: String },
    #[error("extra field key must not be empty")]
    EmptyKey,
    #[error("extra field key {key:?} must not contain ':'")]
    ColonInKey { key: String },
}

impl FromStr for ExtraField {
    type Err = ParseExtraFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            return Err(ParseExtraFieldError::MissingSeparator {
                input: s.to_owned(),
            });
        };
        if key.is_empty() {
            return Err(ParseExtraFieldError::EmptyKey);
        }
        // A ':' in the key would corrupt the field:value line format.
        if key.contains(':') {
            return Err(ParseExtraFieldError::ColonInKey {
                key: key.to_owned(),
            });
        }
        Ok(Self {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

impl Display for ExtraField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl<'a> Arbitrary<'a> for ExtraField {
    // Generated pairs must survive both the KEY=VALUE parse and a clap
    // hand-off, so characters come from a safe set.
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        const KEY_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
        const VALUE_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789_";
        let mut key = String::new();
        for _ in 0..u.int_in_range(1..=8)? {
            key.push(char::from(*u.choose(KEY_CHARS)?));
        }
        let mut value = String::new();
        for _ in 0..u.int_in_range(0..=12)? {
            value.push(char::from(*u.choose(VALUE_CHARS)?));
        }
        Ok(Self { key, value })
    }
}
