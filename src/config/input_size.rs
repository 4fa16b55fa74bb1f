use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;

/// Side length of the square image the model expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputSize(u32);

impl InputSize {
    pub const DEFAULT: InputSize = InputSize(224);

    pub fn new(side: u32) -> Option<Self> {
        (side > 0).then_some(InputSize(side))
    }

    pub fn side(&self) -> u32 {
        self.0
    }
}

impl Default for InputSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<'de> Deserialize<'de> for InputSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(InputSizeVisitor)
    }
}

struct InputSizeVisitor;

impl InputSizeVisitor {
    fn from_u64<E: de::Error>(v: u64) -> Result<InputSize, E> {
        if v > u32::MAX as u64 {
            return Err(E::custom("input size out of range for u32"));
        }
        InputSize::new(v as u32).ok_or_else(|| E::custom("input size cannot be zero"))
    }
}

impl<'de> de::Visitor<'de> for InputSizeVisitor {
    type Value = InputSize;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a positive integer or a square size such as \"224x224\"")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v < 0 {
            return Err(E::custom("input size cannot be negative"));
        }
        Self::from_u64(v as u64)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Self::from_u64(v)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let v = v.trim();
        if v.is_empty() {
            return Err(E::custom("input size string cannot be empty"));
        }

        match v.split_once(['x', 'X']) {
            Some((width, height)) => {
                let width = width
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| E::custom("invalid width in input size"))?;
                let height = height
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| E::custom("invalid height in input size"))?;
                if width != height {
                    return Err(E::custom(format!(
                        "input size must be square, got {}x{}",
                        width, height
                    )));
                }
                Self::from_u64(width)
            }
            None => v
                .parse::<u64>()
                .map_err(|_| E::custom("invalid input size string"))
                .and_then(Self::from_u64),
        }
    }
}

impl Serialize for InputSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<InputSize, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn accepts_plain_integer() {
        assert_eq!(parse("224").unwrap().side(), 224);
    }

    #[test]
    fn accepts_square_string() {
        assert_eq!(parse("\"299x299\"").unwrap().side(), 299);
        assert_eq!(parse("\"128 X 128\"").unwrap().side(), 128);
        assert_eq!(parse("\"64\"").unwrap().side(), 64);
    }

    #[test]
    fn rejects_non_square_and_zero() {
        assert!(parse("\"224x112\"").is_err());
        assert!(parse("0").is_err());
        assert!(parse("-3").is_err());
        assert!(parse("\"\"").is_err());
    }

    #[test]
    fn serializes_as_integer() {
        let size = InputSize::new(96).unwrap();
        assert_eq!(serde_json::to_string(&size).unwrap(), "96");
    }
}
