use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::de::Error;

pub(crate) type InnerSnowflake = snowcloud::Snowflake<43, 8, 12>;
pub(crate) type Snowcloud = snowcloud::MultiThread<43, 8, 12>;

/// Ids are handed out relative to this epoch (seconds).
pub(crate) const EPOCH: u64 = 1_650_667_342;
pub(crate) const PRIMARY_ID: i64 = 1;

/// Time ordered unique id. Travels as a decimal string so that it
/// survives a round trip through html forms and urls untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snowflake(InnerSnowflake);

impl Snowflake {
    pub fn id(&self) -> i64 {
        self.0.id()
    }
}

impl TryFrom<i64> for Snowflake {
    type Error = snowcloud::Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Ok(Snowflake(InnerSnowflake::try_from(value)?))
    }
}

impl From<InnerSnowflake> for Snowflake {
    fn from(value: InnerSnowflake) -> Self {
        Snowflake(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("not a number: {0}")]
    Number(#[from] std::num::ParseIntError),
    #[error("not a valid snowflake: {0}")]
    Snowflake(snowcloud::Error),
}

impl FromStr for Snowflake {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        let num = s.parse::<i64>()?;
        Snowflake::try_from(num).map_err(ParseError::Snowflake)
    }
}

impl Display for Snowflake {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl serde::Serialize for Snowflake {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id().to_string().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Snowflake {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let num = String::deserialize(deserializer)?;
        Snowflake::from_str(&num).map_err(D::Error::custom)
    }
}
