//! Chat addresses (`role:id`)
//!
//! Every chat participant and every realtime room is named by an [`Address`].
//! Raw strings coming from clients are parsed exactly once at the boundary;
//! past that point the role and id are typed fields.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Participant role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Buyer (`user:` prefix on the wire)
    #[serde(alias = "buyer")]
    User,
    /// Admin / support staff
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" | "buyer" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(AddressError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must look like role:id, got {0:?}")]
    Malformed(String),
    #[error("unknown role {0:?}")]
    UnknownRole(String),
    #[error("invalid id {0:?}")]
    InvalidId(String),
}

/// Record keys are lowercase or uppercase hex, 24 chars (legacy) up to 32 chars.
pub fn is_valid_id(id: &str) -> bool {
    (24..=32).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Validate an id and normalize it to lowercase
pub fn normalize_id(id: &str) -> Result<String, AddressError> {
    let trimmed = id.trim();
    if is_valid_id(trimmed) {
        Ok(trimmed.to_ascii_lowercase())
    } else {
        Err(AddressError::InvalidId(id.to_string()))
    }
}

/// A typed `role:id` address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub role: Role,
    pub id: String,
}

impl Address {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            id: id.into(),
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            role: Role::Admin,
            id: id.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (role, id) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| AddressError::Malformed(s.to_string()))?;
        let role = role.parse::<Role>()?;
        let id = normalize_id(id)?;
        Ok(Self { role, id })
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OID: &str = "64b7f0c2a1e4d3b2c1a09f8e";
    const UUID_KEY: &str = "0b9e4c8f6d3a4f0e9a1b2c3d4e5f6a7b";

    #[test]
    fn test_parse_user_and_admin() {
        let user: Address = format!("user:{OID}").parse().unwrap();
        assert_eq!(user, Address::user(OID));
        assert!(user.is_user());

        let admin: Address = format!("admin:{UUID_KEY}").parse().unwrap();
        assert!(admin.is_admin());
        assert_eq!(admin.id, UUID_KEY);
    }

    #[test]
    fn test_parse_normalizes_case() {
        let addr: Address = "admin:64B7F0C2A1E4D3B2C1A09F8E".parse().unwrap();
        assert_eq!(addr.id, OID);
        assert_eq!(addr.to_string(), format!("admin:{OID}"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            "nobody".parse::<Address>(),
            Err(AddressError::Malformed("nobody".into()))
        );
        assert!(matches!(
            format!("shipper:{OID}").parse::<Address>(),
            Err(AddressError::UnknownRole(_))
        ));
        assert!(matches!(
            "user:xyz".parse::<Address>(),
            Err(AddressError::InvalidId(_))
        ));
        // 23 chars
        assert!("user:64b7f0c2a1e4d3b2c1a09f8".parse::<Address>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let addr = Address::user(OID);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"user:{OID}\""));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
        assert!(serde_json::from_str::<Address>("\"user:\"").is_err());
    }

    #[test]
    fn test_role_aliases() {
        assert_eq!("buyer".parse::<Role>().unwrap(), Role::User);
        let role: Role = serde_json::from_str("\"buyer\"").unwrap();
        assert_eq!(role, Role::User);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
