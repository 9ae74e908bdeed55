//! Typed payloads of the statistics API, shared by the core and the runtimes.
//!
//! The API is loose about scalar types: identifiers arrive as numbers or
//! strings and the vehicle flags as booleans or `0`/`1`. The deserializers
//! below accept both forms and reject anything else, so a malformed payload
//! fails at the adapter boundary instead of deep inside the view.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Identifier of a player account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

/// Identifier of a vehicle; unique within a displayed collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VehicleId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        string_or_number(deserializer).map(UserId)
    }
}

impl<'de> Deserialize<'de> for VehicleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        string_or_number(deserializer).map(VehicleId)
    }
}

/// A player resolved by name search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Player {
    #[serde(rename = "UserID")]
    pub user_id: UserId,
    /// Display name as reported by the API. Empty when the payload omits it.
    #[serde(rename = "Nick", alias = "Name", alias = "Username", default)]
    pub name: String,
}

/// One vehicle of a player's collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "VehicleID")]
    pub vehicle_id: VehicleId,
    #[serde(rename = "VehicleName")]
    pub name: String,
    #[serde(rename = "Tier")]
    pub tier: i64,
    #[serde(rename = "Battlerating")]
    pub battle_rating: f64,
    /// Country/operator tag, used for the flag image.
    #[serde(rename = "OperatorCountry", default)]
    pub country: String,
    #[serde(rename = "Premium", default, deserialize_with = "flag")]
    pub premium: bool,
    #[serde(rename = "Gift", default, deserialize_with = "flag")]
    pub gift: bool,
    #[serde(rename = "Event", default, deserialize_with = "flag")]
    pub event: bool,
    #[serde(rename = "Clan", default, deserialize_with = "flag")]
    pub clan: bool,
    /// Internal vehicle name, used for the thumbnail image.
    #[serde(rename = "VehicleIdentifiyingName", default)]
    pub identifying_name: String,
}

/// Card styling bucket, picked by first-matching flag priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    Premium,
    /// Gift or event vehicle.
    Special,
    Clan,
    Regular,
}

impl VehicleRecord {
    pub fn card_style(&self) -> CardStyle {
        if self.premium {
            CardStyle::Premium
        } else if self.gift || self.event {
            CardStyle::Special
        } else if self.clan {
            CardStyle::Clan
        } else {
            CardStyle::Regular
        }
    }

    /// Display name with everything outside the export whitelist removed.
    pub fn display_name(&self) -> String {
        sanitize_name(&self.name)
    }

    /// `BR: 8.7 (Rank: 6)`
    pub fn rating_label(&self) -> String {
        format!("BR: {} (Rank: {})", self.battle_rating, self.tier)
    }

    /// Site-relative path of the country flag image.
    pub fn flag_path(&self) -> String {
        format!("images/flags/{}.avif", self.country)
    }

    /// Site-relative path of the vehicle thumbnail image.
    pub fn thumbnail_path(&self) -> String {
        format!(
            "images/vehicles/{}.avif",
            self.identifying_name.to_lowercase()
        )
    }
}

/// Keeps ASCII word characters, whitespace, parentheses, double quotes and
/// hyphens. Everything else (localisation markers, special glyphs) is dropped.
pub fn sanitize_name(name: &str) -> String {
    name.chars().filter(|&c| is_name_char(c)).collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || (c.is_whitespace() && c != '\u{85}')
        || c == '\u{feff}'
        || matches!(c, '(' | ')' | '"' | '-')
}

/// Returns `true` when an API response carries no data: `null`, `[]` or `{}`.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or numeric identifier, got {other}"
        ))),
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Some(other) => Err(de::Error::custom(format!(
            "expected a boolean flag, got {other}"
        ))),
    }
}
