use chrono::NaiveDateTime;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::FieldError;

/// A persisted booking record. Serialized field names match the public API
/// shape consumed by the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub num_cats: u32,
    pub frequency: Frequency,
    pub plan: String,
    pub time_of_day: TimeOfDay,
    pub notes: Option<String>,
    pub language: Language,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

impl Booking {
    /// Builds the record a store persists: fresh id, pending status,
    /// creation timestamp assigned now.
    pub fn from_request(request: BookingRequest) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            num_cats: request.num_cats,
            frequency: request.frequency,
            plan: request.plan,
            time_of_day: request.time_of_day,
            notes: request.notes,
            language: request.language,
            status: BookingStatus::Pending,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Contacted,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Contacted => "contacted",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "contacted" => BookingStatus::Contacted,
            _ => BookingStatus::Pending,
        }
    }
}

/// Visits per week. `Custom` is the 7+ sentinel: quote-only, no computed
/// price. On the wire it is either an integer or the string "custom".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    PerWeek(u8),
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> String {
        match self {
            Frequency::PerWeek(n) => n.to_string(),
            Frequency::Custom => "custom".to_string(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "custom" => Frequency::Custom,
            other => Frequency::PerWeek(other.parse().unwrap_or(1)),
        }
    }
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Frequency::PerWeek(n) => serializer.serialize_u8(*n),
            Frequency::Custom => serializer.serialize_str("custom"),
        }
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match FrequencyValue::deserialize(deserializer)? {
            FrequencyValue::Count(n) if (1..=7).contains(&n) => Ok(Frequency::PerWeek(n as u8)),
            FrequencyValue::Count(n) => Err(D::Error::custom(format!(
                "frequency out of range: {n}"
            ))),
            FrequencyValue::Text(s) if s == "custom" => Ok(Frequency::Custom),
            FrequencyValue::Text(s) => Err(D::Error::custom(format!("unknown frequency: {s:?}"))),
        }
    }
}

/// Raw wire value for `frequency`, accepted permissively so validation can
/// report it as a field error rather than a parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FrequencyValue {
    Count(i64),
    Text(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "afternoon" => TimeOfDay::Afternoon,
            "evening" => TimeOfDay::Evening,
            _ => TimeOfDay::Morning,
        }
    }
}

/// Display language for customer-facing text. The owner always reads
/// Chinese regardless of this value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    English,
    Chinese,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "Chinese",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "Chinese" => Language::Chinese,
            _ => Language::English,
        }
    }
}

/// A booking submission that has passed validation. Constructed either by
/// `BookingPayload::validate` on the server or directly by the booking form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub num_cats: u32,
    pub frequency: Frequency,
    pub plan: String,
    pub time_of_day: TimeOfDay,
    pub notes: Option<String>,
    pub language: Language,
}

/// Wire shape of `POST /api/bookings`. Every field is optional so that
/// validation can collect all failing fields in one pass.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub num_cats: Option<i64>,
    pub frequency: Option<FrequencyValue>,
    pub plan: Option<String>,
    pub time_of_day: Option<String>,
    pub notes: Option<String>,
    pub language: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl BookingPayload {
    /// Checks the payload against the booking schema, reporting every
    /// failing field. No side effects happen before this passes.
    pub fn validate(self) -> Result<BookingRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = non_empty(self.name);
        if name.is_none() {
            errors.push(FieldError::new("name", "Name is required"));
        }

        let address = non_empty(self.address);
        if address.is_none() {
            errors.push(FieldError::new("address", "Address is required"));
        }

        let email = non_empty(self.email);
        let phone = non_empty(self.phone);
        if email.is_none() && phone.is_none() {
            errors.push(FieldError::new(
                "email",
                "Provide an email or a phone number",
            ));
            errors.push(FieldError::new(
                "phone",
                "Provide an email or a phone number",
            ));
        }

        let num_cats = match self.num_cats {
            Some(n) if n >= 1 => Some(n as u32),
            Some(n) => {
                errors.push(FieldError::new(
                    "numCats",
                    format!("numCats must be at least 1, got {n}"),
                ));
                None
            }
            None => {
                errors.push(FieldError::new("numCats", "numCats is required"));
                None
            }
        };

        let frequency = match self.frequency {
            Some(FrequencyValue::Count(n)) if (1..=7).contains(&n) => {
                Some(Frequency::PerWeek(n as u8))
            }
            Some(FrequencyValue::Count(n)) => {
                errors.push(FieldError::new(
                    "frequency",
                    format!("frequency must be between 1 and 7, got {n}"),
                ));
                None
            }
            Some(FrequencyValue::Text(ref s)) if s == "custom" => Some(Frequency::Custom),
            Some(FrequencyValue::Text(s)) => {
                errors.push(FieldError::new(
                    "frequency",
                    format!("frequency must be a number or \"custom\", got {s:?}"),
                ));
                None
            }
            None => {
                errors.push(FieldError::new("frequency", "frequency is required"));
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BookingRequest {
            name: name.unwrap(),
            email,
            phone,
            address: address.unwrap(),
            num_cats: num_cats.unwrap(),
            frequency: frequency.unwrap(),
            plan: non_empty(self.plan).unwrap_or_else(|| "Essential".to_string()),
            time_of_day: self
                .time_of_day
                .as_deref()
                .map(TimeOfDay::parse)
                .unwrap_or(TimeOfDay::Morning),
            notes: non_empty(self.notes),
            language: self
                .language
                .as_deref()
                .map(Language::parse)
                .unwrap_or(Language::English),
        })
    }
}
