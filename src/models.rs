use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400.png";
pub const PLACEHOLDER_SALON_HINT: &str = "salon interior";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Owner,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Owner => "owner",
            Role::Staff => "staff",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "customer" => Ok(Role::Customer),
            "owner" => Ok(Role::Owner),
            "staff" => Ok(Role::Staff),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

/// Stored profile shape: the profile plus the timestamps stamped by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub price: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub salon_id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub avatar: Option<String>,
    pub initials: String,
    pub ai_hint: String,
    pub provided_services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub salon_id: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub service: String,
    pub date: String,
    pub time: String,
    pub staff: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salon {
    pub id: String,
    pub owner_uid: Option<String>,
    pub name: String,
    pub location: String,
    pub rating: f64,
    pub services: Vec<String>,
    pub image: String,
    pub ai_hint: String,
    pub description: String,
    pub operating_hours: Vec<String>,
    pub amenities: Vec<String>,
}

// Untrusted input shapes. Every field is optional so validation can report
// the full set of missing or invalid fields instead of stopping at the
// first deserialization failure. Unknown keys (for example a caller-supplied
// `initials`) are dropped by serde and never reach the stored record.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub uid: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub duration: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffInput {
    pub id: Option<String>,
    pub salon_id: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub provided_services: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub id: Option<String>,
    pub salon_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub staff: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonInput {
    pub id: Option<String>,
    pub owner_uid: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub rating: Option<f64>,
    pub services: Option<Vec<String>>,
    pub image: Option<String>,
    pub ai_hint: Option<String>,
    pub description: Option<String>,
    pub operating_hours: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
}

/// Initials shown on staff avatars, recomputed from the name on every write.
/// Two or more words use the first letters of the first and last word; a
/// single word uses its first one or two characters.
pub fn initials_for(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => "??".to_string(),
        [only] => only.chars().take(2).collect::<String>().to_uppercase(),
        [first, .., last] => {
            let mut initials = String::new();
            initials.extend(first.chars().next());
            initials.extend(last.chars().next());
            initials.to_uppercase()
        }
    }
}

/// Image-search hint for staff avatar placeholders, recomputed from the name
/// on every write alongside the initials.
pub fn portrait_hint_for(name: &str) -> String {
    match name.split_whitespace().next() {
        Some(first) => format!("{} portrait", first.to_lowercase()),
        None => "person portrait".to_string(),
    }
}
