//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, non-negative counters) so that once a value
//! reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Amount or counter below zero.
    #[error("value must not be negative")]
    Negative,
    /// End of a period precedes its start.
    #[error("end date must not precede start date")]
    InvalidDateRange,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(HubId, "Unique identifier for a hub.");
id_newtype!(CampaignTypeId, "Unique identifier for a campaign type.");
id_newtype!(CampaignId, "Unique identifier for a campaign.");
id_newtype!(InquiryId, "Unique identifier for an inquiry (seeker).");
id_newtype!(InteractionId, "Unique identifier for an inquiry interaction.");
id_newtype!(TaskId, "Unique identifier for a follow-up or regular task.");
id_newtype!(UserId, "Unique identifier for a hub user.");
id_newtype!(RoleId, "Unique identifier for a role.");
id_newtype!(PermissionId, "Unique identifier for a permission.");

macro_rules! email_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Validates and normalizes an email string.
            pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
                let normalized = normalize_email(email)?;
                Ok(Self(normalized))
            }

            /// Borrow the email as a `&str`.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the owned inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

email_newtype!(UserEmail, "Lower-cased and validated email of a hub user.");
email_newtype!(ContactEmail, "Lower-cased and validated email of a seeker.");

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(UserName, "Hub user display name.");
non_empty_string_newtype!(RoleName, "Role name, unique within a hub.");
non_empty_string_newtype!(PermissionCode, "Dotted permission code such as `tasks.manage`.");
non_empty_string_newtype!(CampaignName, "Campaign name wrapper enforcing non-empty values.");
non_empty_string_newtype!(
    CampaignTypeName,
    "Campaign type (channel) name enforcing non-empty values."
);
non_empty_string_newtype!(SeekerName, "Seeker full name enforcing non-empty values.");
non_empty_string_newtype!(TaskTitle, "Task title enforcing non-empty values.");
non_empty_string_newtype!(Question, "Intake question label.");

/// Free text sanitized of markup, trimmed and non-empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SanitizedText(String);

impl SanitizedText {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    /// Wraps text produced by the application itself, never user input.
    pub(crate) fn trusted<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    /// Sanitizes an optional value, mapping blank input to `None`.
    pub fn optional<S: Into<String>>(value: Option<S>) -> Option<Self> {
        value.and_then(|value| Self::new(value).ok())
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SanitizedText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SanitizedText {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-negative, finite monetary amount.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Budget(f64);

impl Budget {
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if !value.is_finite() {
            return Err(TypeConstraintError::InvalidValue(value.to_string()));
        }
        if value < 0.0 {
            return Err(TypeConstraintError::Negative);
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Non-negative analytics counter (impressions, clicks, conversions).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Counter(i64);

impl Counter {
    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value < 0 {
            return Err(TypeConstraintError::Negative);
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Generates a closed set of upper-case string codes stored as `TEXT`.
macro_rules! code_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored code of the variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

code_enum!(
    /// Lifecycle of a marketing campaign.
    CampaignStatus {
        Draft => "DRAFT",
        Active => "ACTIVE",
        Paused => "PAUSED",
        Completed => "COMPLETED",
    }
);

code_enum!(
    /// Pipeline stage of an inquiry, in pipeline order.
    Stage {
        New => "NEW",
        Contacted => "CONTACTED",
        Interested => "INTERESTED",
        Qualified => "QUALIFIED",
        ReadyToRegister => "READY_TO_REGISTER",
        Lost => "LOST",
    }
);

impl Stage {
    /// Whether the inquiry left the active pipeline.
    pub const fn is_closed(self) -> bool {
        matches!(self, Stage::ReadyToRegister | Stage::Lost)
    }
}

code_enum!(
    /// Kind of contact recorded against an inquiry.
    InteractionKind {
        Call => "CALL",
        Email => "EMAIL",
        Meeting => "MEETING",
        Message => "MESSAGE",
        Note => "NOTE",
        StageChange => "STAGE_CHANGE",
    }
);

impl InteractionKind {
    /// Kinds a user may log by hand; stage changes are recorded by the system.
    pub fn manual() -> Vec<InteractionKind> {
        Self::ALL
            .iter()
            .copied()
            .filter(|kind| *kind != InteractionKind::StageChange)
            .collect()
    }
}

code_enum!(
    /// Status of a task; also the Kanban column order.
    TaskStatus {
        Pending => "PENDING",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
);

code_enum!(
    /// Priority of a regular task.
    TaskPriority {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert!(HubId::new(1).is_ok());
        assert_eq!(HubId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(TaskId::new(-4), Err(TypeConstraintError::NonPositiveId));
    }

    #[test]
    fn emails_are_normalized() {
        let email = ContactEmail::new("  Jane.Doe@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jane.doe@example.com");
        assert_eq!(
            UserEmail::new("not-an-email"),
            Err(TypeConstraintError::InvalidEmail)
        );
    }

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(SeekerName::new("  Ann ").unwrap().as_str(), "Ann");
        assert_eq!(
            CampaignName::new("   "),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn sanitized_text_strips_markup() {
        let text = SanitizedText::new("Called <script>alert(1)</script>back").unwrap();
        assert_eq!(text.as_str(), "Called back");
        assert!(SanitizedText::new("<script>x</script>").is_err());
        assert_eq!(SanitizedText::optional(Some("   ")), None);
    }

    #[test]
    fn phone_is_normalized_to_e164() {
        let phone = PhoneNumber::new("+1 (202) 555-0143").unwrap();
        assert_eq!(phone.as_str(), "+12025550143");
        assert_eq!(
            PhoneNumber::new("abc"),
            Err(TypeConstraintError::InvalidPhone)
        );
    }

    #[test]
    fn amounts_reject_negative_values() {
        assert_eq!(Budget::new(-1.0), Err(TypeConstraintError::Negative));
        assert!(Budget::new(f64::NAN).is_err());
        assert_eq!(Budget::new(12.5).unwrap().get(), 12.5);
        assert_eq!(Counter::new(-3), Err(TypeConstraintError::Negative));
        assert_eq!(Counter::new(0).unwrap().get(), 0);
    }

    #[test]
    fn codes_parse_case_insensitively() {
        assert_eq!("ready_to_register".parse::<Stage>(), Ok(Stage::ReadyToRegister));
        assert_eq!(" in_progress ".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("ARCHIVED".parse::<CampaignStatus>().is_err());
        assert_eq!(TaskStatus::Cancelled.to_string(), "CANCELLED");
    }

    #[test]
    fn codes_serialize_as_stored_text() {
        let json = serde_json::to_string(&Stage::ReadyToRegister).unwrap();
        assert_eq!(json, "\"READY_TO_REGISTER\"");
        let status: TaskStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
    }

    #[test]
    fn closed_stages() {
        assert!(Stage::Lost.is_closed());
        assert!(Stage::ReadyToRegister.is_closed());
        assert!(!Stage::Qualified.is_closed());
    }

    #[test]
    fn manual_interaction_kinds_exclude_stage_change() {
        let kinds = InteractionKind::manual();
        assert_eq!(kinds.len(), InteractionKind::ALL.len() - 1);
        assert!(!kinds.contains(&InteractionKind::StageChange));
        assert_eq!(kinds.first(), Some(&InteractionKind::Call));
    }
}
