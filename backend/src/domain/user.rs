//! User data model and the moderation role ladder.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyDisplayName,
    DisplayNameTooShort { min: usize },
    DisplayNameTooLong { max: usize },
    DisplayNameInvalidCharacters,
    InvalidEmail,
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooShort { min } => {
                write!(f, "display name must be at least {min} characters")
            }
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => write!(
                f,
                "display name may only contain letters, numbers, spaces, or underscores",
            ),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::UnknownRole { value } => write!(f, "unknown role: {value}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;

static DISPLAY_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn display_name_regex() -> &'static Regex {
    DISPLAY_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_ ]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("display name regex failed to compile: {error}"))
    })
}

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from owned input.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, UserValidationError> {
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }

        let length = display_name.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }

        if !display_name_regex().is_match(&display_name) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }

        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Campus e-mail address.
///
/// Full address validation lives server-side in the identity provider; the
/// portal only rejects values that cannot possibly be addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`] from owned input.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let host = parts.next().unwrap_or_default();
        if local.is_empty() || host.is_empty() || !host.contains('.') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Moderation role ladder: members post, moderators curate content, admins
/// additionally manage users.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular community member.
    Member,
    /// Can approve, reject, and delete community content.
    Moderator,
    /// Moderator powers plus user management.
    Admin,
}

impl Role {
    /// Stable string form used in persistence and sessions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }

    /// Parse the stable string form.
    pub fn parse(value: &str) -> Result<Self, UserValidationError> {
        match value {
            "member" => Ok(Self::Member),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }

    /// Whether this role may curate community content.
    pub fn can_moderate(self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }

    /// Whether this role may manage users.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// The next role up the ladder, if any.
    pub fn promoted(self) -> Option<Self> {
        match self {
            Self::Member => Some(Self::Moderator),
            Self::Moderator => Some(Self::Admin),
            Self::Admin => None,
        }
    }

    /// The next role down the ladder, if any.
    pub fn demoted(self) -> Option<Self> {
        match self {
            Self::Member => None,
            Self::Moderator => Some(Self::Member),
            Self::Admin => Some(Self::Moderator),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` must be a valid UUID string.
/// - `display_name` must satisfy [`DisplayName`] validation.
/// - `email` must satisfy [`Email`] validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "Ada Lovelace")]
    display_name: DisplayName,
    #[schema(value_type = String, example = "ada@campus.edu")]
    email: Email,
    role: Role,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, display_name: DisplayName, email: Email, role: Role) -> Self {
        Self {
            id,
            display_name,
            email,
            role,
        }
    }

    /// Fallible constructor enforcing all field invariants from strings.
    pub fn try_from_strings(
        id: impl AsRef<str>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            UserId::new(id)?,
            DisplayName::new(display_name)?,
            Email::new(email)?,
            role,
        ))
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Campus e-mail address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Moderation role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Copy of this user with a different role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
struct UserDto {
    id: String,
    display_name: String,
    email: String,
    role: Role,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            display_name,
            email,
            role,
        } = value;
        Self {
            id: id.to_string(),
            display_name: display_name.into(),
            email: email.into(),
            role,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        User::try_from_strings(value.id, value.display_name, value.email, value.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    #[case("ab", UserValidationError::DisplayNameTooShort { min: DISPLAY_NAME_MIN })]
    #[case("Ada!", UserValidationError::DisplayNameInvalidCharacters)]
    #[case("   ", UserValidationError::EmptyDisplayName)]
    fn display_name_rejects_invalid_input(
        #[case] raw: &str,
        #[case] expected: UserValidationError,
    ) {
        assert_eq!(DisplayName::new(raw).expect_err("invalid name"), expected);
    }

    #[rstest]
    #[case("ada@campus.edu", true)]
    #[case("  ada@campus.edu  ", true)]
    #[case("ada", false)]
    #[case("@campus.edu", false)]
    #[case("ada@campus", false)]
    fn email_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(Email::new(raw).is_ok(), ok);
    }

    #[rstest]
    #[case(Role::Member, Some(Role::Moderator), None)]
    #[case(Role::Moderator, Some(Role::Admin), Some(Role::Member))]
    #[case(Role::Admin, None, Some(Role::Moderator))]
    fn role_ladder_moves_one_step(
        #[case] role: Role,
        #[case] up: Option<Role>,
        #[case] down: Option<Role>,
    ) {
        assert_eq!(role.promoted(), up);
        assert_eq!(role.demoted(), down);
    }

    #[rstest]
    fn role_string_round_trip() {
        for role in [Role::Member, Role::Moderator, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()).expect("known role"), role);
        }
        assert!(Role::parse("owner").is_err());
    }

    #[rstest]
    fn user_serialises_with_snake_case_fields() {
        let user = User::try_from_strings(
            "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "Ada Lovelace",
            "ada@campus.edu",
            Role::Admin,
        )
        .expect("valid user");
        let value = serde_json::to_value(&user).expect("serialisable user");
        assert_eq!(value["display_name"], "Ada Lovelace");
        assert_eq!(value["role"], "admin");
    }
}
