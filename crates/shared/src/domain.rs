use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(UserId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    /// Label shown next to a user in listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Ativo",
            Self::Inactive => "Inativo",
        }
    }
}

/// A user record as stored by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
}

/// Editable fields of a user that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub status: UserStatus,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, status: UserStatus) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            status,
        }
    }

    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            status: self.status,
        }
    }
}

/// Form input submitted for saving.
///
/// Whether a save creates or updates is decided by the variant, never by
/// probing an optional id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDraft {
    New(NewUser),
    Existing(User),
}

impl UserDraft {
    pub fn name(&self) -> &str {
        match self {
            Self::New(user) => &user.name,
            Self::Existing(user) => &user.name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::New(user) => &user.email,
            Self::Existing(user) => &user.email,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Existing(_))
    }

    /// Trims the name and trims plus lower-cases the email.
    pub fn normalized(self) -> Self {
        match self {
            Self::New(user) => Self::New(NewUser {
                name: user.name.trim().to_string(),
                email: user.email.trim().to_lowercase(),
                status: user.status,
            }),
            Self::Existing(user) => Self::Existing(User {
                id: user.id,
                name: user.name.trim().to_string(),
                email: user.email.trim().to_lowercase(),
                status: user.status,
            }),
        }
    }
}

impl From<NewUser> for UserDraft {
    fn from(value: NewUser) -> Self {
        Self::New(value)
    }
}

impl From<User> for UserDraft {
    fn from(value: User) -> Self {
        Self::Existing(value)
    }
}
