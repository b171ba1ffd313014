//! The single local user profile and their preferences.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date_range::now;
use crate::error::{DaybookError, DaybookResult};
use crate::event::non_empty;
use crate::keyword::keyword_enum;
use crate::store::{Store, StoreKey};

pub const DEFAULT_USER_NAME: &str = "Student";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            name: DEFAULT_USER_NAME.to_string(),
            email: None,
            age: None,
            location: None,
            bio: None,
            interests: Vec::new(),
            avatar: None,
            created_at: now(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

keyword_enum!(Theme, "theme", {
    Light => "light",
    Dark => "dark",
    Auto => "auto",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub tasks: bool,
    pub events: bool,
    pub goals: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        NotificationPreferences {
            tasks: true,
            events: true,
            goals: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPreferences {
    pub default_view: String,
    pub density: String,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        DisplayPreferences {
            default_view: "overview".to_string(),
            density: "comfortable".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationPreferences {
    pub tasks_sort: String,
    pub notes_grouping: String,
}

impl Default for OrganizationPreferences {
    fn default() -> Self {
        OrganizationPreferences {
            tasks_sort: "due-date".to_string(),
            notes_grouping: "category".to_string(),
        }
    }
}

/// Stored settings. The theme is recorded but nothing here applies it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub notifications: NotificationPreferences,
    pub display: DisplayPreferences,
    pub organization: OrganizationPreferences,
}

/// Personal info edits. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub age: Option<Option<u32>>,
    pub location: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub avatar: Option<Option<String>>,
}

pub struct Profile {
    store: Store,
    user: UserProfile,
    preferences: Preferences,
}

impl Profile {
    /// Load both documents, falling back to defaults when absent.
    pub fn load(store: &Store) -> DaybookResult<Self> {
        Ok(Profile {
            store: store.clone(),
            user: store.read(StoreKey::User)?.unwrap_or_default(),
            preferences: store.read(StoreKey::Preferences)?.unwrap_or_default(),
        })
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn update_info(&mut self, patch: ProfilePatch) -> DaybookResult<&UserProfile> {
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DaybookError::validation("Name is required"));
            }
            self.user.name = name.to_string();
        }
        if let Some(email) = patch.email {
            self.user.email = non_empty(email);
        }
        if let Some(age) = patch.age {
            self.user.age = age;
        }
        if let Some(location) = patch.location {
            self.user.location = non_empty(location);
        }
        if let Some(bio) = patch.bio {
            self.user.bio = non_empty(bio);
        }
        if let Some(avatar) = patch.avatar {
            self.user.avatar = non_empty(avatar);
        }

        self.save_user()
    }

    /// Add an interest. Blank and duplicate entries are ignored.
    pub fn add_interest(&mut self, interest: &str) -> DaybookResult<&UserProfile> {
        let interest = interest.trim();
        if interest.is_empty() || self.user.interests.iter().any(|i| i == interest) {
            return Ok(&self.user);
        }
        self.user.interests.push(interest.to_string());
        self.save_user()
    }

    pub fn remove_interest(&mut self, interest: &str) -> DaybookResult<&UserProfile> {
        let interest = interest.trim();
        self.user.interests.retain(|i| i != interest);
        self.save_user()
    }

    pub fn set_theme(&mut self, theme: Theme) -> DaybookResult<&Preferences> {
        self.preferences.theme = theme;
        self.save_preferences()
    }

    pub fn set_preferences(&mut self, preferences: Preferences) -> DaybookResult<&Preferences> {
        self.preferences = preferences;
        self.save_preferences()
    }

    pub fn reset_preferences(&mut self) -> DaybookResult<&Preferences> {
        debug!("resetting preferences");
        self.set_preferences(Preferences::default())
    }

    fn save_user(&mut self) -> DaybookResult<&UserProfile> {
        self.user.updated_at = Some(now());
        self.store.write(StoreKey::User, &self.user)?;
        Ok(&self.user)
    }

    fn save_preferences(&mut self) -> DaybookResult<&Preferences> {
        self.store.write(StoreKey::Preferences, &self.preferences)?;
        Ok(&self.preferences)
    }
}
