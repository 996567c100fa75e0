use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Color class given to avatars of names missing from the directory
pub const DEFAULT_COLOR_CLASS: &str = "user-color-default";

/// Palette users are assigned from when their record has no color yet
pub const USER_COLOR_PALETTE: [&str; 12] = [
    "user-color-1",
    "user-color-2",
    "user-color-3",
    "user-color-4",
    "user-color-5",
    "user-color-6",
    "user-color-7",
    "user-color-8",
    "user-color-9",
    "user-color-10",
    "user-color-11",
    "user-color-12",
];

/// A user record as stored by the backend. Fields the board does not read
/// are kept in `extra` so a write-back does not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRaw {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_initials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Directory entry, resolved and ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub initials: String,
    pub color_class: String,
}

/// What a card shows for one assignee
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Avatar {
    pub name: String,
    pub initials: String,
    pub color_class: String,
}

/// Read-only lookup of users by full name
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

/// A color that was assigned during directory construction and still has to
/// be written back to the user record.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssignment {
    pub user_id: String,
    pub record: UserRaw,
}

impl UserDirectory {
    /// Build the directory from a backend snapshot. Users without a color get
    /// one from the palette; those assignments are returned so the caller can
    /// persist them.
    pub fn from_raw(raw: &IndexMap<String, UserRaw>) -> (UserDirectory, Vec<ColorAssignment>) {
        let mut users = Vec::with_capacity(raw.len());
        let mut assignments = Vec::new();

        for (id, record) in raw {
            let full_name = record.user_full_name.trim().to_string();
            let initials = record
                .user_initials
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| derive_initials(&full_name));

            let color_class = match record.user_color.as_deref().map(str::trim) {
                Some(c) if !c.is_empty() => c.to_string(),
                _ => {
                    let color = palette_color_for(id).to_string();
                    let mut updated = record.clone();
                    updated.user_color = Some(color.clone());
                    assignments.push(ColorAssignment {
                        user_id: id.clone(),
                        record: updated,
                    });
                    color
                }
            };

            users.push(User {
                id: id.clone(),
                full_name,
                initials,
                color_class,
            });
        }

        (UserDirectory { users }, assignments)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Find a user by full name (trimmed, case-insensitive)
    pub fn find(&self, name: &str) -> Option<&User> {
        let name = name.trim();
        self.users
            .iter()
            .find(|u| u.full_name.eq_ignore_ascii_case(name))
    }

    /// Resolve a name to an avatar. Names not in the directory get derived
    /// initials and the default color; this never fails.
    pub fn avatar(&self, name: &str) -> Avatar {
        match self.find(name) {
            Some(user) => Avatar {
                name: user.full_name.clone(),
                initials: user.initials.clone(),
                color_class: user.color_class.clone(),
            },
            None => Avatar {
                name: name.trim().to_string(),
                initials: derive_initials(name),
                color_class: DEFAULT_COLOR_CLASS.to_string(),
            },
        }
    }
}

/// First letter of the first and last name, uppercased. A single name gives
/// one letter; an empty name gives `?`.
pub fn derive_initials(full_name: &str) -> String {
    let parts: Vec<&str> = full_name.split_whitespace().collect();
    let first = parts.first().and_then(|p| p.chars().next());
    let last = if parts.len() > 1 {
        parts.last().and_then(|p| p.chars().next())
    } else {
        None
    };
    let initials: String = first
        .into_iter()
        .chain(last)
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

/// Stable palette pick for a user id
fn palette_color_for(user_id: &str) -> &'static str {
    let sum = user_id
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    USER_COLOR_PALETTE[sum % USER_COLOR_PALETTE.len()]
}
