//! Personal and shared problem checklists

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{bounded, non_blank};
use super::ValidationError;

const MAX_PROBLEM_NAME_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row from `dsa_folders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsaFolder {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row from `dsa_problems`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsaProblem {
    pub id: String,
    pub folder_id: String,
    pub name: String,
    pub link: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub note: Option<String>,
    pub solved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for adding a problem to a checklist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProblem {
    pub name: String,
    pub link: String,
    pub difficulty: Difficulty,
}

impl NewProblem {
    /// Both name and link are required; the link must be http(s).
    pub fn new(name: &str, link: &str, difficulty: Difficulty) -> Result<Self, ValidationError> {
        let name = non_blank("name", name)?;
        bounded("name", &name, MAX_PROBLEM_NAME_LEN)?;

        let link = non_blank("link", link)?;
        if !(link.starts_with("https://") || link.starts_with("http://")) {
            return Err(ValidationError::InvalidFormat {
                field: "link",
                reason: "must be an http(s) URL",
            });
        }

        Ok(Self {
            name,
            link,
            difficulty,
        })
    }
}

/// Row from `shared_dsa_sheets`; one per friendship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedSheet {
    pub id: String,
    pub friend_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Folder,
    Problem,
}

/// Row from `shared_dsa_items`: a folder or problem node in a shared sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedItem {
    pub id: String,
    pub sheet_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row from `shared_dsa_problems`, keyed by the item it details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedProblem {
    pub id: String,
    pub item_id: String,
    pub name: String,
    pub link: String,
    pub difficulty: Difficulty,
}
