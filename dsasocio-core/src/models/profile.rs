//! Developer profiles and the facets partners are matched on

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{bounded, non_blank};
use super::ValidationError;

/// Maximum length for a display name
const MAX_NAME_LEN: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "College Student")]
    CollegeStudent,
    #[serde(rename = "Working Professional")]
    WorkingProfessional,
}

impl Role {
    pub const ALL: [Role; 2] = [Self::CollegeStudent, Self::WorkingProfessional];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CollegeStudent => "College Student",
            Self::WorkingProfessional => "Working Professional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Java,
    #[serde(rename = "C++")]
    Cpp,
    Python,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 4] = [Self::Java, Self::Cpp, Self::Python, Self::JavaScript];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
        }
    }
}

// Display and FromStr share the database spelling for all three facets.
macro_rules! facet_text {
    ($ty:ident, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $ty::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ValidationError::InvalidVariant {
                        field: $field,
                        value: s.to_owned(),
                    })
            }
        }
    };
}

facet_text!(SkillLevel, "skill_level");
facet_text!(Role, "role");
facet_text!(Language, "preferred_language");

/// Row from `profiles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    pub skill_level: SkillLevel,
    pub role: Role,
    pub preferred_language: Language,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `profiles`, built at sign-up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProfile {
    pub user_id: String,
    pub full_name: String,
    pub skill_level: SkillLevel,
    pub role: Role,
    pub preferred_language: Language,
}

impl NewProfile {
    /// Validate sign-up input. The name is trimmed and must be non-empty.
    pub fn new(
        user_id: &str,
        full_name: &str,
        skill_level: SkillLevel,
        role: Role,
        preferred_language: Language,
    ) -> Result<Self, ValidationError> {
        let user_id = non_blank("user_id", user_id)?;
        let full_name = non_blank("full_name", full_name)?;
        bounded("full_name", &full_name, MAX_NAME_LEN)?;

        Ok(Self {
            user_id,
            full_name,
            skill_level,
            role,
            preferred_language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facets_use_database_spelling() {
        assert_eq!(serde_json::to_string(&Role::CollegeStudent).unwrap(), "\"College Student\"");
        assert_eq!(serde_json::to_string(&Language::Cpp).unwrap(), "\"C++\"");
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!(" advanced ".parse::<SkillLevel>().unwrap(), SkillLevel::Advanced);
        assert!(matches!(
            "Rust".parse::<Language>(),
            Err(ValidationError::InvalidVariant { field: "preferred_language", .. })
        ));
    }

    #[test]
    fn profile_row_deserializes() {
        let row = r#"{
            "id": "p1",
            "user_id": "u1",
            "full_name": "Alex Chen",
            "skill_level": "Intermediate",
            "role": "College Student",
            "preferred_language": "Python",
            "created_at": "2024-05-01T10:00:00Z"
        }"#;
        let profile: Profile = serde_json::from_str(row).unwrap();
        assert_eq!(profile.role, Role::CollegeStudent);
        assert_eq!(profile.preferred_language, Language::Python);
    }

    #[test]
    fn new_profile_requires_name() {
        let err = NewProfile::new("u1", "   ", SkillLevel::Beginner, Role::CollegeStudent, Language::Java)
            .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "full_name" });

        let ok = NewProfile::new("u1", " Sam ", SkillLevel::Beginner, Role::CollegeStudent, Language::Java)
            .unwrap();
        assert_eq!(ok.full_name, "Sam");
    }
}
