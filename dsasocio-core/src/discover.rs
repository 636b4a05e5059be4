//! Partner discovery filter

use std::collections::HashSet;

use crate::models::{Language, Profile, Role, SkillLevel};

/// Filter for the discover page. `None` on a facet means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerFilter {
    pub search: String,
    pub skill_level: Option<SkillLevel>,
    pub role: Option<Role>,
    pub language: Option<Language>,
}

impl PartnerFilter {
    /// Case-insensitive name substring AND every facet that is set.
    pub fn matches(&self, profile: &Profile) -> bool {
        let needle = self.search.trim().to_lowercase();
        let name_ok = needle.is_empty() || profile.full_name.to_lowercase().contains(&needle);

        name_ok
            && self.skill_level.map_or(true, |s| s == profile.skill_level)
            && self.role.map_or(true, |r| r == profile.role)
            && self.language.map_or(true, |l| l == profile.preferred_language)
    }
}

/// Profiles matching `filter`, minus the caller and anyone in `exclude`
/// (existing partners, outstanding requests). Input order is kept.
pub fn discover<'a>(
    profiles: &'a [Profile],
    filter: &PartnerFilter,
    me: &str,
    exclude: &HashSet<String>,
) -> Vec<&'a Profile> {
    profiles
        .iter()
        .filter(|p| p.user_id != me && !exclude.contains(&p.user_id))
        .filter(|p| filter.matches(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(user: &str, name: &str, skill: SkillLevel, role: Role, lang: Language) -> Profile {
        Profile {
            id: format!("p-{user}"),
            user_id: user.into(),
            full_name: name.into(),
            skill_level: skill,
            role,
            preferred_language: lang,
            created_at: Utc::now(),
        }
    }

    fn people() -> Vec<Profile> {
        use Language::*;
        use Role::*;
        use SkillLevel::*;
        vec![
            profile("1", "Alex Chen", Intermediate, CollegeStudent, Python),
            profile("2", "Sarah Johnson", Advanced, WorkingProfessional, Java),
            profile("3", "Mike Brown", Beginner, CollegeStudent, JavaScript),
            profile("4", "Emily Davis", Intermediate, WorkingProfessional, Cpp),
            profile("5", "Chris Wilson", Advanced, CollegeStudent, Python),
        ]
    }

    #[test]
    fn empty_filter_matches_everyone_but_me() {
        let people = people();
        let found = discover(&people, &PartnerFilter::default(), "1", &HashSet::new());
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|p| p.user_id != "1"));
    }

    #[test]
    fn search_is_case_insensitive() {
        let people = people();
        let filter = PartnerFilter {
            search: "  CHRIS ".into(),
            ..Default::default()
        };
        let found = discover(&people, &filter, "me", &HashSet::new());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name, "Chris Wilson");
    }

    #[test]
    fn facets_combine() {
        let people = people();
        let filter = PartnerFilter {
            skill_level: Some(SkillLevel::Advanced),
            language: Some(Language::Python),
            ..Default::default()
        };
        let found = discover(&people, &filter, "me", &HashSet::new());
        let ids: Vec<_> = found.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(ids, vec!["5"]);
    }

    #[test]
    fn excluded_users_are_hidden() {
        let people = people();
        let exclude: HashSet<String> = ["2".to_string(), "4".to_string()].into();
        let filter = PartnerFilter {
            role: Some(Role::WorkingProfessional),
            ..Default::default()
        };
        assert!(discover(&people, &filter, "me", &exclude).is_empty());
    }
}
