use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectRole {
    Member,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// Skill id -> proficiency level (1 = beginner .. 5 = expert).
    pub skills: BTreeMap<String, u8>,
    pub role: ProjectRole,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            firstname: firstname.into(),
            lastname: lastname.into(),
            email: email.into(),
            skills: BTreeMap::new(),
            role: ProjectRole::Member,
        }
    }

    pub fn with_skill(mut self, skill_id: impl Into<String>, level: u8) -> Self {
        self.skills.insert(skill_id.into(), level.clamp(1, 5));
        self
    }

    pub fn with_role(mut self, role: ProjectRole) -> Self {
        self.role = role;
        self
    }

    pub fn proficiency(&self, skill_id: &str) -> Option<u8> {
        self.skills.get(skill_id).copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: String,
}

impl Skill {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Read-only skill lookup loaded once per assignment run.
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: HashMap<String, Skill>,
}

impl SkillCatalog {
    pub fn new(skills: Vec<Skill>) -> Self {
        Self {
            skills: skills.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    pub fn lookup(&self, skill_id: &str) -> Result<&Skill> {
        self.skills
            .get(skill_id)
            .ok_or_else(|| Error::SkillNotFound(skill_id.to_string()))
    }

    pub fn contains(&self, skill_id: &str) -> bool {
        self.skills.contains_key(skill_id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
