//! Question classification for analytics
//!
//! Two best-effort layers tag each user message:
//! - keyword topic tagging against a fixed topic set (zero or more matches)
//! - a single-label category from a closed enum, normally produced by a
//!   secondary upstream call and normalized here; any failure degrades to
//!   `Category::General` and never reaches the chat caller.

use serde::Serialize;

/// Closed set of question categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    /// Work history and roles
    Experience,
    /// Technical and soft skills
    Skills,
    /// Degrees, schools, certifications
    Education,
    /// Personal and professional projects
    Projects,
    /// Catch-all for everything else
    General,
}

impl Category {
    /// All categories, in a stable order
    pub const ALL: [Category; 5] = [
        Category::Experience,
        Category::Skills,
        Category::Education,
        Category::Projects,
        Category::General,
    ];

    /// Canonical label for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Experience => "Experience",
            Category::Skills => "Skills",
            Category::Education => "Education",
            Category::Projects => "Projects",
            Category::General => "General",
        }
    }

    /// Labels offered to the upstream classifier
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }

    /// Normalize free text to one category
    ///
    /// Exact case-insensitive match first, then substring fallback in either
    /// direction, else `General`. This is the single place loose upstream
    /// labels are mapped onto the closed set.
    pub fn from_label(label: &str) -> Category {
        let normalized = label.trim().to_lowercase();
        if normalized.is_empty() {
            return Category::General;
        }
        for category in Self::ALL {
            if normalized == category.as_str().to_lowercase() {
                return category;
            }
        }
        for category in Self::ALL {
            let name = category.as_str().to_lowercase();
            if normalized.contains(&name) || name.contains(&normalized) {
                return category;
            }
        }
        Category::General
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed topic set with the keywords that select each topic
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "experience",
        &["experience", "work", "job", "career", "company", "role", "employer"],
    ),
    (
        "skills",
        &["skill", "skills", "technology", "technologies", "language", "languages", "tools"],
    ),
    (
        "education",
        &["education", "degree", "university", "college", "school", "certification"],
    ),
    (
        "projects",
        &["project", "projects", "built", "portfolio", "github"],
    ),
    (
        "contact",
        &["contact", "email", "phone", "reach", "linkedin"],
    ),
];

/// Tag a message with every topic whose keywords it mentions
///
/// Case-insensitive word overlap; a message may match zero or more topics.
pub fn topics_for(message: &str) -> Vec<&'static str> {
    let lowered = message.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| words.contains(k)))
        .map(|(topic, _)| *topic)
        .collect()
}
