//! Keyword and declaration based alignment of a project against policy
//! frameworks: Victorian government priorities, national priorities, the
//! seventeen UN Sustainable Development Goals and sector buckets.
//!
//! Matching is plain lowercase substring containment over the project
//! description. Tables are scanned in declaration order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct FrameworkCategory {
    pub key: &'static str,
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

const fn category(
    key: &'static str,
    label: &'static str,
    keywords: &'static [&'static str],
) -> FrameworkCategory {
    FrameworkCategory {
        key,
        label,
        keywords,
    }
}

pub const VICTORIAN_FRAMEWORKS: [FrameworkCategory; 7] = [
    category(
        "plan_for_victoria",
        "Plan for Victoria",
        &["community", "infrastructure", "liveability", "victoria", "regional"],
    ),
    category(
        "melbourne_2030",
        "Melbourne 2030",
        &["melbourne", "urban", "metropolitan", "transport", "green space"],
    ),
    category(
        "activity_centres_program",
        "Activity Centres Program",
        &["activity centre", "local business", "precinct", "town centre", "hub"],
    ),
    category(
        "greenfields_housing_plan",
        "Greenfields Housing Plan",
        &["housing", "affordable", "homes", "residential", "development"],
    ),
    category(
        "clean_economy_workforce_strategy",
        "Clean Economy Workforce Strategy",
        &["clean energy", "renewable", "green jobs", "workforce", "training", "sustainab"],
    ),
    category(
        "victorian_budget_2025_26",
        "Victorian Budget 2025/26",
        &["investment", "economic", "employment", "jobs", "growth"],
    ),
    category(
        "creative_state_2025",
        "Creative State 2025",
        &["creative", "arts", "film", "screen", "culture", "music"],
    ),
];

pub const NATIONAL_FRAMEWORKS: [FrameworkCategory; 4] = [
    category(
        "closing_the_gap",
        "Closing the Gap",
        &["indigenous", "first nations", "aboriginal", "torres strait"],
    ),
    category(
        "national_housing_accord",
        "National Housing Accord",
        &["housing", "homelessness", "affordable", "rental"],
    ),
    category(
        "net_zero_2050",
        "Net Zero 2050",
        &["net zero", "emissions", "carbon", "renewable", "climate"],
    ),
    category(
        "revive_cultural_policy",
        "Revive National Cultural Policy",
        &["arts", "culture", "storytelling", "creative", "heritage"],
    ),
];

pub const SDG_GOALS: [FrameworkCategory; 17] = [
    category("sdg_1", "No Poverty", &["poverty", "low income", "disadvantage", "welfare"]),
    category("sdg_2", "Zero Hunger", &["hunger", "food", "nutrition", "agricultur"]),
    category("sdg_3", "Good Health and Well-being", &["health", "wellbeing", "mental", "medical"]),
    category("sdg_4", "Quality Education", &["education", "learning", "school", "training", "skills"]),
    category("sdg_5", "Gender Equality", &["gender", "women", "girls", "equality"]),
    category("sdg_6", "Clean Water and Sanitation", &["water", "sanitation", "hygiene"]),
    category("sdg_7", "Affordable and Clean Energy", &["energy", "solar", "renewable", "electricity"]),
    category(
        "sdg_8",
        "Decent Work and Economic Growth",
        &["employment", "jobs", "economic", "work", "livelihood"],
    ),
    category(
        "sdg_9",
        "Industry, Innovation and Infrastructure",
        &["innovation", "infrastructure", "technology", "industry", "digital"],
    ),
    category(
        "sdg_10",
        "Reduced Inequalities",
        &["inequality", "inclusion", "diversity", "accessib", "marginalised"],
    ),
    category(
        "sdg_11",
        "Sustainable Cities and Communities",
        &["community", "cities", "urban", "housing", "public space"],
    ),
    category(
        "sdg_12",
        "Responsible Consumption and Production",
        &["waste", "recycl", "circular", "consumption"],
    ),
    category("sdg_13", "Climate Action", &["climate", "emissions", "carbon", "resilience"]),
    category("sdg_14", "Life Below Water", &["ocean", "marine", "coastal", "fisheries"]),
    category("sdg_15", "Life on Land", &["biodiversity", "forest", "land", "ecosystem", "wildlife"]),
    category(
        "sdg_16",
        "Peace, Justice and Strong Institutions",
        &["justice", "governance", "peace", "institution", "transparency"],
    ),
    category(
        "sdg_17",
        "Partnerships for the Goals",
        &["partnership", "collaboration", "stakeholder", "cooperation"],
    ),
];

pub const SECTOR_BUCKETS: [FrameworkCategory; 5] = [
    category("arts_culture", "Arts and Culture", &["arts", "film", "music", "theatre", "culture"]),
    category(
        "community_services",
        "Community Services",
        &["community", "volunteer", "support services", "outreach"],
    ),
    category(
        "environment",
        "Environment",
        &["environment", "climate", "conservation", "sustainab"],
    ),
    category("education", "Education", &["education", "school", "learning", "students"]),
    category("health", "Health", &["health", "wellbeing", "hospital", "care"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkGroup {
    Victorian,
    National,
    Sdg,
    Sector,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringRule {
    /// Declared membership jumps straight to `base + declared_bonus`;
    /// otherwise keywords add `per_keyword` each.
    DeclaredOrKeywords {
        base: f64,
        declared_bonus: f64,
        per_keyword: f64,
    },
    Keywords { base: f64, per_keyword: f64 },
}

impl FrameworkGroup {
    pub fn categories(self) -> &'static [FrameworkCategory] {
        match self {
            Self::Victorian => &VICTORIAN_FRAMEWORKS,
            Self::National => &NATIONAL_FRAMEWORKS,
            Self::Sdg => &SDG_GOALS,
            Self::Sector => &SECTOR_BUCKETS,
        }
    }

    pub const fn rule(self) -> ScoringRule {
        match self {
            Self::Victorian | Self::National => ScoringRule::DeclaredOrKeywords {
                base: 60.0,
                declared_bonus: 30.0,
                per_keyword: 10.0,
            },
            Self::Sdg | Self::Sector => ScoringRule::Keywords {
                base: 50.0,
                per_keyword: 15.0,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProfile {
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "frameworkAlignment")]
    pub framework_alignment: Vec<String>,
}

impl ProjectProfile {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            framework_alignment: Vec::new(),
        }
    }

    #[must_use]
    pub fn declaring(mut self, key: impl Into<String>) -> Self {
        self.framework_alignment.push(key.into());
        self
    }

    fn declares(&self, key: &str) -> bool {
        self.framework_alignment
            .iter()
            .any(|k| k.trim().eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub key: String,
    pub label: String,
    pub score: f64,
    pub declared: bool,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAlignment {
    pub group: FrameworkGroup,
    pub categories: Vec<CategoryScore>,
    pub total_score: f64,
}

impl GroupAlignment {
    pub fn score_of(&self, key: &str) -> Option<f64> {
        self.categories.iter().find(|c| c.key == key).map(|c| c.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkAlignment {
    pub victorian: GroupAlignment,
    pub national: GroupAlignment,
    pub sdg: GroupAlignment,
    pub sector: GroupAlignment,
    /// Mean over every category of every group.
    pub total_score: f64,
}

impl FrameworkAlignment {
    pub fn calculate(project: &ProjectProfile) -> Self {
        let description = project.description.to_lowercase();
        let victorian = score_group(FrameworkGroup::Victorian, project, &description);
        let national = score_group(FrameworkGroup::National, project, &description);
        let sdg = score_group(FrameworkGroup::Sdg, project, &description);
        let sector = score_group(FrameworkGroup::Sector, project, &description);

        let mut alignment = Self {
            victorian,
            national,
            sdg,
            sector,
            total_score: 0.0,
        };
        alignment.total_score = mean(
            alignment
                .groups()
                .into_iter()
                .flat_map(|g| g.categories.iter().map(|c| c.score)),
        );
        alignment
    }

    pub fn groups(&self) -> [&GroupAlignment; 4] {
        [&self.victorian, &self.national, &self.sdg, &self.sector]
    }
}

fn score_group(group: FrameworkGroup, project: &ProjectProfile, description: &str) -> GroupAlignment {
    let categories: Vec<CategoryScore> = group
        .categories()
        .iter()
        .map(|cat| score_category(group.rule(), cat, project, description))
        .collect();
    let total_score = mean(categories.iter().map(|c| c.score));

    GroupAlignment {
        group,
        categories,
        total_score,
    }
}

fn score_category(
    rule: ScoringRule,
    category: &FrameworkCategory,
    project: &ProjectProfile,
    description: &str,
) -> CategoryScore {
    let (score, declared, matched) = match rule {
        ScoringRule::DeclaredOrKeywords {
            base,
            declared_bonus,
            per_keyword,
        } => {
            if project.declares(category.key) {
                ((base + declared_bonus).min(100.0), true, Vec::new())
            } else {
                let matched = matched_keywords(category.keywords, description);
                (keyword_score(base, per_keyword, matched.len()), false, matched)
            }
        }
        ScoringRule::Keywords { base, per_keyword } => {
            let matched = matched_keywords(category.keywords, description);
            (keyword_score(base, per_keyword, matched.len()), false, matched)
        }
    };

    CategoryScore {
        key: category.key.to_string(),
        label: category.label.to_string(),
        score,
        declared,
        matched_keywords: matched,
    }
}

fn matched_keywords(keywords: &[&str], description: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for keyword in keywords {
        if description.contains(keyword) && !out.iter().any(|k| k == keyword) {
            out.push((*keyword).to_string());
        }
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn keyword_score(base: f64, per_keyword: f64, hits: usize) -> f64 {
    per_keyword.mul_add(hits as f64, base).min(100.0)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_match_framework_counts() {
        assert_eq!(FrameworkGroup::Victorian.categories().len(), 7);
        assert_eq!(FrameworkGroup::Sdg.categories().len(), 17);
        for (idx, goal) in SDG_GOALS.iter().enumerate() {
            assert_eq!(goal.key, format!("sdg_{}", idx + 1));
        }
    }

    #[test]
    fn blank_project_gets_base_scores() {
        let alignment = FrameworkAlignment::calculate(&ProjectProfile::default());

        assert!(alignment.victorian.categories.iter().all(|c| c.score == 60.0));
        assert!(alignment.sdg.categories.iter().all(|c| c.score == 50.0));
        assert_eq!(alignment.victorian.total_score, 60.0);
        assert_eq!(alignment.sdg.total_score, 50.0);
        assert_eq!(
            alignment.groups().map(|g| g.categories.len()),
            [7, 4, 17, 5]
        );

        let expected = (7.0 * 60.0 + 4.0 * 60.0 + 17.0 * 50.0 + 5.0 * 50.0) / 33.0;
        assert!((alignment.total_score - expected).abs() < 1e-9);
    }

    #[test]
    fn declared_framework_skips_keyword_scan() {
        let project = ProjectProfile::new("A creative arts film and music culture screen project")
            .declaring(" Creative_State_2025 ");
        let alignment = FrameworkAlignment::calculate(&project);

        let creative = alignment
            .victorian
            .categories
            .iter()
            .find(|c| c.key == "creative_state_2025")
            .expect("creative category");
        assert_eq!(creative.score, 90.0);
        assert!(creative.declared);
        assert!(creative.matched_keywords.is_empty());
    }

    #[test]
    fn keywords_add_ten_per_distinct_match_and_cap() {
        let project =
            ProjectProfile::new("Creative ARTS program: film, screen, culture and music, arts again");
        let alignment = FrameworkAlignment::calculate(&project);

        // six distinct keywords: 60 + 60 caps at 100
        assert_eq!(alignment.victorian.score_of("creative_state_2025"), Some(100.0));

        let project = ProjectProfile::new("regional housing for the community");
        let alignment = FrameworkAlignment::calculate(&project);
        assert_eq!(alignment.victorian.score_of("plan_for_victoria"), Some(80.0));
        assert_eq!(alignment.victorian.score_of("greenfields_housing_plan"), Some(70.0));
    }

    #[test]
    fn sdg_keywords_add_fifteen_each() {
        let project = ProjectProfile::new("Mental health and wellbeing support");
        let alignment = FrameworkAlignment::calculate(&project);

        assert_eq!(alignment.sdg.score_of("sdg_3"), Some(95.0));
        assert_eq!(alignment.sdg.score_of("sdg_14"), Some(50.0));
        let goal = alignment
            .sdg
            .categories
            .iter()
            .find(|c| c.key == "sdg_3")
            .expect("sdg 3");
        assert_eq!(goal.matched_keywords, vec!["health", "wellbeing", "mental"]);
    }

    #[test]
    fn declarations_do_not_affect_sdgs() {
        let project = ProjectProfile::new("").declaring("sdg_13");
        let alignment = FrameworkAlignment::calculate(&project);
        assert_eq!(alignment.sdg.score_of("sdg_13"), Some(50.0));
    }
}
