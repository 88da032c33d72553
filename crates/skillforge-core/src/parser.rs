//! TOML catalog parser.
//!
//! Loads a skill/question catalog from a TOML file and lints it for the
//! reference problems that would otherwise surface as degraded scores at
//! runtime (dangling skill references, incomplete mcq definitions).

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    Difficulty, Question, QuestionKind, Skill, SkillCategory, SkillDependency,
};

/// A parsed catalog: the reference data one engine instance serves.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub id: String,
    pub name: String,
    pub description: String,
    pub skills: Vec<Skill>,
    pub dependencies: Vec<SkillDependency>,
    pub questions: Vec<Question>,
}

/// A non-fatal catalog problem.
#[derive(Debug, Clone)]
pub struct CatalogWarning {
    /// Skill code or question id the warning is about, if any.
    pub subject: Option<String>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Intermediate TOML structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    catalog: TomlCatalogHeader,
    #[serde(default)]
    skills: Vec<TomlSkill>,
    #[serde(default)]
    dependencies: Vec<TomlDependency>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlCatalogHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlSkill {
    code: String,
    display_name: String,
    category: String,
    #[serde(default)]
    importance_weight: Option<f64>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlDependency {
    parent: String,
    child: String,
    #[serde(default)]
    weight: Option<f64>,
    kind: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u64,
    skill: String,
    text: String,
    #[serde(default)]
    topic: Option<String>,
    difficulty: String,
    #[serde(default)]
    difficulty_override: Option<f64>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: Option<String>,
    #[serde(default)]
    context_hint: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a catalog TOML file.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;
    parse_catalog_str(&content, path)
}

/// Parse a catalog TOML string (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let skills = parsed
        .skills
        .into_iter()
        .map(|s| {
            let category = SkillCategory::from_str(&s.category)
                .map_err(|e| anyhow::anyhow!("skill {}: {e}", s.code))?;
            Ok(Skill {
                code: s.code,
                display_name: s.display_name,
                category,
                importance_weight: s.importance_weight.unwrap_or(1.0),
                description: s.description,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let dependencies = parsed
        .dependencies
        .into_iter()
        .map(|d| {
            let kind = d
                .kind
                .parse()
                .map_err(|e: String| anyhow::anyhow!("dependency {} -> {}: {e}", d.parent, d.child))?;
            Ok(SkillDependency {
                parent: d.parent,
                child: d.child,
                weight: d.weight.unwrap_or(1.0),
                kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let difficulty = Difficulty::from_str(&q.difficulty)
                .map_err(|e| anyhow::anyhow!("question {}: {e}", q.id))?;
            let kind = match q.kind.as_str() {
                "mcq" | "choice" => QuestionKind::Mcq {
                    options: q.options,
                    correct_answer: q.correct_answer.unwrap_or_default(),
                },
                "text" => QuestionKind::Text {
                    context_hint: q.context_hint,
                },
                other => anyhow::bail!("question {}: unknown question type: {other}", q.id),
            };
            Ok(Question {
                id: q.id,
                skill: q.skill,
                text: q.text,
                topic: q.topic,
                difficulty,
                difficulty_override: q.difficulty_override,
                kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Catalog {
        id: parsed.catalog.id,
        name: parsed.catalog.name,
        description: parsed.catalog.description,
        skills,
        dependencies,
        questions,
    })
}

/// Lint a catalog for reference problems.
pub fn validate_catalog(catalog: &Catalog) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();
    let mut codes: HashSet<&str> = HashSet::new();

    for skill in &catalog.skills {
        if !codes.insert(&skill.code) {
            warnings.push(CatalogWarning {
                subject: Some(skill.code.clone()),
                message: format!("duplicate skill code '{}'", skill.code),
            });
        }
        if skill.importance_weight < 0.0 {
            warnings.push(CatalogWarning {
                subject: Some(skill.code.clone()),
                message: "importance_weight must be >= 0".into(),
            });
        }
    }

    for dep in &catalog.dependencies {
        for code in [&dep.parent, &dep.child] {
            if !codes.contains(code.as_str()) {
                warnings.push(CatalogWarning {
                    subject: Some(code.clone()),
                    message: format!(
                        "dependency {} -> {} references unknown skill '{code}'",
                        dep.parent, dep.child
                    ),
                });
            }
        }
        if !(0.0..=1.0).contains(&dep.weight) {
            warnings.push(CatalogWarning {
                subject: Some(dep.parent.clone()),
                message: format!(
                    "dependency {} -> {} weight {} outside [0, 1]",
                    dep.parent, dep.child, dep.weight
                ),
            });
        }
    }

    let mut question_ids: HashSet<u64> = HashSet::new();
    for question in &catalog.questions {
        let subject = Some(question.id.to_string());
        if !question_ids.insert(question.id) {
            warnings.push(CatalogWarning {
                subject: subject.clone(),
                message: format!("duplicate question id {}", question.id),
            });
        }
        if !codes.contains(question.skill.as_str()) {
            warnings.push(CatalogWarning {
                subject: subject.clone(),
                message: format!("question references unknown skill '{}'", question.skill),
            });
        }
        if let QuestionKind::Mcq {
            options,
            correct_answer,
        } = &question.kind
        {
            if options.len() < 2 {
                warnings.push(CatalogWarning {
                    subject: subject.clone(),
                    message: "mcq question needs at least two options".into(),
                });
            }
            if !options.iter().any(|o| o == correct_answer) {
                warnings.push(CatalogWarning {
                    subject,
                    message: "mcq correct_answer is not among the options".into(),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = r#"
[catalog]
id = "core-eng"
name = "Core Engineering"
description = "Baseline engineering skills"

[[skills]]
code = "basics"
display_name = "Programming Basics"
category = "programming"

[[skills]]
code = "rust"
display_name = "Rust"
category = "programming"
importance_weight = 1.5

[[dependencies]]
parent = "basics"
child = "rust"
weight = 0.8
kind = "prerequisite"

[[questions]]
id = 1
skill = "rust"
text = "Which keyword declares an immutable binding?"
topic = "language-basics"
difficulty = "easy"
type = "mcq"
options = ["let", "var", "mut"]
correct_answer = "let"

[[questions]]
id = 2
skill = "rust"
text = "Explain ownership and borrowing."
difficulty = "intermediate"
type = "text"
context_hint = "moves, borrows, lifetimes"
"#;

    fn source() -> PathBuf {
        PathBuf::from("catalog.toml")
    }

    #[test]
    fn parses_sample_catalog() {
        let catalog = parse_catalog_str(SAMPLE, &source()).unwrap();
        assert_eq!(catalog.id, "core-eng");
        assert_eq!(catalog.skills.len(), 2);
        assert_eq!(catalog.dependencies.len(), 1);
        assert_eq!(catalog.questions.len(), 2);
        assert!((catalog.skills[1].importance_weight - 1.5).abs() < f64::EPSILON);
        assert!(catalog.questions[0].kind.is_mcq());
        assert!(validate_catalog(&catalog).is_empty());
    }

    #[test]
    fn rejects_unknown_question_type() {
        let content = SAMPLE.replace("type = \"text\"", "type = \"essay\"");
        let err = parse_catalog_str(&content, &source()).unwrap_err();
        assert!(err.to_string().contains("unknown question type"));
    }

    #[test]
    fn rejects_unknown_category() {
        let content = SAMPLE.replace("category = \"programming\"", "category = \"wizardry\"");
        assert!(parse_catalog_str(&content, &source()).is_err());
    }

    #[test]
    fn warns_on_dangling_references() {
        let mut catalog = parse_catalog_str(SAMPLE, &source()).unwrap();
        catalog.dependencies.push(SkillDependency {
            parent: "rust".into(),
            child: "ghost".into(),
            weight: 2.0,
            kind: crate::model::DependencyKind::Advanced,
        });
        catalog.questions[1].skill = "ghost".into();

        let warnings = validate_catalog(&catalog);
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.message.contains("unknown skill 'ghost'")));
        assert!(warnings.iter().any(|w| w.message.contains("outside [0, 1]")));
    }

    #[test]
    fn warns_on_bad_mcq() {
        let content = SAMPLE.replace("correct_answer = \"let\"", "correct_answer = \"fn\"");
        let catalog = parse_catalog_str(&content, &source()).unwrap();
        let warnings = validate_catalog(&catalog);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("not among the options")));
    }
}
