//! The `skillforge validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use skillforge_core::graph::SkillGraph;
use skillforge_core::parser;

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalog = parser::parse_catalog(&catalog_path)?;
    println!(
        "Catalog: {} ({} skills, {} dependencies, {} questions)",
        catalog.name,
        catalog.skills.len(),
        catalog.dependencies.len(),
        catalog.questions.len()
    );

    let warnings = parser::validate_catalog(&catalog);
    for w in &warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|s| format!("  [{s}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    let graph = SkillGraph::build(&catalog.skills, &catalog.dependencies);
    graph.topological_order()?;

    let mut table = Table::new();
    table.set_header(vec!["Skill", "Category", "Level", "Prerequisites", "Questions"]);
    for skill in &catalog.skills {
        let level = graph
            .level(&skill.code)
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".to_string());
        let prerequisites = graph.prerequisites_of(&skill.code).len();
        let questions = catalog
            .questions
            .iter()
            .filter(|q| q.skill == skill.code)
            .count();
        table.add_row(vec![
            skill.code.clone(),
            skill.category.to_string(),
            level,
            prerequisites.to_string(),
            questions.to_string(),
        ]);
    }
    println!("{table}");

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
