use super::read_json;
use pfa_access::content::normalize_course;
use pfa_access::error::Result;
use serde_json::Value;
use std::path::Path;

pub fn execute(path: &Path, id: Option<String>, summary: bool) -> Result<()> {
    let doc: Value = read_json(path)?;
    let id = id.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("course")
            .to_string()
    });

    let course = normalize_course(&id, doc)?;

    if summary {
        println!("{} ({})", course.title, course.id);
        println!(
            "  {} modules, {} lessons, {} minutes",
            course.modules.len(),
            course.lesson_count(),
            course.total_minutes()
        );
        for module in &course.modules {
            println!("  - {} ({} lessons)", module.title, module.lessons.len());
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&course)?);
    }

    Ok(())
}
