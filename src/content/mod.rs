// Course document schema adapter
use crate::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored document layout a course was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// Flat `lessons` list
    Legacy,
    /// `modules`, each with its own `lessons`
    Modular,
}

/// Canonical in-memory course, independent of how it was stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub modules: Vec<CourseModule>,
    pub source_schema: SchemaVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseModule {
    pub title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub duration_minutes: u32,
}

impl Course {
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn total_minutes(&self) -> u32 {
        self.lessons().map(|l| l.duration_minutes).sum()
    }

    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }

    pub fn find_lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons().find(|l| l.id == lesson_id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLesson {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    duration_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LegacyCourse {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    lessons: Vec<StoredLesson>,
}

#[derive(Debug, Deserialize)]
struct StoredModule {
    title: String,
    #[serde(default)]
    lessons: Vec<StoredLesson>,
}

#[derive(Debug, Deserialize)]
struct ModularCourse {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    modules: Vec<StoredModule>,
}

/// Work out which layout a document uses.
///
/// An explicit `schemaVersion` wins; unversioned documents that already carry
/// `modules` are read as modular.
fn detect_schema(doc: &serde_json::Map<String, Value>) -> Result<SchemaVersion> {
    match doc.get("schemaVersion") {
        None | Some(Value::Null) => {
            if doc.contains_key("modules") {
                Ok(SchemaVersion::Modular)
            } else {
                Ok(SchemaVersion::Legacy)
            }
        }
        Some(Value::Number(n)) => match n.as_u64() {
            Some(1) => Ok(SchemaVersion::Legacy),
            Some(2) => Ok(SchemaVersion::Modular),
            Some(other) => Err(AccessError::UnsupportedSchema(other)),
            None => Err(AccessError::InvalidInput(format!(
                "schemaVersion must be a positive integer, got {}",
                n
            ))),
        },
        Some(other) => Err(AccessError::InvalidInput(format!(
            "schemaVersion must be a number, got {}",
            other
        ))),
    }
}

fn convert_lessons(module_index: usize, lessons: Vec<StoredLesson>) -> Vec<Lesson> {
    lessons
        .into_iter()
        .enumerate()
        .map(|(lesson_index, stored)| Lesson {
            id: stored
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("{}-{}", module_index, lesson_index)),
            title: stored.title,
            video_url: stored.video_url,
            duration_minutes: stored.duration_minutes.unwrap_or(0),
        })
        .collect()
}

/// Read a stored course document in either layout into a [`Course`]
pub fn normalize_course(id: &str, doc: Value) -> Result<Course> {
    let Value::Object(map) = &doc else {
        return Err(AccessError::InvalidInput(
            "course document must be a JSON object".to_string(),
        ));
    };

    let schema = detect_schema(map)?;
    tracing::debug!("Reading course {} as {:?}", id, schema);

    let course = match schema {
        SchemaVersion::Legacy => {
            let legacy: LegacyCourse = serde_json::from_value(doc)?;
            let module = CourseModule {
                title: legacy.title.clone(),
                lessons: convert_lessons(0, legacy.lessons),
            };
            Course {
                id: id.to_string(),
                title: legacy.title,
                description: legacy.description,
                modules: vec![module],
                source_schema: schema,
            }
        }
        SchemaVersion::Modular => {
            let modular: ModularCourse = serde_json::from_value(doc)?;
            let modules = modular
                .modules
                .into_iter()
                .enumerate()
                .map(|(index, module)| CourseModule {
                    title: module.title,
                    lessons: convert_lessons(index, module.lessons),
                })
                .collect();
            Course {
                id: id.to_string(),
                title: modular.title,
                description: modular.description,
                modules,
                source_schema: schema,
            }
        }
    };

    Ok(course)
}
