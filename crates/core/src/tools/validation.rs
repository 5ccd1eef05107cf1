//! Field rules for tool input, shared by every write path.
//!
//! Raw request bodies ([`CreateTool`], [`UpdateTool`]) are trimmed, checked
//! with `validator` for the string rules, and parsed into the typed
//! [`NewTool`] / [`ToolPatch`] payloads the store accepts. Every violated
//! rule is reported at once; nothing is persisted when any rule fails.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use super::{NewTool, ToolCategory, ToolPatch, ToolStatus};
use crate::types::DbId;

/// Report order for violations, by wire field name.
const FIELD_ORDER: &[&str] = &[
    "title",
    "description",
    "descriptionVi",
    "url",
    "category",
    "status",
    "image",
    "patch",
];

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field: String,
    pub rule_type: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, rule_type: &str, message: impl Into<String>) -> Self {
        FieldViolation {
            field: field.to_string(),
            rule_type: rule_type.to_string(),
            message: message.into(),
        }
    }
}

/// Raw create request. Missing strings deserialize as empty so they surface
/// as `required` violations instead of body rejections.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTool {
    #[serde(default)]
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    pub description_vi: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank"), length(max = 500), url)]
    pub url: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub category: String,
    pub status: Option<String>,
    pub featured: Option<bool>,
    #[validate(length(max = 500), url)]
    pub image: Option<String>,
    pub created_by: Option<DbId>,
}

impl CreateTool {
    fn normalized(&self) -> CreateTool {
        CreateTool {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            description_vi: trimmed_non_blank(self.description_vi.as_deref()),
            url: self.url.trim().to_string(),
            category: self.category.trim().to_string(),
            status: trimmed_non_blank(self.status.as_deref()),
            featured: self.featured,
            image: trimmed_non_blank(self.image.as_deref()),
            created_by: self.created_by,
        }
    }
}

/// Raw partial update. Absent fields are left untouched; an empty string for
/// `descriptionVi` or `image` clears the column.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTool {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    pub description_vi: Option<String>,
    #[validate(custom(function = "not_blank"), length(max = 500), url)]
    pub url: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub category: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    #[validate(length(max = 500), url)]
    pub image: Option<String>,
}

impl UpdateTool {
    fn normalized(&self) -> UpdateTool {
        let trim = |v: &Option<String>| v.as_deref().map(|s| s.trim().to_string());
        UpdateTool {
            title: trim(&self.title),
            description: trim(&self.description),
            description_vi: trim(&self.description_vi),
            url: trim(&self.url),
            category: trim(&self.category),
            status: trim(&self.status),
            featured: self.featured,
            image: trim(&self.image).filter(|s| !s.is_empty()),
        }
    }
}

/// Validate and normalize a create request.
pub fn validate_create(input: &CreateTool) -> Result<NewTool, Vec<FieldViolation>> {
    let input = input.normalized();
    let mut violations = collect_violations(input.validate());

    let category = parse_member::<ToolCategory>("category", Some(&input.category), &mut violations);
    let status = parse_member::<ToolStatus>("status", input.status.as_deref(), &mut violations);

    match category {
        Some(category) if violations.is_empty() => Ok(NewTool {
            title: input.title,
            description: input.description,
            description_vi: input.description_vi,
            url: input.url,
            category,
            status: status.unwrap_or_default(),
            featured: input.featured.unwrap_or(false),
            image: input.image,
            created_by: input.created_by,
        }),
        _ => Err(finish(violations)),
    }
}

/// Validate a partial update. Only fields present in `input` are checked.
pub fn validate_patch(input: &UpdateTool) -> Result<ToolPatch, Vec<FieldViolation>> {
    let cleared_image = matches!(input.image.as_deref().map(str::trim), Some(""));
    let input = input.normalized();
    let mut violations = collect_violations(input.validate());

    let category = parse_member::<ToolCategory>("category", input.category.as_deref(), &mut violations);
    let status = parse_member::<ToolStatus>("status", input.status.as_deref(), &mut violations);

    let patch = ToolPatch {
        title: input.title,
        description: input.description,
        description_vi: input
            .description_vi
            .map(|s| if s.is_empty() { None } else { Some(s) }),
        url: input.url,
        category,
        status,
        featured: input.featured,
        image: if cleared_image { Some(None) } else { input.image.map(Some) },
    };

    if violations.is_empty() && patch.is_empty() {
        violations.push(FieldViolation::new("patch", "required", "No fields to update"));
    }

    if violations.is_empty() {
        Ok(patch)
    } else {
        Err(finish(violations))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

fn trimmed_non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse an enumerated field, recording a violation when the value is not a
/// member. Blank values are skipped; `not_blank` already covers them.
fn parse_member<T: FromStr>(
    field: &str,
    value: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    let value = value.filter(|v| !v.is_empty())?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            violations.push(FieldViolation::new(
                field,
                "enum_values",
                format!("Invalid {field} value"),
            ));
            None
        }
    }
}

fn collect_violations(result: Result<(), ValidationErrors>) -> Vec<FieldViolation> {
    let Err(errors) = result else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    for (field, errs) in errors.field_errors() {
        let field = field.to_string();
        for err in errs.iter() {
            violations.push(describe(&field, err));
        }
    }
    violations
}

fn describe(field: &str, err: &ValidationError) -> FieldViolation {
    let label = label(field);
    let code = err.code.as_ref();
    let message = match code {
        "required" => format!("{label} is required"),
        "length" => match err.params.get("max") {
            Some(max) => format!("{label} must be at most {max} characters"),
            None => format!("{label} has an invalid length"),
        },
        "url" => format!("Invalid {label} format"),
        other => format!("{label} failed rule {other}"),
    };
    FieldViolation::new(&wire_name(field), code, message)
}

fn label(field: &str) -> &'static str {
    match field {
        "title" => "Title",
        "description" => "Description",
        "description_vi" => "Vietnamese description",
        "url" => "URL",
        "category" => "Category",
        "status" => "Status",
        "image" => "image URL",
        _ => "Field",
    }
}

/// `description_vi` -> `descriptionVi`.
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Drop secondary violations on fields that are missing outright, then order
/// the list deterministically.
fn finish(mut violations: Vec<FieldViolation>) -> Vec<FieldViolation> {
    let missing: Vec<String> = violations
        .iter()
        .filter(|v| v.rule_type == "required")
        .map(|v| v.field.clone())
        .collect();
    violations.retain(|v| v.rule_type == "required" || !missing.contains(&v.field));

    let rank = |field: &str| {
        FIELD_ORDER
            .iter()
            .position(|f| *f == field)
            .unwrap_or(FIELD_ORDER.len())
    };
    violations.sort_by(|a, b| {
        rank(&a.field)
            .cmp(&rank(&b.field))
            .then_with(|| a.rule_type.cmp(&b.rule_type))
    });
    violations
}
