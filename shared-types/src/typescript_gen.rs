use ts_rs::TS;

/// Every type exported to API consumers, in output order.
pub const API_TYPE_NAMES: &[&str] = &[
    "Permission",
    "Project",
    "SavedFilter",
    "ProjectDuplicate",
    "ResolvedPermission",
    "User",
    "Team",
    "TeamMember",
    "ProjectUser",
    "TeamProject",
    "LinkShare",
    "Task",
    "Label",
    "LabelTask",
    "TaskComment",
    "ReactionKind",
    "Reaction",
    "Webhook",
];

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;

    let result = match name {
        // Serialized as its integer discriminant
        "Permission" => "export type Permission = -1 | 0 | 1 | 2;".to_string(),

        "Project" => Project::export_to_string()?,
        "SavedFilter" => SavedFilter::export_to_string()?,
        "ProjectDuplicate" => ProjectDuplicate::export_to_string()?,
        "ResolvedPermission" => ResolvedPermission::export_to_string()?,

        "User" => User::export_to_string()?,
        "Team" => Team::export_to_string()?,
        "TeamMember" => TeamMember::export_to_string()?,
        "ProjectUser" => ProjectUser::export_to_string()?,
        "TeamProject" => TeamProject::export_to_string()?,
        "LinkShare" => LinkShare::export_to_string()?,

        "Task" => Task::export_to_string()?,
        "Label" => Label::export_to_string()?,
        "LabelTask" => LabelTask::export_to_string()?,
        "TaskComment" => TaskComment::export_to_string()?,
        "ReactionKind" => ReactionKind::export_to_string()?,
        "Reaction" => Reaction::export_to_string()?,
        "Webhook" => Webhook::export_to_string()?,

        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in shared-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .cloned()
        .collect();

    filtered.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_single_type() {
        let result = generate_typescript_definitions(&["TeamProject"]).unwrap();
        assert!(result.contains("TeamProject"));
        assert!(result.contains("permission: number"));
    }

    #[test]
    fn test_generate_all_types() {
        let result = generate_typescript_definitions(API_TYPE_NAMES).unwrap();
        assert!(result.contains("export type Permission = -1 | 0 | 1 | 2;"));
        assert!(result.contains("LinkShare"));
        assert!(result.contains("parent_project_id"));
    }

    #[test]
    fn test_unknown_type_error() {
        let result = generate_typescript_definitions(&["NamespaceUser"]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown type"));
    }

    #[test]
    fn test_empty_type_names() {
        let result = generate_typescript_definitions(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cleaned_output() {
        let result = generate_typescript_definitions(&["Project"]).unwrap();
        assert!(!result.contains("import type"));
        assert!(!result.contains("This file was generated"));
    }
}
