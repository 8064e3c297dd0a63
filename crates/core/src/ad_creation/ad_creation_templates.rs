//! Markdown templates the four ad documents start from.

use super::ad_creation_model::{AdDocumentType, AdFilterCategory, CreatedAd, FilterSelection};

fn filter_line(selection: &FilterSelection, category: AdFilterCategory, label: &str) -> String {
    match selection.get(category) {
        Some(filter) => match filter.description.as_deref() {
            Some(description) => format!("- **{}:** {} ({})", label, filter.name, description),
            None => format!("- **{}:** {}", label, filter.name),
        },
        None => format!("- **{}:** _not available_", label),
    }
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "_None selected_".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the initial content of `document_type` for a created ad.
pub fn render_document(
    document_type: AdDocumentType,
    ad: &CreatedAd,
    selection: &FilterSelection,
) -> String {
    match document_type {
        AdDocumentType::AdDetails => format!(
            "# {}\n\n## Building blocks\n{}\n{}\n{}\n{}\n\n## Desires\n{}\n\n## Beliefs\n{}\n",
            ad.name,
            filter_line(selection, AdFilterCategory::Concept, "Concept"),
            filter_line(selection, AdFilterCategory::Angle, "Angle"),
            filter_line(selection, AdFilterCategory::Style, "Style"),
            filter_line(selection, AdFilterCategory::Hook, "Hook"),
            bullet_list(&ad.selected_desires),
            bullet_list(&ad.selected_beliefs),
        ),
        AdDocumentType::AdCopy => format!(
            "# Ad Copy\n\n## Hook\n_Write the opening line using the {} hook._\n\n## Primary text\n\n## Headline\n\n## Call to action\n",
            selection
                .get(AdFilterCategory::Hook)
                .map(|f| f.name.as_str())
                .unwrap_or("chosen"),
        ),
        AdDocumentType::AdAssetBrief => format!(
            "# Asset Brief\n\n- **Format:** {}\n- **Concept:** {}\n\n## Shot list\n\n## On-screen text\n\n## References\n",
            selection
                .get(AdFilterCategory::Style)
                .map(|f| f.name.as_str())
                .unwrap_or("tbd"),
            selection
                .get(AdFilterCategory::Concept)
                .map(|f| f.name.as_str())
                .unwrap_or("tbd"),
        ),
        AdDocumentType::AdNotes => "# Notes\n\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad_creation::AdFilter;
    use crate::utils::time_utils::now_utc;

    #[test]
    fn details_lists_filters_and_desires() {
        let now = now_utc();
        let ad = CreatedAd {
            id: "ad-1".to_string(),
            organization_id: "org-a".to_string(),
            user_id: "user-1".to_string(),
            name: "Demo · Save Time · UGC · Question".to_string(),
            concept_id: "c".to_string(),
            angle_id: "a".to_string(),
            style_id: "s".to_string(),
            hook_id: "h".to_string(),
            selected_desires: vec!["More free evenings".to_string()],
            selected_beliefs: vec![],
            pipeline_stage: "concept".to_string(),
            created_at: now,
            updated_at: now,
        };
        let mut selection = FilterSelection::default();
        selection.set(AdFilter {
            id: "c".to_string(),
            category: AdFilterCategory::Concept,
            organization_id: None,
            name: "Demo".to_string(),
            description: Some("Show it".to_string()),
            sort_order: 0,
            created_at: now,
        });

        let details = render_document(AdDocumentType::AdDetails, &ad, &selection);
        assert!(details.starts_with("# Demo · Save Time · UGC · Question"));
        assert!(details.contains("- **Concept:** Demo (Show it)"));
        assert!(details.contains("- **Hook:** _not available_"));
        assert!(details.contains("- More free evenings"));
        assert!(details.contains("_None selected_"));
    }
}
