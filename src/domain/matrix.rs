use std::fmt;

use crate::domain::{DocumentIndex, Kind, entity::Screen};

/// One line of the traceability matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Screen identifier.
    pub screen: String,
    /// Component identifier, or `None` for a screen that lists none.
    pub component: Option<String>,
    /// Requirements listed on the screen.
    pub requirements: Vec<String>,
    /// Rules listed on the screen.
    pub rules: Vec<String>,
    /// Flows listed on the screen.
    pub flows: Vec<String>,
    /// Design link for the screen.
    pub figma_url: Option<String>,
}

/// Screens joined to their components, requirements, rules and flows.
///
/// One row per (screen, component) pair, ordered by screen identifier and
/// then by the order components are listed. Renders as a Markdown table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceMatrix {
    rows: Vec<Row>,
}

impl TraceMatrix {
    /// Projects the screens of an index into matrix rows.
    #[must_use]
    pub fn build(index: &DocumentIndex) -> Self {
        let rows = index
            .entities(Kind::Screen)
            .map(Screen::new)
            .flat_map(|screen| {
                let row = Row {
                    screen: screen.entity().id().to_string(),
                    component: None,
                    requirements: screen.requirements(),
                    rules: screen.rules(),
                    flows: screen.flows(),
                    figma_url: screen.figma_url(),
                };
                let components = screen.components();
                if components.is_empty() {
                    vec![row]
                } else {
                    components
                        .into_iter()
                        .map(|component| Row {
                            component: Some(component),
                            ..row.clone()
                        })
                        .collect()
                }
            })
            .collect();
        Self { rows }
    }

    /// The rows of the matrix.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl fmt::Display for TraceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Traceability matrix (generated)")?;
        writeln!(f)?;
        writeln!(f, "| Screen | Component | Requirements | Rules | Flows | Figma |")?;
        writeln!(f, "|---|---|---|---|---|---|")?;
        for row in &self.rows {
            writeln!(
                f,
                "| `{}` | {} | {} | {} | {} | {} |",
                row.screen,
                row.component.as_deref().map(code).unwrap_or_default(),
                code_list(&row.requirements),
                code_list(&row.rules),
                code_list(&row.flows),
                row.figma_url
                    .as_deref()
                    .map(|url| format!("[link]({url})"))
                    .unwrap_or_default(),
            )?;
        }
        Ok(())
    }
}

fn code(id: &str) -> String {
    format!("`{id}`")
}

fn code_list(ids: &[String]) -> String {
    ids.iter().map(|id| code(id)).collect::<Vec<_>>().join(" ")
}
