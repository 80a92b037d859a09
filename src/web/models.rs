use serde::Deserialize;

use crate::app::ProjectionView;
use crate::constants::{POSITION_FACET, TEAM_FACET};
use crate::filter::{is_all, matches_selection, FilterSpec};

/// Query string of the projections page.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ProjectionQuery {
    pub filter_position: Option<String>,
    pub filter_team: Option<String>,
    /// Older single-select form; applies to position when `filter_position` is absent
    pub filter: Option<String>,
}

impl ProjectionQuery {
    pub fn to_filter_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::new();
        if let Some(position) = self.filter_position.as_deref().or(self.filter.as_deref()) {
            spec.select(POSITION_FACET, position);
        }
        if let Some(team) = self.filter_team.as_deref() {
            spec.select(TEAM_FACET, team);
        }
        spec
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LoginQuery {
    pub next: Option<String>,
    pub registered: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct FacetOption {
    pub value: String,
    pub selected: bool,
}

/// One filter select box.
#[derive(Debug, Clone)]
pub struct FacetSelect {
    pub label: String,
    pub param: String,
    pub all_selected: bool,
    pub options: Vec<FacetOption>,
}

pub fn facet_selects(view: &ProjectionView) -> Vec<FacetSelect> {
    view.facets
        .iter()
        .map(|facet| {
            let selection = view.filter.selection(&facet.column);
            let all_selected = is_all(selection);
            let chosen = (!all_selected)
                .then(|| facet.values.iter().position(|v| matches_selection(v, selection)))
                .flatten();
            FacetSelect {
                label: title_case(&facet.column),
                param: format!("filter_{}", facet.column),
                all_selected,
                options: facet
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, value)| FacetOption {
                        selected: chosen == Some(i),
                        value: value.clone(),
                    })
                    .collect(),
            }
        })
        .collect()
}

pub fn display_rows(view: &ProjectionView) -> Vec<Vec<String>> {
    view.rows
        .iter()
        .map(|row| row.cells().iter().map(|c| c.to_string()).collect())
        .collect()
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::extract_facets;
    use crate::table::DataTable;

    fn view_with(csv: &str, filter: FilterSpec) -> ProjectionView {
        let table = DataTable::from_reader(csv.as_bytes()).unwrap();
        ProjectionView {
            columns: table.columns().to_vec(),
            rows: table.rows().to_vec(),
            facets: extract_facets(&table),
            filter,
            last_updated: "2024-09-01 12:00:00".to_string(),
            total_rows: table.len(),
        }
    }

    fn selected(select: &FacetSelect) -> Vec<&str> {
        select
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect()
    }

    #[test]
    fn only_first_matching_option_is_selected() {
        let csv = "player,position,team\nA,QB,KC\nB,qb,KC\nC,Défense,BUF\n";
        let view = view_with(csv, FilterSpec::new().with(POSITION_FACET, "qb"));
        let selects = facet_selects(&view);

        assert!(!selects[0].all_selected);
        assert_eq!(selected(&selects[0]), ["QB"]);
        assert!(selects[1].all_selected);
        assert!(selected(&selects[1]).is_empty());

        let view = view_with(csv, FilterSpec::new().with(POSITION_FACET, "DÉFENSE"));
        assert_eq!(selected(&facet_selects(&view)[0]), ["Défense"]);
    }

    #[test]
    fn rows_display_cells_as_written() {
        let view = view_with("player,team,points\nDiggs,01,14.0\n", FilterSpec::new());
        assert_eq!(display_rows(&view), [["Diggs", "01", "14.0"]]);
    }

    #[test]
    fn explicit_position_beats_generic_filter() {
        let query = ProjectionQuery {
            filter_position: Some("WR".to_string()),
            filter_team: None,
            filter: Some("QB".to_string()),
        };
        assert_eq!(query.to_filter_spec().selection(POSITION_FACET), "WR");
    }

    #[test]
    fn generic_filter_selects_position() {
        let query = ProjectionQuery {
            filter: Some("rb".to_string()),
            ..Default::default()
        };
        let spec = query.to_filter_spec();
        assert_eq!(spec.selection(POSITION_FACET), "rb");
        assert_eq!(spec.selection(TEAM_FACET), "all");
    }

    #[test]
    fn title_cases_labels() {
        assert_eq!(title_case("position"), "Position");
        assert_eq!(title_case(""), "");
    }
}
