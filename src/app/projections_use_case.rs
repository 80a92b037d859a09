use std::sync::Arc;
use tracing::{debug, info};

use crate::app::ports::DataSource;
use crate::constants::{DOWNLOAD_FILENAME, LAST_UPDATED_FORMAT};
use crate::error::Result;
use crate::filter::{apply_filter, extract_facets, FacetValues, FilterSpec};
use crate::table::Row;

/// Everything the projections page needs from one load of the data.
#[derive(Debug, Clone)]
pub struct ProjectionView {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub facets: FacetValues,
    pub filter: FilterSpec,
    pub last_updated: String,
    pub total_rows: usize,
}

/// The unfiltered source file, ready to send as an attachment.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
}

/// Use case for viewing and exporting projection data
pub struct ProjectionsUseCase {
    source: Arc<dyn DataSource>,
}

impl ProjectionsUseCase {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    /// Load the table fresh, derive facets from all rows, then filter.
    pub fn view(&self, filter: &FilterSpec) -> Result<ProjectionView> {
        let table = self.source.load_table()?;
        let last_updated = self
            .source
            .last_modified()?
            .format(LAST_UPDATED_FORMAT)
            .to_string();

        let facets = extract_facets(&table);
        let rows: Vec<Row> = apply_filter(&table, filter).into_iter().cloned().collect();
        debug!(
            "Filtered {} of {} rows from {} ({:?})",
            rows.len(),
            table.len(),
            self.source.describe(),
            filter
        );

        Ok(ProjectionView {
            columns: table.columns().to_vec(),
            total_rows: table.len(),
            rows,
            facets,
            filter: filter.clone(),
            last_updated,
        })
    }

    /// Full source bytes. Filters never apply to downloads.
    pub fn export(&self) -> Result<CsvExport> {
        let bytes = self.source.raw_bytes()?;
        info!("Exporting {} bytes from {}", bytes.len(), self.source.describe());
        Ok(CsvExport {
            filename: DOWNLOAD_FILENAME,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{POSITION_FACET, TEAM_FACET};
    use crate::error::SiteError;
    use crate::table::DataTable;
    use chrono::{DateTime, Local, TimeZone};

    const CSV: &str = "player,position,team\nAllen,QB,BUF\nKelce,TE,KC\nMahomes,QB,KC\n";

    struct StaticSource(Option<&'static str>);

    impl DataSource for StaticSource {
        fn load_table(&self) -> Result<DataTable> {
            match self.0 {
                Some(csv) => DataTable::from_reader(csv.as_bytes()),
                None => Err(SiteError::DataUnavailable("gone".to_string())),
            }
        }

        fn raw_bytes(&self) -> Result<Vec<u8>> {
            self.0
                .map(|csv| csv.as_bytes().to_vec())
                .ok_or_else(|| SiteError::DataUnavailable("gone".to_string()))
        }

        fn last_modified(&self) -> Result<DateTime<Local>> {
            Ok(Local.with_ymd_and_hms(2024, 9, 1, 8, 30, 5).unwrap())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    fn use_case(csv: Option<&'static str>) -> ProjectionsUseCase {
        ProjectionsUseCase::new(Arc::new(StaticSource(csv)))
    }

    #[test]
    fn view_filters_rows_but_not_facets() {
        let view = use_case(Some(CSV))
            .view(&FilterSpec::new().with(TEAM_FACET, "kc"))
            .unwrap();

        assert_eq!(view.columns, ["player", "position", "team"]);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.total_rows, 3);
        assert_eq!(view.facets.values(TEAM_FACET), ["BUF", "KC"]);
        assert_eq!(view.facets.values(POSITION_FACET), ["QB", "TE"]);
        assert_eq!(view.last_updated, "2024-09-01 08:30:05");
    }

    #[test]
    fn export_ignores_filters_and_is_byte_exact() {
        let export = use_case(Some(CSV)).export().unwrap();
        assert_eq!(export.filename, "data.csv");
        assert_eq!(export.bytes, CSV.as_bytes());
    }

    #[test]
    fn missing_source_is_unavailable() {
        let uc = use_case(None);
        assert!(matches!(uc.view(&FilterSpec::new()), Err(SiteError::DataUnavailable(_))));
        assert!(matches!(uc.export(), Err(SiteError::DataUnavailable(_))));
    }
}
