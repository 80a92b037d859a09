/// Columns whose distinct values populate the filter select boxes, in display order
pub const FACET_COLUMNS: [&str; 2] = [POSITION_FACET, TEAM_FACET];

pub const POSITION_FACET: &str = "position";
pub const TEAM_FACET: &str = "team";

/// Selection value meaning "do not filter on this facet" (compared case-insensitively)
pub const ALL_SENTINEL: &str = "all";

// Export
pub const DOWNLOAD_FILENAME: &str = "data.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Pattern used to render the data file's modification time
pub const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Blog files must start with a date in this form
pub const BLOG_DATE_FORMAT: &str = "%Y-%m-%d";
pub const BLOG_DATE_PREFIX_LEN: usize = 10;
pub const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

// Sessions
pub const SESSION_COOKIE: &str = "session";
pub const LOGIN_PATH: &str = "/login";
