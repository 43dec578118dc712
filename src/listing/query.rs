use std::collections::HashMap;

pub const DEFAULT_LIMIT: i64 = 100;

/// One table column as the client widget sees it: `name` is the wire/database
/// column, `sort_key` the expression to sort on (often the same), and
/// `searchable` marks columns matched by the free-text search.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub sort_key: &'static str,
    pub searchable: bool,
}

/// Ordered column descriptors for one table endpoint. The client sends a sort
/// column *index*; resolving it here keeps the client column order and the
/// server mapping from drifting apart.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSet {
    columns: &'static [Column],
    default_sort: &'static str,
}

impl ColumnSet {
    pub const fn new(columns: &'static [Column], default_sort: &'static str) -> Self {
        Self { columns, default_sort }
    }

    pub fn columns(&self) -> &'static [Column] {
        self.columns
    }

    pub fn default_sort(&self) -> &'static str {
        self.default_sort
    }

    /// Resolve a client column index to its sort key; unknown or unset
    /// indexes fall back to the default sort.
    pub fn sort_for(&self, index: Option<usize>) -> &'static str {
        match index.and_then(|i| self.columns.get(i)) {
            Some(col) => col.sort_key,
            None => self.default_sort,
        }
    }

    pub fn searchable(&self) -> impl Iterator<Item = &'static Column> {
        self.columns.iter().filter(|c| c.searchable)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Resolve a column by wire name, for callers that sort by field name
    /// rather than index
    pub fn sort_key_by_name(&self, name: &str) -> Option<&'static str> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.sort_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Normalized table request, built once per HTTP request from query-string
/// parameters and discarded after producing a ListResult.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Opaque client token, echoed back untouched
    pub draw: String,
    pub offset: i64,
    pub limit: i64,
    /// Resolved sort key (from the column table, never raw client input)
    pub sort_key: &'static str,
    pub sort_direction: SortDirection,
    pub search: String,
    /// Named search terms (`search[<column>]=<value>`)
    pub named: HashMap<String, String>,
}

impl ListQuery {
    /// Parse a DataTables-style request. Numeric parse failures are treated
    /// as "value absent" and fall back to defaults; malformed input never
    /// produces a request error.
    pub fn from_params(
        params: &HashMap<String, String>,
        columns: &ColumnSet,
        max_limit: i64,
    ) -> Self {
        let draw = params.get("draw").cloned().unwrap_or_default();

        let offset = lenient_i64(params.get("start").or_else(|| params.get("offset")))
            .unwrap_or(0)
            .max(0);

        let limit = match lenient_i64(params.get("length").or_else(|| params.get("limit"))) {
            Some(l) if l > 0 => l.min(max_limit),
            _ => DEFAULT_LIMIT.min(max_limit),
        };

        let sort_index = params
            .get("order[0][column]")
            .and_then(|v| v.trim().parse::<usize>().ok());
        let sort_key = columns.sort_for(sort_index);

        let sort_direction = match params.get("order[0][dir]").map(|s| s.as_str()) {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };

        let search = params
            .get("search[value]")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let mut named = HashMap::new();
        for (k, v) in params {
            if let Some(name) = k.strip_prefix("search[").and_then(|r| r.strip_suffix(']')) {
                if name != "value" && columns.has_column(name) && !v.is_empty() {
                    named.insert(name.to_string(), v.clone());
                }
            }
        }

        Self {
            draw,
            offset,
            limit,
            sort_key,
            sort_direction,
            search,
            named,
        }
    }

    pub fn has_filters(&self) -> bool {
        !self.search.is_empty() || !self.named.is_empty()
    }
}

fn lenient_i64(value: Option<&String>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: ColumnSet = ColumnSet::new(
        &[
            Column { name: "name", sort_key: "name", searchable: true },
            Column { name: "players", sort_key: "players_peak_week", searchable: false },
        ],
        "players_peak_week",
    );

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let q = ListQuery::from_params(
            &params(&[("start", "banana"), ("length", "-3"), ("draw", "7")]),
            &COLUMNS,
            100,
        );
        assert_eq!(q.offset, 0);
        assert_eq!(q.limit, 100);
        assert_eq!(q.draw, "7");
    }

    #[test]
    fn limit_is_clamped_to_handler_max() {
        let q = ListQuery::from_params(&params(&[("length", "5000")]), &COLUMNS, 1000);
        assert_eq!(q.limit, 1000);
    }

    #[test]
    fn negative_offset_is_clamped_to_zero() {
        let q = ListQuery::from_params(&params(&[("start", "-20")]), &COLUMNS, 100);
        assert_eq!(q.offset, 0);
    }

    #[test]
    fn sort_index_resolves_against_column_table() {
        let q = ListQuery::from_params(
            &params(&[("order[0][column]", "0"), ("order[0][dir]", "desc")]),
            &COLUMNS,
            100,
        );
        assert_eq!(q.sort_key, "name");
        assert_eq!(q.sort_direction, SortDirection::Desc);

        let q = ListQuery::from_params(&params(&[("order[0][column]", "9")]), &COLUMNS, 100);
        assert_eq!(q.sort_key, "players_peak_week");
        assert_eq!(q.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn named_terms_only_accept_declared_columns() {
        let q = ListQuery::from_params(
            &params(&[
                ("search[value]", "portal"),
                ("search[name]", "valve"),
                ("search[bogus]", "x"),
            ]),
            &COLUMNS,
            100,
        );
        assert_eq!(q.search, "portal");
        assert_eq!(q.named.get("name").map(String::as_str), Some("valve"));
        assert!(!q.named.contains_key("bogus"));
    }
}
