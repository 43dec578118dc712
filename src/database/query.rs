use crate::database::manager::StoreError;
use crate::listing::{ColumnSet, ListQuery};

/// Parameterized page/count SQL for one table request. `filtered_sql` is only
/// present when the query actually filters; otherwise the filtered count
/// equals the total and no second count is issued.
#[derive(Debug, Clone)]
pub struct ListStatement {
    pub page_sql: String,
    pub total_sql: String,
    pub filtered_sql: Option<String>,
    pub params: Vec<String>,
}

/// Translate a ListQuery plus the endpoint's column table into SQL. Named
/// terms match their column exactly; the free-text search matches any
/// searchable column case-insensitively.
pub fn build_list_statement(
    table: &str,
    select: &str,
    query: &ListQuery,
    columns: &ColumnSet,
) -> Result<ListStatement, StoreError> {
    validate_identifier(table)?;

    let mut params: Vec<String> = Vec::new();
    let mut conditions: Vec<String> = Vec::new();

    for (column, value) in &query.named {
        validate_identifier(column)?;
        params.push(value.clone());
        conditions.push(format!("\"{}\"::text = ${}", column, params.len()));
    }

    if !query.search.is_empty() {
        let searchable: Vec<&str> = columns.searchable().map(|c| c.name).collect();
        if !searchable.is_empty() {
            params.push(format!("%{}%", query.search));
            let n = params.len();
            let ors: Vec<String> = searchable
                .iter()
                .map(|c| format!("\"{}\"::text ILIKE ${}", c, n))
                .collect();
            conditions.push(format!("({})", ors.join(" OR ")));
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    validate_identifier(query.sort_key)?;
    let page_sql = format!(
        "SELECT {} FROM \"{}\"{} ORDER BY \"{}\" {} LIMIT {} OFFSET {}",
        select,
        table,
        where_clause,
        query.sort_key,
        query.sort_direction.to_sql(),
        query.limit,
        query.offset,
    );

    let total_sql = format!("SELECT COUNT(*) FROM \"{}\"", table);

    let filtered_sql = if where_clause.is_empty() {
        None
    } else {
        Some(format!("SELECT COUNT(*) FROM \"{}\"{}", table, where_clause))
    };

    Ok(ListStatement { page_sql, total_sql, filtered_sql, params })
}

fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::QueryError(format!("invalid identifier: {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{Column, ColumnSet, ListQuery, SortDirection};
    use std::collections::HashMap;

    const COLUMNS: ColumnSet = ColumnSet::new(
        &[
            Column { name: "name", sort_key: "name", searchable: true },
            Column { name: "players", sort_key: "players_peak_week", searchable: false },
        ],
        "players_peak_week",
    );

    fn query() -> ListQuery {
        ListQuery {
            draw: "1".into(),
            offset: 20,
            limit: 10,
            sort_key: "name",
            sort_direction: SortDirection::Desc,
            search: String::new(),
            named: HashMap::new(),
        }
    }

    #[test]
    fn unfiltered_query_skips_the_second_count() {
        let stmt = build_list_statement("games", "*", &query(), &COLUMNS).unwrap();
        assert_eq!(
            stmt.page_sql,
            "SELECT * FROM \"games\" ORDER BY \"name\" DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(stmt.total_sql, "SELECT COUNT(*) FROM \"games\"");
        assert!(stmt.filtered_sql.is_none());
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn free_text_search_targets_searchable_columns() {
        let mut q = query();
        q.search = "portal".into();
        let stmt = build_list_statement("games", "*", &q, &COLUMNS).unwrap();
        assert!(stmt.page_sql.contains("\"name\"::text ILIKE $1"));
        assert!(!stmt.page_sql.contains("players_peak_week\"::text ILIKE"));
        assert_eq!(stmt.params, vec!["%portal%".to_string()]);
        assert!(stmt.filtered_sql.is_some());
    }

    #[test]
    fn named_terms_become_equality_conditions() {
        let mut q = query();
        q.named.insert("players".into(), "100".into());
        let stmt = build_list_statement("games", "*", &q, &COLUMNS).unwrap();
        assert!(stmt.page_sql.contains("\"players\"::text = $1"));
        assert_eq!(stmt.params, vec!["100".to_string()]);
    }

    #[test]
    fn bad_identifiers_are_rejected() {
        assert!(build_list_statement("games; drop", "*", &query(), &COLUMNS).is_err());
    }
}
