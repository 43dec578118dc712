use std::fmt::Display;
use std::future::Future;

/// One fan-out branch outcome. A failed branch keeps its zero value and the
/// captured error, so each caller decides per-field whether a hole degrades
/// the response or fails it.
#[derive(Debug)]
pub struct Fetched<T, E> {
    pub value: T,
    pub error: Option<E>,
}

impl<T: Default, E: Display> Fetched<T, E> {
    pub fn from_result(branch: &'static str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self { value, error: None },
            Err(error) => {
                tracing::warn!("list {} branch failed: {}", branch, error);
                Self { value: T::default(), error: Some(error) }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Joined result of a page fetch plus its count branches
#[derive(Debug)]
pub struct ListOutcome<R, E> {
    pub rows: Fetched<Vec<R>, E>,
    pub total: Fetched<i64, E>,
    pub filtered: Fetched<i64, E>,
}

impl<R, E> ListOutcome<R, E> {
    /// Fail only when nothing at all could be fetched; count holes degrade
    /// to zero instead
    pub fn require_rows(self) -> Result<Self, E> {
        match self.rows.error {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }
}

/// Run the page fetch and count queries concurrently and join them. All
/// branches run to completion; an error in one never cancels another. When
/// the query carries no filters the filtered count equals the total and no
/// separate branch is issued.
pub async fn fan_out<R, E, FR, FT, FF>(
    rows: FR,
    total: FT,
    filtered: Option<FF>,
) -> ListOutcome<R, E>
where
    E: Display,
    FR: Future<Output = Result<Vec<R>, E>>,
    FT: Future<Output = Result<i64, E>>,
    FF: Future<Output = Result<i64, E>>,
{
    let (rows_result, total_result, filtered_result) = match filtered {
        Some(filtered) => {
            let (r, t, f) = tokio::join!(rows, total, filtered);
            (r, t, Some(f))
        }
        None => {
            let (r, t) = tokio::join!(rows, total);
            (r, t, None)
        }
    };

    let rows = Fetched::from_result("fetch", rows_result);
    let total = Fetched::from_result("count", total_result);
    let filtered = match filtered_result {
        Some(result) => Fetched::from_result("filtered count", result),
        None => Fetched { value: total.value, error: None },
    };

    ListOutcome { rows, total, filtered }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_count_leaves_rows_intact() {
        let outcome = fan_out::<i32, String, _, _, _>(
            async { Ok(vec![1, 2, 3]) },
            async { Err("count exploded".to_string()) },
            Some(async { Ok(3) }),
        )
        .await;

        assert_eq!(outcome.rows.value, vec![1, 2, 3]);
        assert_eq!(outcome.total.value, 0);
        assert!(outcome.total.error.is_some());
        assert_eq!(outcome.filtered.value, 3);
        assert!(outcome.require_rows().is_ok());
    }

    #[tokio::test]
    async fn missing_filtered_branch_mirrors_total() {
        let outcome = fan_out::<i32, String, _, _, std::future::Ready<Result<i64, String>>>(
            async { Ok(vec![7]) },
            async { Ok(42) },
            None,
        )
        .await;

        assert_eq!(outcome.total.value, 42);
        assert_eq!(outcome.filtered.value, 42);
        assert!(outcome.filtered.is_ok());
    }

    #[tokio::test]
    async fn failed_fetch_is_surfaced_by_require_rows() {
        let outcome = fan_out::<i32, String, _, _, std::future::Ready<Result<i64, String>>>(
            async { Err("fetch failed".to_string()) },
            async { Ok(10) },
            None,
        )
        .await;

        assert_eq!(outcome.total.value, 10);
        assert!(outcome.require_rows().is_err());
    }
}
