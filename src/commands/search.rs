/// Tag search: validate, authenticate, query every page, present.
use std::io::Write;

use crate::cli::output::{write_progress, write_report};
use crate::cli::{Cli, OutputCtx};
use crate::graph::{GraphQuery, ResourceGraphClient, Scope, Session};
use crate::tags::{BatchProgress, Pager, SearchError, SearchRequest, build_query};
use crate::types::ResultRecord;

/// Run `tagquery`.
///
/// # Errors
///
/// Returns a usage `SearchError` before any network call if the arguments
/// are invalid, or `SearchError::QueryExecution` if Resource Graph fails.
pub fn run(cli: &Cli, ctx: &OutputCtx) -> Result<(), SearchError> {
    let request = SearchRequest::validate(&cli.search_input())?;

    let session = Session::establish(cli.subscription.as_deref(), request.tenant_scope())?;
    let client = ResourceGraphClient::new(session)?;
    let scope = client.scope(request.tenant_scope())?;

    let stdout = std::io::stdout();
    execute(&client, &scope, &request, ctx, &mut stdout.lock())
}

/// Fetch every matching record from `service` and write the report to `out`.
///
/// # Errors
///
/// Returns `SearchError::QueryExecution` if any page fails, in which case
/// nothing is written, or `SearchError::Output` if writing fails.
pub fn execute<W: Write>(
    service: &dyn GraphQuery,
    scope: &Scope,
    request: &SearchRequest,
    ctx: &OutputCtx,
    out: &mut W,
) -> Result<(), SearchError> {
    let show_progress = ctx.shows_progress();
    let records = search(service, scope, request, Pager::default(), |p| {
        if show_progress {
            write_progress(p);
        }
    })?;
    write_report(out, &records, request, ctx)?;
    Ok(())
}

/// Build the query for `request` and fetch all of its pages from `service`.
///
/// # Errors
///
/// Returns `SearchError::QueryExecution` on the first failed page; no
/// partial results are returned.
pub fn search<F>(
    service: &dyn GraphQuery,
    scope: &Scope,
    request: &SearchRequest,
    pager: Pager,
    on_batch: F,
) -> Result<Vec<ResultRecord>, SearchError>
where
    F: FnMut(BatchProgress),
{
    let query = build_query(request);
    tracing::debug!(%query, ?scope, "running Resource Graph query");

    pager
        .fetch_all(service, &query, scope, on_batch)
        .map_err(|e| {
            tracing::error!(error = %e, "Resource Graph query failed");
            SearchError::from(e)
        })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::cli::args::OutputFormat;
    use crate::graph::{GraphError, Page};
    use crate::tags::SearchInput;

    struct OnePage {
        records: Vec<ResultRecord>,
        calls: Cell<usize>,
        fail: bool,
    }

    impl GraphQuery for OnePage {
        fn execute(
            &self,
            query: &str,
            page: Page,
            scope: &Scope,
        ) -> Result<Vec<ResultRecord>, GraphError> {
            self.calls.set(self.calls.get() + 1);
            assert!(query.contains("'Environment'"));
            assert_eq!(page.skip, 0);
            assert_eq!(*scope, Scope::Tenant);
            if self.fail {
                return Err(GraphError::Status {
                    status: 403,
                    message: "AuthorizationFailed".to_owned(),
                });
            }
            Ok(self.records.clone())
        }
    }

    fn record(name: &str, value: &str) -> ResultRecord {
        ResultRecord {
            name: name.to_owned(),
            resource_type: "microsoft.network/virtualnetworks".to_owned(),
            resource_group: "rg-net".to_owned(),
            location: "uksouth".to_owned(),
            subscription_id: "sub".to_owned(),
            tag_key: "Environment".to_owned(),
            tag_value: value.to_owned(),
            id: format!("/r/{name}"),
        }
    }

    fn environment_request() -> SearchRequest {
        SearchRequest::validate(&SearchInput {
            tag_name: Some("Environment"),
            by_name: true,
            tenant_scope: true,
            ..SearchInput::default()
        })
        .unwrap()
    }

    fn serve(records: Vec<ResultRecord>) -> OnePage {
        OnePage {
            records,
            calls: Cell::new(0),
            fail: false,
        }
    }

    fn report(service: &OnePage, fmt: OutputFormat) -> Result<String, SearchError> {
        let ctx = OutputCtx::new(fmt, false, false);
        let mut buf = Vec::new();
        execute(service, &Scope::Tenant, &environment_request(), &ctx, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn name_search_end_to_end() {
        let service = serve(vec![
            record("vnet-dev", "dev"),
            record("vnet-prod", "prod"),
            record("vnet-test", "test"),
        ]);

        let text = report(&service, OutputFormat::Table).unwrap();
        assert_eq!(service.calls.get(), 1);

        assert!(text.contains("RESOURCES WITH TAG NAME: Environment"));
        assert!(text.contains("Found 3 resources"));
        assert_eq!(text.lines().filter(|l| l.contains("rg-net")).count(), 3);
        assert!(text.contains("Total: 3 resources"));
    }

    #[test]
    fn empty_search_succeeds_with_warning() {
        let service = serve(Vec::new());
        let text = report(&service, OutputFormat::Table).unwrap();
        assert!(text.contains("WARNING: No resources found with tag name 'Environment'"));
        assert!(!text.contains("Total:"));
    }

    #[test]
    fn empty_json_search_succeeds_with_empty_array() {
        let service = serve(Vec::new());
        let text = report(&service, OutputFormat::Json).unwrap();
        assert_eq!(text.trim(), "[]");
    }

    #[test]
    fn json_search_writes_every_record() {
        let service = serve(vec![record("vnet-a", "a"), record("vnet-b", "b")]);
        let text = report(&service, OutputFormat::Ndjson).unwrap();
        let names: Vec<String> = text
            .lines()
            .map(|l| serde_json::from_str::<ResultRecord>(l).unwrap().name)
            .collect();
        assert_eq!(names, ["vnet-a", "vnet-b"]);
    }

    #[test]
    fn service_failure_writes_nothing() {
        let service = OnePage {
            records: vec![record("vnet-a", "a")],
            calls: Cell::new(0),
            fail: true,
        };
        let ctx = OutputCtx::new(OutputFormat::Table, false, false);
        let mut buf = Vec::new();
        let err = execute(&service, &Scope::Tenant, &environment_request(), &ctx, &mut buf)
            .unwrap_err();
        assert!(matches!(err, SearchError::QueryExecution(_)));
        assert!(!err.is_usage());
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("AuthorizationFailed"));
        assert!(buf.is_empty());
    }

    #[test]
    fn progress_reported_once_per_page() {
        let service = serve(vec![record("vnet-a", "a")]);
        let mut pages = Vec::new();
        let records = search(
            &service,
            &Scope::Tenant,
            &environment_request(),
            Pager::default(),
            |p| pages.push(p),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            pages,
            [BatchProgress {
                batch: 1,
                total: 1
            }]
        );
    }

    #[test]
    fn invalid_arguments_fail_before_authentication() {
        use clap::Parser;
        let cli = Cli::try_parse_from(["tagquery", "--search-by-value"]).unwrap();
        let ctx = OutputCtx::new(OutputFormat::Table, false, false);
        let err = run(&cli, &ctx).unwrap_err();
        assert!(matches!(err, SearchError::MissingValueForValueMode));
    }
}
