//! Glue for the controller loop that drives the reconciler.

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use cdeventer_types::{CDEVENT_API_VERSION, CDEVENT_KIND, Run};

use crate::error::Result;
use crate::reconciler::Reconciler;

/// Name the controller registers under.
pub const CONTROLLER_NAME: &str = "cdeventer-controller";

/// Predicate selecting Runs whose reference matches `api_version`/`kind`.
pub fn filter_run_ref<'a>(
    api_version: &'a str,
    kind: &'a str,
) -> impl Fn(&Run) -> bool + Clone + 'a {
    move |run| {
        run.spec
            .run_ref
            .as_ref()
            .is_some_and(|r| r.matches(api_version, kind))
    }
}

/// Whether a Run references the CDEvent custom task.
pub fn is_cdevent_run(run: &Run) -> bool {
    filter_run_ref(CDEVENT_API_VERSION, CDEVENT_KIND)(run)
}

/// Reconcile independent Runs concurrently with one shared reconciler.
///
/// Results come back in input order; deliveries may happen in any order.
pub async fn reconcile_all(
    reconciler: &Reconciler,
    runs: Vec<Run>,
    cancel: &CancellationToken,
) -> Vec<(Run, Result<()>)> {
    join_all(runs.into_iter().map(|mut run| async move {
        let result = reconciler.reconcile_with_cancel(&mut run, cancel).await;
        (run, result)
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdeventer_types::RunRef;

    #[test]
    fn test_is_cdevent_run() {
        let run = Run::new("default", "r");
        assert!(is_cdevent_run(&run));

        let mut other = run.clone();
        other.spec.run_ref = Some(RunRef {
            api_version: "example.dev/v1".to_string(),
            kind: "Wait".to_string(),
            name: String::new(),
        });
        assert!(!is_cdevent_run(&other));

        let mut unreferenced = run;
        unreferenced.spec.run_ref = None;
        assert!(!is_cdevent_run(&unreferenced));
    }

    #[test]
    fn test_filter_run_ref_custom_pair() {
        let filter = filter_run_ref("example.dev/v1", "Wait");
        let mut run = Run::new("default", "r");
        assert!(!filter(&run));
        run.spec.run_ref = Some(RunRef {
            api_version: "example.dev/v1".to_string(),
            kind: "Wait".to_string(),
            name: "named".to_string(),
        });
        assert!(filter(&run));
    }
}
