//! Submission pipeline: validate, send with retry, normalize.

use log::debug;
use serde_json::Value;
use tokio::time::Instant;

use crate::api::AssessmentApi;
use crate::assessment::AssessmentRequest;
use crate::http::{ApiError, RetryPolicy, SubmissionState, with_retry_observed};
use crate::normalize::{Normalizer, RawPayload, now_ms};
use crate::report::AssessmentReport;

/// Runs assessment submissions against an [`AssessmentApi`].
///
/// One submission at a time is expected per caller; the assessor itself
/// holds no mutable state.
pub struct Assessor<A: AssessmentApi> {
    api: A,
    normalizer: Normalizer,
    retry: RetryPolicy,
}

impl<A: AssessmentApi> Assessor<A> {
    pub fn new(api: A, normalizer: Normalizer, retry: RetryPolicy) -> Self {
        Self {
            api,
            normalizer,
            retry,
        }
    }

    pub async fn submit(&self, request: &AssessmentRequest) -> Result<AssessmentReport, ApiError> {
        self.submit_observed(request, |_| {}).await
    }

    /// Validates and submits `request`, retrying transient failures.
    ///
    /// Validation errors are returned before anything is sent. When the
    /// backend does not report a processing time, the measured round trip
    /// (including retries) is used instead.
    #[tracing::instrument(skip(self, request, observer), fields(material = %request.material, process = %request.process))]
    pub async fn submit_observed<O>(
        &self,
        request: &AssessmentRequest,
        observer: O,
    ) -> Result<AssessmentReport, ApiError>
    where
        O: FnMut(SubmissionState),
    {
        request.validate()?;

        let started = Instant::now();
        let raw: Value = with_retry_observed(
            "Submitting assessment",
            &self.retry,
            || self.api.assess(request),
            observer,
        )
        .await?;
        let elapsed = started.elapsed();

        let payload = RawPayload::from(&raw);
        let upstream_timing = payload.processing_time_ms().is_some();
        let mut report = self.normalizer.normalize_payload(payload, now_ms());

        if !upstream_timing {
            report.processing_time = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        }

        debug!(
            "Assessment {} finished with {} stages in {}ms",
            report.request_id,
            report.stages.len(),
            report.processing_time
        );
        Ok(report)
    }
}
