//! One stream invocation

use super::descriptor::StreamDescriptor;
use super::phase::{PhaseTracker, StreamPhase};
use crate::context::Context;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::{PageRequest, Transport};
use crate::pagination::{NextPage, PaginationState};
use crate::sink::{Message, RecordSink};
use crate::state::{Advance, StateManager};
use crate::types::{CancelToken, Record};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Inputs of one invocation besides the descriptor and context
#[derive(Debug, Clone, Copy)]
pub struct RunOptions<'a> {
    /// Instance origin, e.g. `https://example.atlassian.net`
    pub origin: &'a Url,
    /// Lower bound used when no bookmark exists
    pub start_date: Option<&'a Value>,
    /// Send records to the sink
    pub emit: bool,
    /// Keep records in the outcome (for child fan-out)
    pub collect: bool,
    /// Stop after this many records
    pub max_records: Option<usize>,
    pub cancel: &'a CancelToken,
}

/// What an invocation produced
#[derive(Debug, Default)]
pub struct InvocationOutcome {
    /// Produced records in emission order, when collected
    pub records: Vec<Record>,
    /// Records that passed all checks
    pub produced: usize,
    /// Records dropped for a missing key
    pub dropped: usize,
    pub pages: u32,
}

/// Run a stream for one context until the paginator reports `Done`
pub async fn run_invocation(
    descriptor: &StreamDescriptor,
    context: &Context,
    options: RunOptions<'_>,
    transport: &dyn Transport,
    state: &StateManager,
    sink: &mut dyn RecordSink,
) -> Result<InvocationOutcome> {
    let mut phase = PhaseTracker::new(&descriptor.name, context);
    let result = execute(
        descriptor, context, options, transport, state, sink, &mut phase,
    )
    .await;
    if result.is_err() {
        phase.fail();
    }
    result
}

async fn execute(
    descriptor: &StreamDescriptor,
    context: &Context,
    options: RunOptions<'_>,
    transport: &dyn Transport,
    state: &StateManager,
    sink: &mut dyn RecordSink,
    phase: &mut PhaseTracker<'_>,
) -> Result<InvocationOutcome> {
    let name = descriptor.name.as_str();

    let lower_bound = match descriptor.replication_key {
        Some(_) => state
            .bookmark(name, context)
            .await
            .or_else(|| options.start_date.cloned()),
        None => None,
    };
    let url = descriptor.request_url(options.origin, context)?;
    let paginator = descriptor.pagination.build()?;
    let decoder = JsonDecoder::with_path(&descriptor.records_path);
    let mut pagination = PaginationState::new(name);
    let mut outcome = InvocationOutcome::default();

    loop {
        if options.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        phase.transition(StreamPhase::Fetching)?;
        let mut request = PageRequest::new(&url);
        for (key, value) in descriptor.build_params(&pagination.cursor, lower_bound.as_ref())? {
            request = request.query(key, value);
        }
        debug!(stream = name, context = %context, url = %url, cursor = ?pagination.cursor, "Fetching page");
        let response = transport.fetch(&request).await?;

        phase.transition(StreamPhase::Extracting)?;
        if !response.is_success() {
            descriptor.kind.handle_error_status(&response)?;
            debug!(stream = name, status = response.status, "Treating error status as empty result");
            outcome.pages += 1;
            break;
        }

        let body = response.json()?;
        let raw_records = decoder.decode(&body)?;
        let page_len = raw_records.len();
        let mut limit_reached = false;

        for raw in raw_records {
            let record = match prepare_record(descriptor, raw) {
                Ok(record) => record,
                Err(e) if e.is_record_local() => {
                    warn!(stream = name, context = %context, "Dropping record: {e}");
                    outcome.dropped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(key) = &descriptor.replication_key {
                if let Some(value) = lookup(&record, key) {
                    if state.advance(name, context, key, value).await == Advance::Incomparable {
                        warn!(
                            stream = name,
                            context = %context,
                            "Replication value {value} cannot be compared with the bookmark; not stored"
                        );
                    }
                }
            }

            outcome.produced += 1;
            if options.emit {
                sink.emit(Message::record(name, record.clone())).await?;
            }
            if options.collect {
                outcome.records.push(record);
            }

            if options.max_records.is_some_and(|max| outcome.produced >= max) {
                limit_reached = true;
                break;
            }
        }

        if limit_reached {
            debug!(stream = name, limit = ?options.max_records, "Record limit reached");
            pagination.add_page(page_len);
            break;
        }

        match paginator.process_response(&body, page_len, &mut pagination)? {
            NextPage::Continue(_) => {}
            NextPage::Done => break,
        }
    }

    phase.transition(StreamPhase::Done)?;
    outcome.pages = outcome.pages.max(pagination.pages);
    debug!(
        stream = name,
        context = %context,
        records = outcome.produced,
        pages = outcome.pages,
        "Invocation complete"
    );
    Ok(outcome)
}

/// Post-process a raw record and check its keys
fn prepare_record(descriptor: &StreamDescriptor, raw: Value) -> Result<Record> {
    let Value::Object(record) = raw else {
        return Err(Error::record_shape(
            &descriptor.name,
            format!("expected an object, got {raw}"),
        ));
    };
    let record = descriptor
        .kind
        .post_process(record, &descriptor.field_mapping);

    for key in &descriptor.primary_key {
        if lookup(&record, key).is_none() {
            return Err(Error::record_shape(
                &descriptor.name,
                format!("missing primary key '{key}'"),
            ));
        }
    }
    if let Some(key) = &descriptor.replication_key {
        if lookup(&record, key).is_none() {
            return Err(Error::record_shape(
                &descriptor.name,
                format!("missing replication key '{key}'"),
            ));
        }
    }
    Ok(record)
}

/// Non-null value at a dot path
fn lookup<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    (!current.is_null()).then_some(current)
}
