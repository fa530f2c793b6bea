//! Metadata resolver: one lookup per identifier, failures absorbed.
//!
//! # Invariants
//! - `fetch_by_identifier` never returns an error or panics on bad input.
//! - An abandoned `PendingLookup` has no side effects.

use super::extract::extract_metadata;
use super::transport::LookupTransport;
use super::BookMetadata;
use log::{debug, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Resolves book metadata through a `LookupTransport`.
#[derive(Clone)]
pub struct MetadataResolver {
    transport: Arc<dyn LookupTransport>,
    endpoint: String,
}

impl MetadataResolver {
    /// `endpoint` is the search API base, e.g. `https://www.googleapis.com/books/v1`.
    pub fn new(transport: Arc<dyn LookupTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Builds the lookup URL for one identifier.
    pub fn lookup_url(&self, isbn: &str) -> String {
        format!(
            "{}/volumes?q=isbn:{}",
            self.endpoint.trim_end_matches('/'),
            isbn.trim()
        )
    }

    /// Looks up one identifier and extracts whatever fields are present.
    ///
    /// Returns an empty result for blank identifiers, transport failures,
    /// non-success statuses and bodies without results.
    pub fn fetch_by_identifier(&self, isbn: &str) -> BookMetadata {
        if isbn.trim().is_empty() {
            return BookMetadata::default();
        }

        let started_at = Instant::now();
        let response = match self.transport.get(&self.lookup_url(isbn)) {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    "event=metadata_fetch module=metadata status=error duration_ms={} error_code=transport_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return BookMetadata::default();
            }
        };

        if !response.is_success() {
            warn!(
                "event=metadata_fetch module=metadata status=error duration_ms={} error_code=http_status http_status={}",
                started_at.elapsed().as_millis(),
                response.status
            );
            return BookMetadata::default();
        }

        let metadata = extract_metadata(&response.body);
        debug!(
            "event=metadata_fetch module=metadata status=ok duration_ms={} fields={}",
            started_at.elapsed().as_millis(),
            metadata.field_count()
        );
        metadata
    }

    /// Runs the lookup on a worker thread.
    ///
    /// The calling thread stays free; collect the result with
    /// [`PendingLookup::wait`] or [`PendingLookup::try_take`].
    pub fn spawn_fetch(&self, isbn: impl Into<String>) -> PendingLookup {
        let (sender, receiver) = mpsc::channel();
        let resolver = self.clone();
        let isbn = isbn.into();
        thread::spawn(move || {
            // Receiver may already be gone if the caller gave up.
            let _ = sender.send(resolver.fetch_by_identifier(&isbn));
        });
        PendingLookup { receiver }
    }
}

/// Handle to an in-flight lookup started by [`MetadataResolver::spawn_fetch`].
pub struct PendingLookup {
    receiver: Receiver<BookMetadata>,
}

impl PendingLookup {
    /// Blocks up to `timeout`; an expired deadline yields an empty result
    /// and abandons the lookup.
    pub fn wait(self, timeout: Duration) -> BookMetadata {
        match self.receiver.recv_timeout(timeout) {
            Ok(metadata) => metadata,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "event=metadata_fetch module=metadata status=cancelled timeout_ms={}",
                    timeout.as_millis()
                );
                BookMetadata::default()
            }
            Err(RecvTimeoutError::Disconnected) => BookMetadata::default(),
        }
    }

    /// Returns the result if the lookup already finished, `None` while it is
    /// still running.
    pub fn try_take(&self) -> Option<BookMetadata> {
        match self.receiver.try_recv() {
            Ok(metadata) => Some(metadata),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(BookMetadata::default()),
        }
    }
}
