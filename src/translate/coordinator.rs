//! Identity-keyed translation request tracking.
//!
//! Each finalized utterance gets a request tagged with its entry id and a
//! monotonically increasing request id. Results are only applied when both
//! still match, so reordered responses and superseded requests can never
//! corrupt another entry. This replaces positional "last message wins"
//! designs, which silently misfile results when responses reorder.

use crate::error::Result;
use crate::translate::translator::Translator;
use crate::transcript::entry::EntryId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Resolved translation routed back into the serialized event loop.
#[derive(Debug)]
pub struct TranslationOutcome {
    pub entry_id: EntryId,
    pub request_id: u64,
    pub result: Result<String>,
}

/// Issues translation requests and validates their results.
///
/// At most one outstanding request per entry: issuing a new request for an
/// entry supersedes the previous one, whose eventual result is discarded.
pub struct TranslationCoordinator {
    translator: Arc<dyn Translator>,
    outcomes: mpsc::Sender<TranslationOutcome>,
    source_language: String,
    target_language: String,
    next_request_id: u64,
    in_flight: HashMap<EntryId, u64>,
}

impl TranslationCoordinator {
    pub fn new(
        translator: Arc<dyn Translator>,
        outcomes: mpsc::Sender<TranslationOutcome>,
        source_language: String,
        target_language: String,
    ) -> Self {
        Self {
            translator,
            outcomes,
            source_language,
            target_language,
            next_request_id: 1,
            in_flight: HashMap::new(),
        }
    }

    /// Issues an asynchronous translation request for `entry_id`.
    ///
    /// Empty text short-circuits with an empty translation and no
    /// translator call. The outcome always arrives through the outcome
    /// channel, never inline, so callers observe one serialized order.
    pub fn request(&mut self, entry_id: EntryId, text: String) {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        // Last request for a given entry wins.
        self.in_flight.insert(entry_id, request_id);

        let outcomes = self.outcomes.clone();
        if text.trim().is_empty() {
            tokio::spawn(async move {
                let _ = outcomes
                    .send(TranslationOutcome {
                        entry_id,
                        request_id,
                        result: Ok(String::new()),
                    })
                    .await;
            });
            return;
        }

        let translator = self.translator.clone();
        let source_language = self.source_language.clone();
        let target_language = self.target_language.clone();
        tokio::spawn(async move {
            let result = translator
                .translate(&text, &source_language, &target_language)
                .await;
            let _ = outcomes
                .send(TranslationOutcome {
                    entry_id,
                    request_id,
                    result,
                })
                .await;
        });
    }

    /// Checks an outcome against the in-flight table and retires the
    /// request if it is still current. Returns false for stale or
    /// superseded results, which must be dropped.
    pub fn accept(&mut self, entry_id: EntryId, request_id: u64) -> bool {
        match self.in_flight.get(&entry_id) {
            Some(&current) if current == request_id => {
                self.in_flight.remove(&entry_id);
                true
            }
            _ => false,
        }
    }

    /// Number of requests still awaiting a result.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::translator::MockTranslator;

    fn coordinator(
        translator: MockTranslator,
    ) -> (TranslationCoordinator, mpsc::Receiver<TranslationOutcome>) {
        let (tx, rx) = mpsc::channel(16);
        (
            TranslationCoordinator::new(
                Arc::new(translator),
                tx,
                "English".to_string(),
                "Chinese".to_string(),
            ),
            rx,
        )
    }

    #[tokio::test]
    async fn test_request_resolves_through_channel() {
        let (mut coordinator, mut outcomes) = coordinator(MockTranslator::echo("zh"));

        coordinator.request(EntryId(1), "hello".to_string());
        assert_eq!(coordinator.in_flight(), 1);

        let outcome = outcomes.recv().await.unwrap();
        assert_eq!(outcome.entry_id, EntryId(1));
        assert_eq!(outcome.result.unwrap(), "hello [zh]");
        assert!(coordinator.accept(outcome.entry_id, outcome.request_id));
        assert_eq!(coordinator.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_short_circuits() {
        // Manual mock would park forever if the coordinator called it.
        let (translator, _pending) = MockTranslator::manual();
        let (mut coordinator, mut outcomes) = coordinator(translator);

        coordinator.request(EntryId(1), "   ".to_string());
        let outcome = outcomes.recv().await.unwrap();
        assert_eq!(outcome.result.unwrap(), "");
    }

    #[tokio::test]
    async fn test_out_of_order_results_keep_identity() {
        let (translator, mut pending) = MockTranslator::manual();
        let (mut coordinator, mut outcomes) = coordinator(translator);

        coordinator.request(EntryId(1), "first".to_string());
        coordinator.request(EntryId(2), "second".to_string());

        let req_a = pending.next().await.unwrap();
        let req_b = pending.next().await.unwrap();
        assert_eq!(req_a.text, "first");
        assert_eq!(req_b.text, "second");

        // Second finishes before first.
        req_b.resolve(Ok("第二".to_string()));
        req_a.resolve(Ok("第一".to_string()));

        let first_outcome = outcomes.recv().await.unwrap();
        let second_outcome = outcomes.recv().await.unwrap();

        assert_eq!(first_outcome.entry_id, EntryId(2));
        assert_eq!(first_outcome.result.unwrap(), "第二");
        assert_eq!(second_outcome.entry_id, EntryId(1));
        assert_eq!(second_outcome.result.unwrap(), "第一");

        assert!(coordinator.accept(EntryId(2), 2));
        assert!(coordinator.accept(EntryId(1), 1));
    }

    #[tokio::test]
    async fn test_superseded_request_is_rejected() {
        let (translator, mut pending) = MockTranslator::manual();
        let (mut coordinator, _outcomes) = coordinator(translator);

        coordinator.request(EntryId(1), "v1".to_string());
        coordinator.request(EntryId(1), "v2".to_string());
        assert_eq!(coordinator.in_flight(), 1);

        let _req1 = pending.next().await.unwrap();
        let _req2 = pending.next().await.unwrap();

        // The first request was superseded; only the second may apply.
        assert!(!coordinator.accept(EntryId(1), 1));
        assert!(coordinator.accept(EntryId(1), 2));
        assert!(!coordinator.accept(EntryId(1), 2));
    }

    #[tokio::test]
    async fn test_unknown_entry_is_rejected() {
        let (mut coordinator, _outcomes) = coordinator(MockTranslator::echo("x"));
        assert!(!coordinator.accept(EntryId(42), 1));
    }
}
