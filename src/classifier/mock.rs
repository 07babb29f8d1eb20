// file: src/classifier/mock.rs
// description: deterministic classifier for exercising the pipeline without a network
// reference: canned-response backends for offline testing

use crate::classifier::{ClassificationRequest, Classifier};
use crate::error::ClassifierError;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replays canned outcomes in order, cycling when exhausted.
///
/// `None` entries simulate a failed call, as does an empty reply list.
/// Every request is recorded.
#[derive(Debug)]
pub struct MockClassifier {
    replies: Vec<Option<String>>,
    index: AtomicUsize,
    requests: Mutex<Vec<ClassificationRequest>>,
}

impl MockClassifier {
    pub fn new(replies: Vec<Option<String>>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn fixed(label: impl Into<String>) -> Self {
        Self::new(vec![Some(label.into())])
    }

    pub fn failing() -> Self {
        Self::new(vec![None])
    }

    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ClassificationRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> std::result::Result<String, ClassifierError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let call = self.index.fetch_add(1, Ordering::SeqCst);
        let reply = match self.replies.len() {
            0 => None,
            len => self.replies[call % len].as_ref(),
        };

        match reply {
            Some(label) => Ok(label.clone()),
            None => Err(ClassifierError::Http {
                status: 503,
                body: "mock failure".to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
