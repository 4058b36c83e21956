use crate::models::{MatchRecord, ScoredCandidate};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Errors that can occur when dispatching notifications
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook returned status {0}")]
    Status(u16),

    #[error("Notification queue is full")]
    QueueFull,

    #[error("Notification worker has stopped")]
    Closed,
}

/// Message sent to both parties once a match is approved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub match_id: String,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Compose the introduction for an approved candidate
    pub fn for_approved_match(record: &MatchRecord, candidate: &ScoredCandidate, from: &str) -> Self {
        let subject = format!(
            "Mentoring match: {} and {}",
            candidate.mentee_name, candidate.mentor_name
        );

        let mut body = format!(
            "Hello {} and {},\n\n\
             You have been proposed as a mentoring pair (match {}).\n\
             Match score: {:.1}/100\n",
            candidate.mentee_name, candidate.mentor_name, record.match_id, candidate.score
        );
        if !candidate.rationale.is_empty() {
            body.push_str(&format!("Why this match: {}\n", candidate.rationale));
        }
        body.push_str(
            "\nPlease reply to this message to confirm and arrange your first session.\n",
        );

        Self {
            id: Uuid::new_v4(),
            match_id: record.match_id.clone(),
            from: from.to_string(),
            to: vec![candidate.mentor_email.clone(), candidate.mentee_email.clone()],
            subject,
            body,
            created_at: Utc::now(),
        }
    }
}

/// Retry schedule for webhook delivery
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based), doubling each time
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1u32 << exponent)
    }
}

/// Posts notifications to a webhook (e.g. a mail relay)
pub struct WebhookClient {
    url: String,
    client: Client,
    policy: RetryPolicy,
}

impl WebhookClient {
    pub fn new(url: String, timeout: Duration, policy: RetryPolicy) -> Result<Self, NotifierError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client, policy })
    }

    /// Deliver one notification, retrying on transport errors and non-2xx
    /// responses up to `max_retries` times
    pub async fn deliver(&self, notification: &Notification) -> Result<(), NotifierError> {
        let mut retry = 0;

        loop {
            match self.post_once(notification).await {
                Ok(()) => return Ok(()),
                Err(e) if retry < self.policy.max_retries => {
                    retry += 1;
                    let delay = self.policy.backoff(retry);
                    tracing::warn!(
                        "Notification {} delivery failed ({}), retry {}/{} in {:?}",
                        notification.id,
                        e,
                        retry,
                        self.policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_once(&self, notification: &Notification) -> Result<(), NotifierError> {
        let response = self.client.post(&self.url).json(notification).send().await?;

        if !response.status().is_success() {
            return Err(NotifierError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Queue in front of the webhook worker
///
/// Approval handlers enqueue and return immediately; delivery and retries
/// happen on a background task.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: Option<mpsc::Sender<Notification>>,
}

impl NotificationDispatcher {
    /// Dispatcher that only logs, used when no webhook is configured
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Start the delivery worker on the current tokio runtime
    pub fn spawn(client: WebhookClient, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        tokio::spawn(run_worker(client, receiver));
        Self {
            sender: Some(sender),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Queue a notification. Returns `Ok(false)` when dispatch is disabled.
    pub fn dispatch(&self, notification: Notification) -> Result<bool, NotifierError> {
        let Some(sender) = &self.sender else {
            tracing::info!(
                "Notification dispatch disabled, not sending {} for match {}",
                notification.id,
                notification.match_id
            );
            return Ok(false);
        };

        sender.try_send(notification).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotifierError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => NotifierError::Closed,
        })?;

        Ok(true)
    }
}

async fn run_worker(client: WebhookClient, mut receiver: mpsc::Receiver<Notification>) {
    tracing::info!("Notification worker started for {}", client.url);

    while let Some(notification) = receiver.recv().await {
        match client.deliver(&notification).await {
            Ok(()) => tracing::info!(
                "Delivered notification {} for match {}",
                notification.id,
                notification.match_id
            ),
            Err(e) => tracing::error!(
                "Giving up on notification {} for match {}: {}",
                notification.id,
                notification.match_id,
                e
            ),
        }
    }

    tracing::info!("Notification worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> ScoredCandidate {
        ScoredCandidate {
            mentee_id: "ME001".to_string(),
            mentee_name: "Bea Lima".to_string(),
            mentor_id: "M001".to_string(),
            mentor_name: "Ana Costa".to_string(),
            score: 84.0,
            rationale: "Common language; Same timezone".to_string(),
            mentor_email: "ana@example.org".to_string(),
            mentee_email: "bea@example.org".to_string(),
        }
    }

    fn notification() -> Notification {
        let candidate = candidate();
        let mut record = MatchRecord::proposed(&candidate);
        record.match_id = "MA001".to_string();
        Notification::for_approved_match(&record, &candidate, "program@example.org")
    }

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_notification_content() {
        let n = notification();

        assert_eq!(n.match_id, "MA001");
        assert_eq!(n.to, vec!["ana@example.org", "bea@example.org"]);
        assert_eq!(n.subject, "Mentoring match: Bea Lima and Ana Costa");
        assert!(n.body.contains("Match score: 84.0/100"));
        assert!(n.body.contains("Why this match: Common language; Same timezone"));
    }

    #[test]
    fn test_backoff_doubles() {
        let p = RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
        };
        assert_eq!(p.backoff(1), Duration::from_millis(100));
        assert_eq!(p.backoff(2), Duration::from_millis(200));
        assert_eq!(p.backoff(3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_deliver_succeeds_first_try() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/notify")
            .match_header("content-type", "application/json")
            .with_status(202)
            .expect(1)
            .create_async()
            .await;

        let client = WebhookClient::new(
            format!("{}/notify", server.url()),
            Duration::from_secs(5),
            policy(3),
        )
        .unwrap();

        client.deliver(&notification()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_deliver_gives_up_after_retries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/notify")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let client = WebhookClient::new(
            format!("{}/notify", server.url()),
            Duration::from_secs(5),
            policy(2),
        )
        .unwrap();

        let err = client.deliver(&notification()).await.unwrap_err();
        assert!(matches!(err, NotifierError::Status(503)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_dispatcher_delivers_in_background() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/notify")
            .with_status(200)
            .create_async()
            .await;

        let client = WebhookClient::new(
            format!("{}/notify", server.url()),
            Duration::from_secs(5),
            policy(0),
        )
        .unwrap();
        let dispatcher = NotificationDispatcher::spawn(client, 8);

        assert!(dispatcher.dispatch(notification()).unwrap());

        for _ in 0..100 {
            if mock.matched_async().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        mock.assert_async().await;
    }

    #[test]
    fn test_disabled_dispatcher_skips() {
        let dispatcher = NotificationDispatcher::disabled();
        assert!(!dispatcher.is_enabled());
        assert!(!dispatcher.dispatch(notification()).unwrap());
    }

    #[test]
    fn test_full_and_closed_queue() {
        let (sender, receiver) = mpsc::channel(1);
        let dispatcher = NotificationDispatcher {
            sender: Some(sender),
        };

        assert!(dispatcher.dispatch(notification()).unwrap());
        assert!(matches!(
            dispatcher.dispatch(notification()),
            Err(NotifierError::QueueFull)
        ));

        drop(receiver);
        assert!(matches!(
            dispatcher.dispatch(notification()),
            Err(NotifierError::Closed)
        ));
    }
}
