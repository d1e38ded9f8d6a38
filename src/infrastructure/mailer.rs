// Mailer - outbound mail collaborator used by the signup flow

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> AppResult<()>;
}

/// Development transport: writes outgoing mail to the log.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> AppResult<()> {
        info!(to = %mail.to, subject = %mail.subject, "mail dispatched");
        debug!(body = %mail.body, "mail body");
        Ok(())
    }
}

/// Keeps every message in memory; used by tests to inspect what was sent.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: RwLock<Vec<Mail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Mail> {
        self.sent.read().await.clone()
    }

    pub async fn sent_to(&self, address: &str) -> Vec<Mail> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|mail| mail.to == address)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: Mail) -> AppResult<()> {
        self.sent.write().await.push(mail);
        Ok(())
    }
}
