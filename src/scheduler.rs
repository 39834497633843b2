use crate::error::AppResult;
use crate::messages::{Message, MessageCursor};
use crate::store::StoreClient;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info, warn};

pub type MessageSink = Arc<dyn Fn(Vec<Message>) + Send + Sync>;

/// Poll a conversation at a fixed interval and hand new messages to `sink`.
///
/// One poll runs immediately, then one per `interval`. A failed poll is
/// logged and the next tick simply tries again; there is no backoff.
pub async fn start_message_polling(
    store: Arc<StoreClient>,
    conversation_id: String,
    interval: Duration,
    sink: MessageSink,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;
    let cursor = Arc::new(Mutex::new(MessageCursor::new()));

    run_tick(&store, &conversation_id, &cursor, &sink).await;

    info!(
        "Polling conversation {} every {:?}",
        conversation_id, interval
    );

    let job = Job::new_repeated_async(interval, move |_uuid, _l| {
        let store = Arc::clone(&store);
        let cursor = Arc::clone(&cursor);
        let sink = Arc::clone(&sink);
        let conversation_id = conversation_id.clone();

        Box::pin(async move {
            run_tick(&store, &conversation_id, &cursor, &sink).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    Ok(scheduler)
}

async fn run_tick(
    store: &StoreClient,
    conversation_id: &str,
    cursor: &Mutex<MessageCursor>,
    sink: &MessageSink,
) {
    let mut cursor = cursor.lock().await;
    match poll_once(store, conversation_id, &mut cursor).await {
        Ok(fresh) if !fresh.is_empty() => {
            debug!("{} new messages in {}", fresh.len(), conversation_id);
            sink(fresh);
        }
        Ok(_) => {}
        Err(e) => warn!("Message poll for {} failed: {}", conversation_id, e),
    }
}

/// Fetch everything since the cursor and return only unseen messages.
pub async fn poll_once(
    store: &StoreClient,
    conversation_id: &str,
    cursor: &mut MessageCursor,
) -> AppResult<Vec<Message>> {
    let batch = store
        .fetch_messages_since(conversation_id, cursor.last_seen())
        .await?;
    Ok(cursor.absorb(batch))
}
