//! Transient notifications, shown in insertion order until dismissed or
//! expired.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use log::{debug, error, trace};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};

use crate::model::{
    snowflake::{Snowcloud, EPOCH, PRIMARY_ID},
    toast::Id,
    NewToast, Toast,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to set up toast ids: {0}")]
    Snowcloud(snowcloud::Error),
}

/// Clones share the same queue.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Inner>,
}

struct Inner {
    timeout: Duration,
    snowcloud: Snowcloud,
    entries: Mutex<Vec<Entry>>,
    tx: watch::Sender<Vec<Toast>>,
    #[cfg(test)]
    live_expiries: Arc<std::sync::atomic::AtomicUsize>,
}

struct Entry {
    toast: Toast,
    /// Pending auto-removal. Aborted when the entry goes away first.
    expiry: Option<JoinHandle<()>>,
}

impl ToastQueue {
    pub fn new(timeout: Duration) -> Result<ToastQueue, Error> {
        let snowcloud = Snowcloud::new(PRIMARY_ID, EPOCH).map_err(Error::Snowcloud)?;
        let (tx, _rx) = watch::channel(Vec::new());

        Ok(ToastQueue {
            inner: Arc::new(Inner {
                timeout,
                snowcloud,
                entries: Mutex::new(Vec::new()),
                tx,
                #[cfg(test)]
                live_expiries: Arc::default(),
            }),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Append a toast and schedule its removal.
    ///
    /// Outside of a tokio runtime nothing can be scheduled, so the toast
    /// stays until [`remove_toast`](Self::remove_toast) is called.
    pub fn add_toast(&self, toast: NewToast) -> Id {
        let id = self.next_id();
        let toast = Toast {
            id: id.clone(),
            kind: toast.kind,
            title: toast.title,
            description: toast.description,
        };
        debug!("Adding {:?} toast {}: {}", toast.kind, id, toast.title);

        let mut entries = self.entries();
        // Scheduled while holding the lock so an expiry can't run before
        // the entry exists
        let expiry = self.schedule_expiry(id.clone());
        entries.push(Entry { toast, expiry });
        self.publish(&entries);

        id
    }

    /// Remove a toast early. Unknown ids are ignored.
    pub fn remove_toast(&self, id: &Id) {
        let mut entries = self.entries();
        let Some(index) = entries.iter().position(|entry| &entry.toast.id == id) else {
            trace!("Toast {} already gone", id);
            return;
        };

        let entry = entries.remove(index);
        if let Some(expiry) = entry.expiry {
            expiry.abort();
        }
        debug!("Removed toast {}", id);
        self.publish(&entries);
    }

    /// Drop every toast and cancel every pending expiry.
    pub fn clear(&self) {
        let mut entries = self.entries();
        for entry in entries.drain(..) {
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
        }
        self.publish(&entries);
    }

    /// The current toasts, oldest first.
    pub fn messages(&self) -> Vec<Toast> {
        self.entries()
            .iter()
            .map(|entry| entry.toast.clone())
            .collect()
    }

    /// Follow the toast list as it changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.tx.subscribe()
    }

    fn schedule_expiry(&self, id: Id) -> Option<JoinHandle<()>> {
        let Ok(handle) = Handle::try_current() else {
            debug!("No runtime, toast {} won't expire on its own", id);
            return None;
        };

        let timeout = self.inner.timeout;
        let queue = Arc::downgrade(&self.inner);
        #[cfg(test)]
        let live = LiveExpiry::new(self.inner.live_expiries.clone());

        Some(handle.spawn(async move {
            #[cfg(test)]
            let _live = live;
            expire_after(queue, id, timeout).await
        }))
    }

    /// Expiry tasks that haven't finished or been dropped yet.
    #[cfg(test)]
    fn live_expiries(&self) -> usize {
        self.inner
            .live_expiries
            .load(std::sync::atomic::Ordering::SeqCst)
    }

    fn next_id(&self) -> Id {
        loop {
            match self.inner.snowcloud.next_id() {
                Ok(id) => return id.into(),
                Err(snowcloud::Error::SequenceMaxReached(_)) => std::thread::yield_now(),
                Err(err) => {
                    // Only a misconfigured epoch gets here
                    error!("Failed to generate toast id: {}", err);
                    std::thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }

    fn publish(&self, entries: &[Entry]) {
        let toasts = entries.iter().map(|entry| entry.toast.clone()).collect();
        self.inner.tx.send_replace(toasts);
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

async fn expire_after(queue: Weak<Inner>, id: Id, timeout: Duration) {
    tokio::time::sleep(timeout).await;

    // The queue may be gone already
    if let Some(inner) = queue.upgrade() {
        trace!("Toast {} expired", id);
        ToastQueue { inner }.remove_toast(&id);
    }
}

/// Counts a spawned expiry task until its future is dropped.
#[cfg(test)]
struct LiveExpiry(Arc<std::sync::atomic::AtomicUsize>);

#[cfg(test)]
impl LiveExpiry {
    fn new(count: Arc<std::sync::atomic::AtomicUsize>) -> LiveExpiry {
        count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        LiveExpiry(count)
    }
}

#[cfg(test)]
impl Drop for LiveExpiry {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let entries = self
            .entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for entry in entries.drain(..) {
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
        }
    }
}
