//! Coordinates deleting transactions: the store that removes them, the user
//! confirmation, the in-flight flag and the notifications shown afterwards.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{Error, account::AccountId};

use super::core::TransactionId;

/// Removes transactions from persistent storage.
#[async_trait::async_trait]
pub trait DeleteTransactions: Send + Sync {
    /// Delete the transactions `ids` and return how many were deleted.
    ///
    /// When `account_id` is given, only transactions that belong to that
    /// account are deleted. IDs that do not exist are skipped.
    async fn delete_transactions(
        &self,
        ids: &[TransactionId],
        account_id: Option<&AccountId>,
    ) -> Result<usize, Error>;
}

/// Asks the user to confirm a destructive action.
#[async_trait::async_trait]
pub trait Confirm: Send + Sync {
    /// Show `message` and return whether the user agreed.
    async fn confirm(&self, message: &str) -> bool;
}

/// How a notification should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// The action worked.
    Success,
    /// The action failed.
    Error,
}

/// A short message for the user about the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// How the message should be styled.
    pub level: NotificationLevel,
    /// The text shown to the user.
    pub message: String,
}

impl Notification {
    /// A success notification.
    pub fn success(message: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.to_owned(),
        }
    }

    /// An error notification.
    pub fn error(message: &str) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.to_owned(),
        }
    }
}

/// Receives notifications for the user.
pub trait Notify {
    /// Show `notification` to the user.
    fn notify(&mut self, notification: Notification);
}

impl Notify for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// What happened when the user asked to delete the selected transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// There was nothing to delete.
    NothingSelected,
    /// The user declined the confirmation.
    Cancelled,
    /// The store deleted this many transactions.
    Deleted(usize),
}

/// Runs deletes against a [DeleteTransactions] store, one at a time.
///
/// While a delete is in flight, [DeleteCoordinator::is_loading] is `true` and
/// other deletes fail with [Error::DeleteInProgress].
#[derive(Debug)]
pub struct DeleteCoordinator<D> {
    store: D,
    loading: AtomicBool,
}

impl<D: DeleteTransactions> DeleteCoordinator<D> {
    /// Create a coordinator that deletes from `store`.
    pub fn new(store: D) -> Self {
        Self {
            store,
            loading: AtomicBool::new(false),
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &D {
        &self.store
    }

    /// Whether a delete is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Delete `ids` from the store, scoped to `account_id` if given.
    ///
    /// # Errors
    /// Returns [Error::DeleteInProgress] if another delete is in flight, or
    /// the error from the store.
    pub async fn delete(
        &self,
        ids: &[TransactionId],
        account_id: Option<&AccountId>,
    ) -> Result<usize, Error> {
        let _guard = LoadingGuard::acquire(&self.loading)?;

        self.store
            .delete_transactions(ids, account_id)
            .await
            .inspect_err(|error| tracing::error!("could not delete transactions {ids:?}: {error}"))
    }
}

/// Holds the loading flag and resets it when dropped, even if the delete
/// future is cancelled.
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, Error> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::DeleteInProgress)?;

        Ok(Self { flag })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::sync::oneshot;

    use crate::{Error, account::AccountId, transaction::TransactionId};

    use super::{DeleteCoordinator, DeleteTransactions, Notification, NotificationLevel, Notify};

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<(Vec<TransactionId>, Option<AccountId>)>>,
    }

    #[async_trait::async_trait]
    impl DeleteTransactions for RecordingStore {
        async fn delete_transactions(
            &self,
            ids: &[TransactionId],
            account_id: Option<&AccountId>,
        ) -> Result<usize, Error> {
            self.calls
                .lock()
                .unwrap()
                .push((ids.to_vec(), account_id.cloned()));
            Ok(ids.len())
        }
    }

    struct BlockingStore {
        release: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait::async_trait]
    impl DeleteTransactions for BlockingStore {
        async fn delete_transactions(
            &self,
            ids: &[TransactionId],
            _account_id: Option<&AccountId>,
        ) -> Result<usize, Error> {
            if let Some(release) = self.release.lock().await.take() {
                release.await.unwrap();
            }
            Ok(ids.len())
        }
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl DeleteTransactions for FailingStore {
        async fn delete_transactions(
            &self,
            _ids: &[TransactionId],
            _account_id: Option<&AccountId>,
        ) -> Result<usize, Error> {
            Err(Error::DatabaseLockError)
        }
    }

    #[tokio::test]
    async fn passes_ids_and_account_to_store() {
        let coordinator = DeleteCoordinator::new(RecordingStore::default());
        let ids = vec!["a".to_owned(), "b".to_owned()];
        let account_id = "checking".to_owned();

        let got = coordinator.delete(&ids, Some(&account_id)).await;

        assert_eq!(got, Ok(2));
        assert_eq!(
            *coordinator.store.calls.lock().unwrap(),
            [(ids, Some(account_id))]
        );
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn rejects_delete_while_another_is_in_flight() {
        let (release, wait) = oneshot::channel();
        let coordinator = DeleteCoordinator::new(BlockingStore {
            release: tokio::sync::Mutex::new(Some(wait)),
        });
        let ids = vec!["a".to_owned()];

        let first = coordinator.delete(&ids, None);
        let second = async {
            assert!(coordinator.is_loading());
            let got = coordinator.delete(&ids, None).await;
            release.send(()).unwrap();
            got
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, Ok(1));
        assert_eq!(second, Err(Error::DeleteInProgress));
        assert!(!coordinator.is_loading());
    }

    #[tokio::test]
    async fn resets_loading_after_store_error() {
        let coordinator = DeleteCoordinator::new(FailingStore);

        let got = coordinator.delete(&["a".to_owned()], None).await;

        assert_eq!(got, Err(Error::DatabaseLockError));
        assert!(!coordinator.is_loading());
    }

    #[test]
    fn vec_collects_notifications() {
        let mut notifications = Vec::new();

        notifications.notify(Notification::error("nope"));

        assert_eq!(
            notifications,
            [Notification {
                level: NotificationLevel::Error,
                message: "nope".to_owned()
            }]
        );
    }
}
