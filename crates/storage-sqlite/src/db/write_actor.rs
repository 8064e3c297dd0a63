use super::DbPool;
use crate::errors::StorageError;
use adscout_core::errors::{DatabaseError, Error, Result};
use diesel::SqliteConnection;
use log::{debug, error};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A write job receives the writer's connection and returns a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type ErasedReply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, ErasedReply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside one `IMMEDIATE` transaction: either every statement
    /// it issues is committed or none is. Domain errors returned by the job
    /// roll the transaction back and reach the caller unchanged.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_gone("the writer actor has stopped"))?;

        let boxed = ret_rx
            .await
            .map_err(|_| writer_gone("the writer actor dropped the reply"))??;
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| writer_gone("unexpected result type from the writer actor"))
    }
}

fn writer_gone(message: &str) -> Error {
    Error::Database(DatabaseError::Internal(message.to_string()))
}

/// Spawns a background Tokio task that acts as a single writer to the database.
/// This actor owns one database connection from the pool and processes write jobs serially.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, ErasedReply)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer actor could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            if reply_tx.send(result).is_err() {
                debug!("Write job caller went away before the result was delivered");
            }
        }
        debug!("Writer actor stopped: all handles dropped");
    });

    WriteHandle { tx }
}
