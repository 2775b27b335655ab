use crate::crawlers::aggregator::Aggregator;
use crate::crawlers::crawler::{Connect, PageRenderer};
use crate::results::{ExamRecord, ExamSummary};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

type Queue = Arc<Mutex<mpsc::Receiver<(usize, ExamSummary)>>>;

/// Aggregates every exam using up to `max_concurrency` renderer sessions.
///
/// `first` is an already-open session (normally the one that walked the
/// listing) and is handed to worker 0, so a single-worker run reuses one
/// session for everything. Every other worker opens its own session; a
/// worker that cannot connect exits and leaves the queue to the rest.
///
/// Records come back in the order of `exams`.
pub async fn aggregate_all<C>(
    connector: Arc<C>,
    first: C::Renderer,
    exams: Vec<ExamSummary>,
    aggregator: Arc<Aggregator>,
    max_concurrency: usize,
) -> Vec<ExamRecord>
where
    C: Connect + 'static,
{
    let total = exams.len();
    let num_workers = max_concurrency.clamp(1, total.max(1));

    let (queue_tx, queue_rx) = mpsc::channel::<(usize, ExamSummary)>(total.max(1));
    let (result_tx, mut result_rx) = mpsc::channel::<(usize, ExamRecord)>(total.max(1));

    for job in exams.into_iter().enumerate() {
        if queue_tx.send(job).await.is_err() {
            break;
        }
    }
    // Workers stop once the queue is drained
    drop(queue_tx);

    let queue: Queue = Arc::new(Mutex::new(queue_rx));
    let mut first = Some(first);

    for worker_id in 0..num_workers {
        let session = first.take();
        spawn_worker(
            worker_id,
            Arc::clone(&connector),
            session,
            Arc::clone(&queue),
            Arc::clone(&aggregator),
            result_tx.clone(),
        );
    }

    // Drop the original sender so the result channel closes with the last worker
    drop(result_tx);

    let mut records = Vec::with_capacity(total);
    while let Some(result) = result_rx.recv().await {
        records.push(result);
        ::log::debug!("Aggregated {} of {} exams", records.len(), total);
    }

    if records.len() < total {
        ::log::error!(
            "Only {} of {} exams were aggregated; no renderer session was left",
            records.len(),
            total
        );
    }

    records.sort_by_key(|(index, _)| *index);
    records.into_iter().map(|(_, record)| record).collect()
}

fn spawn_worker<C>(
    worker_id: usize,
    connector: Arc<C>,
    session: Option<C::Renderer>,
    queue: Queue,
    aggregator: Arc<Aggregator>,
    result_tx: mpsc::Sender<(usize, ExamRecord)>,
) where
    C: Connect + 'static,
{
    ::log::trace!("Spawning worker {}", worker_id);

    tokio::spawn(async move {
        let mut renderer = match session {
            Some(renderer) => renderer,
            None => match connector.connect().await {
                Ok(renderer) => renderer,
                Err(e) => {
                    ::log::warn!("Worker {} could not open a session: {}", worker_id, e);
                    return;
                }
            },
        };
        ::log::debug!("Worker {} started", worker_id);

        while let Some((index, exam)) = next_exam(&queue).await {
            let record = aggregator.aggregate(&mut renderer, exam).await;
            if let Err(e) = result_tx.send((index, record)).await {
                ::log::error!("Worker {} failed to send result: {}", worker_id, e);
                break;
            }
        }

        if let Err(e) = renderer.close().await {
            ::log::warn!("Worker {} failed to close session: {}", worker_id, e);
        }
        ::log::debug!("Worker {} shutting down", worker_id);
    });
}

async fn next_exam(queue: &Queue) -> Option<(usize, ExamSummary)> {
    let mut rx = queue.lock().await;
    rx.recv().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawlers::testing::{MockConnector, MockRenderer};
    use crate::kinds::SubPageKind;
    use crate::parsers::Classifier;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn exams(n: usize) -> Vec<ExamSummary> {
        (0..n)
            .map(|i| ExamSummary::new(format!("EXAM{}", i), &format!("https://example.com/exam-{}", i)))
            .collect()
    }

    fn aggregator() -> Arc<Aggregator> {
        Arc::new(
            Aggregator::new(Classifier::default(), "h1")
                .with_wait_timeout(Duration::from_millis(10))
                .with_settle_delay(Duration::ZERO),
        )
    }

    fn template() -> MockRenderer {
        MockRenderer::with_default_page("<html><body><h1>Exam</h1></body></html>".to_string())
    }

    #[tokio::test]
    async fn test_records_keep_listing_order() {
        let connector = Arc::new(MockConnector::new(template()));
        let records = aggregate_all(connector.clone(), template(), exams(7), aggregator(), 3).await;

        let names = records
            .iter()
            .map(|r| r.summary.short_name.clone())
            .collect::<Vec<_>>();
        assert_eq!(names, (0..7).map(|i| format!("EXAM{}", i)).collect::<Vec<_>>());
        for record in &records {
            assert_eq!(record.pages.len(), SubPageKind::ALL.len());
            assert_eq!(
                record.page(SubPageKind::Overview).unwrap().title.as_deref(),
                Some("Exam")
            );
        }
        // Worker 0 reuses the given session
        assert_eq!(connector.connections.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_worker_never_connects() {
        let connector = Arc::new(MockConnector::new(template()));
        let records = aggregate_all(connector.clone(), template(), exams(2), aggregator(), 1).await;

        assert_eq!(records.len(), 2);
        assert_eq!(connector.connections.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_connections_leave_work_to_first_session() {
        let connector = Arc::new(MockConnector::new(template()).with_limit(0));
        let records = aggregate_all(connector, template(), exams(4), aggregator(), 4).await;
        assert_eq!(records.len(), 4);
    }

    #[tokio::test]
    async fn test_no_exams() {
        let connector = Arc::new(MockConnector::new(template()));
        let records = aggregate_all(connector, template(), Vec::new(), aggregator(), 4).await;
        assert!(records.is_empty());
    }
}
