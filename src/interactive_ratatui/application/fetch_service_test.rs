#[cfg(test)]
mod tests {
    use super::super::fetch_service::*;
    use crate::interactive_ratatui::domain::models::{FetchKind, FetchRequest};
    use crate::source::{FetchError, FileSource, ResourceId};
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn service() -> FetchService {
        FetchService::new(Arc::new(FileSource::new()))
    }

    #[test]
    fn test_fetch_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "2024-01-01 10:00:00.000 [main] INFO app.Main - hello").unwrap();

        let request = FetchRequest {
            generation: 7,
            kind: FetchKind::Initial,
            resource: ResourceId::new(file.path()),
        };
        let response = service().fetch(&request);

        assert_eq!(response.generation, 7);
        assert_eq!(response.kind, FetchKind::Initial);
        assert!(response.result.unwrap().contains("hello"));
    }

    #[test]
    fn test_fetch_missing_file_reports_not_found() {
        let request = FetchRequest {
            generation: 1,
            kind: FetchKind::Tail,
            resource: ResourceId::new("/nonexistent/logview/app.log"),
        };
        let response = service().fetch(&request);

        assert_eq!(response.kind, FetchKind::Tail);
        assert!(matches!(response.result, Err(FetchError::NotFound { .. })));
    }

    #[test]
    fn test_worker_answers_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[2023-10-27 10:00:00] one").unwrap();

        let (tx, rx) = Arc::new(service()).start_worker();
        for generation in 1..=3 {
            tx.send(FetchRequest {
                generation,
                kind: FetchKind::Tail,
                resource: ResourceId::new(file.path()),
            })
            .unwrap();
        }

        let generations: Vec<u64> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap().generation)
            .collect();
        assert_eq!(generations, vec![1, 2, 3]);
    }
}
