//! CheckServiceHealthHandler - Query handler for extraction service reachability.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::ports::ExtractionService;

/// Health check result.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceHealth {
    pub available: bool,
    pub checked_at: Timestamp,
}

/// Handler for health checks.
pub struct CheckServiceHealthHandler {
    extraction_service: Arc<dyn ExtractionService>,
}

impl CheckServiceHealthHandler {
    pub fn new(extraction_service: Arc<dyn ExtractionService>) -> Self {
        Self { extraction_service }
    }

    pub async fn handle(&self) -> ServiceHealth {
        let available = self.extraction_service.is_available().await;
        if !available {
            tracing::warn!("Extraction service is not reachable");
        }

        ServiceHealth {
            available,
            checked_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockExtractionService;

    #[tokio::test]
    async fn reports_available_service() {
        let handler = CheckServiceHealthHandler::new(Arc::new(MockExtractionService::new()));
        assert!(handler.handle().await.available);
    }

    #[tokio::test]
    async fn reports_unavailable_service() {
        let service = MockExtractionService::new().with_availability(false);
        let handler = CheckServiceHealthHandler::new(Arc::new(service));
        assert!(!handler.handle().await.available);
    }
}
