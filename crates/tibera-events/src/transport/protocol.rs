//! Wire format of the ingestion route: `{"events": [...]}`.

use serde::{Deserialize, Serialize};

use tibera_core::Event;

/// Outbound body. Borrows the batch so sending never clones events.
#[derive(Debug, Serialize)]
pub struct IngestBatch<'a> {
    pub events: &'a [Event],
}

/// Owned form of the same body, for the receiving side and for tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub events: Vec<Event>,
}
