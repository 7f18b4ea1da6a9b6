//! [`DataSink`] adapter that writes bars through [`PgPriceRepo`].

use std::sync::Arc;

use async_trait::async_trait;
use market_data_ingestor::{
    io::sink::{ConversionSnafu, DataSink, SinkError, WriteSnafu},
    models::bar::PriceBar,
};
use shared_utils::config::DbConfig;

use crate::{
    db::connection::connect_postgres,
    repo::{PgPriceRepo, PriceRepo, RepoError},
};

/// Writes each batch over a fresh connection on tokio's blocking pool.
pub struct PgBarSink {
    db: Arc<DbConfig>,
    repo: PgPriceRepo,
}

impl PgBarSink {
    pub fn new(db: Arc<DbConfig>) -> Self {
        Self {
            db,
            repo: PgPriceRepo::new(),
        }
    }
}

#[async_trait]
impl DataSink for PgBarSink {
    type Output = usize;

    async fn write(&self, bars: &[PriceBar]) -> Result<usize, SinkError> {
        if bars.is_empty() {
            return Ok(0);
        }

        let db = Arc::clone(&self.db);
        let repo = self.repo;
        let bars = bars.to_vec();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = connect_postgres(&db)?;
            repo.insert_bars(&mut conn, &bars)
        })
        .await
        .map_err(|e| {
            WriteSnafu {
                message: format!("writer task failed: {e}"),
            }
            .build()
        })?;

        result.map_err(|e| match e.downcast_ref::<RepoError>() {
            Some(domain) => ConversionSnafu {
                message: domain.to_string(),
            }
            .build(),
            None => WriteSnafu {
                message: format!("{e:#}"),
            }
            .build(),
        })
    }
}
