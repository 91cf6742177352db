//! Keyword sweep that builds the set of known product models.

use std::collections::BTreeSet;

use tracing::{debug, error, info, instrument};

use crate::api::{ApiError, IbookClient};
use crate::pacing::Pacer;

/// Keywords queried during discovery, one uppercase letter at a time.
pub const KEYWORD_ALPHABET: std::ops::RangeInclusive<char> = 'A'..='Z';

/// Queries every keyword in [`KEYWORD_ALPHABET`] and unions the results.
///
/// Any failed query aborts the whole sweep: a partial model universe is not
/// returned.
///
/// # Errors
///
/// Returns the first [`ApiError`] encountered.
#[instrument(skip_all)]
pub async fn discover_models(
    api: &IbookClient,
    pacer: &Pacer,
) -> Result<BTreeSet<String>, ApiError> {
    let mut models = BTreeSet::new();

    for keyword in KEYWORD_ALPHABET {
        let result = api.list_models(keyword).await;
        pacer.pause().await;

        match result {
            Ok(found) => {
                debug!(%keyword, matches = found.len(), "keyword query complete");
                models.extend(found);
            }
            Err(e) => {
                error!(
                    %keyword,
                    status = ?e.status(),
                    error = %e,
                    "model discovery query failed; aborting"
                );
                return Err(e);
            }
        }
    }

    info!(models = models.len(), "discovered products");
    Ok(models)
}
